//! Statutory rate tables.
//!
//! Every rate used by the calculators is defined here and nowhere else.
//! The constants describe the 2024 Ghana Revenue Authority figures; a
//! [`RateTable`] groups them so callers can load a different table (for a
//! later year or a rate change) from configuration.
//!
//! | Concern            | Rate     |
//! |--------------------|----------|
//! | SSNIT Tier 1 (employee) | 5.5%  |
//! | SSNIT (employer)   | 13%      |
//! | Tier 2 pension     | 5%       |
//! | VAT (sales)        | 12.5%    |
//! | NHIL               | 2.5%     |
//! | GETFund levy       | 2.5%     |
//! | COVID-19 levy      | 1%       |
//! | Tourism levy       | 1%       |
//! | VAT flat rate      | 3%       |
//! | WHT goods / works / services | 3% / 5% / 7.5% |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBand;

const fn fraction(
    mantissa: u32,
    scale: u32,
) -> Decimal {
    Decimal::from_parts(mantissa, 0, 0, false, scale)
}

pub const SSNIT_EMPLOYEE_RATE: Decimal = fraction(55, 3);
pub const SSNIT_EMPLOYER_RATE: Decimal = fraction(13, 2);
pub const TIER2_RATE: Decimal = fraction(5, 2);

pub const VAT_STANDARD_RATE: Decimal = fraction(125, 3);
pub const NHIL_RATE: Decimal = fraction(25, 3);
pub const GETFUND_RATE: Decimal = fraction(25, 3);
pub const COVID_LEVY_RATE: Decimal = fraction(1, 2);
pub const TOURISM_LEVY_RATE: Decimal = fraction(1, 2);
pub const VAT_FLAT_RATE: Decimal = fraction(3, 2);

pub const WHT_GOODS_RATE: Decimal = fraction(3, 2);
pub const WHT_WORKS_RATE: Decimal = fraction(5, 2);
pub const WHT_SERVICES_RATE: Decimal = fraction(75, 3);

/// Largest difference between total debits and credits still treated as balanced.
pub const JOURNAL_BALANCE_TOLERANCE: Decimal = fraction(1, 2);

/// The 2024 monthly PAYE schedule for resident individuals.
///
/// | Chargeable income      | Rate  |
/// |------------------------|-------|
/// | First 490.00           | 0%    |
/// | Next 110.00            | 5%    |
/// | Next 130.00            | 10%   |
/// | Next 3,166.67          | 17.5% |
/// | Next 16,000.00         | 25%   |
/// | Next 30,520.00         | 30%   |
/// | Exceeding 50,416.67    | 35%   |
pub fn ghana_2024_paye_bands() -> Vec<TaxBand> {
    let bounds = [
        (Decimal::ZERO, Some(Decimal::new(490_00, 2)), Decimal::ZERO),
        (Decimal::new(490_00, 2), Some(Decimal::new(600_00, 2)), fraction(5, 2)),
        (Decimal::new(600_00, 2), Some(Decimal::new(730_00, 2)), fraction(10, 2)),
        (Decimal::new(730_00, 2), Some(Decimal::new(3_896_67, 2)), fraction(175, 3)),
        (Decimal::new(3_896_67, 2), Some(Decimal::new(19_896_67, 2)), fraction(25, 2)),
        (Decimal::new(19_896_67, 2), Some(Decimal::new(50_416_67, 2)), fraction(30, 2)),
        (Decimal::new(50_416_67, 2), None, fraction(35, 2)),
    ];

    bounds
        .into_iter()
        .map(|(lower, upper, rate)| TaxBand::new(lower, upper, rate))
        .collect()
}

/// Errors detected while validating a rate table.
///
/// These are configuration errors: they are raised once when a table is
/// loaded, never during an individual calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("PAYE schedule has no bands")]
    NoBands,

    #[error("first PAYE band must start at 0, got {0}")]
    FirstBandNotZero(Decimal),

    #[error("PAYE band {index} is empty: lower bound {lower} is not below upper bound {upper}")]
    EmptyBand {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("PAYE band {index} starts at {found}, expected {expected}")]
    BandGap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("PAYE band {0} is unbounded but is not the last band")]
    UnboundedBandNotLast(usize),

    #[error("last PAYE band must be unbounded, got upper bound {0}")]
    LastBandBounded(Decimal),

    #[error("{name} rate must be between 0 and 1, got {rate}")]
    InvalidRate { name: &'static str, rate: Decimal },
}

fn validate_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<(), RateTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(RateTableError::InvalidRate { name, rate });
    }
    Ok(())
}

/// Checks that `bands` are ascending, contiguous, start at zero and end
/// with a single unbounded band.
pub fn validate_bands(bands: &[TaxBand]) -> Result<(), RateTableError> {
    let first = bands.first().ok_or(RateTableError::NoBands)?;
    if first.lower_bound != Decimal::ZERO {
        return Err(RateTableError::FirstBandNotZero(first.lower_bound));
    }

    for (index, band) in bands.iter().enumerate() {
        validate_rate("PAYE band", band.rate)?;

        let Some(upper) = band.upper_bound else {
            if index + 1 != bands.len() {
                return Err(RateTableError::UnboundedBandNotLast(index));
            }
            continue;
        };

        if upper <= band.lower_bound {
            return Err(RateTableError::EmptyBand {
                index,
                lower: band.lower_bound,
                upper,
            });
        }

        match bands.get(index + 1) {
            Some(next) if next.lower_bound != upper => {
                return Err(RateTableError::BandGap {
                    index: index + 1,
                    expected: upper,
                    found: next.lower_bound,
                });
            }
            Some(_) => {}
            None => return Err(RateTableError::LastBandBounded(upper)),
        }
    }

    Ok(())
}

/// Pension contribution rates applied to gross income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionRates {
    /// Employee SSNIT (Tier 1) rate, deducted from take-home pay.
    pub ssnit_employee: Decimal,
    /// Employer SSNIT rate, an employer cost on top of gross pay.
    pub ssnit_employer: Decimal,
    /// Tier 2 occupational pension rate.
    pub tier2: Decimal,
}

impl Default for ContributionRates {
    fn default() -> Self {
        Self {
            ssnit_employee: SSNIT_EMPLOYEE_RATE,
            ssnit_employer: SSNIT_EMPLOYER_RATE,
            tier2: TIER2_RATE,
        }
    }
}

impl ContributionRates {
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_rate("employee SSNIT", self.ssnit_employee)?;
        validate_rate("employer SSNIT", self.ssnit_employer)?;
        validate_rate("Tier 2", self.tier2)
    }
}

/// VAT and statutory levies charged on a sale, each as a fraction of the base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevyRates {
    pub vat: Decimal,
    pub nhil: Decimal,
    pub getfund: Decimal,
    pub covid: Decimal,
    pub tourism: Decimal,
}

impl Default for LevyRates {
    fn default() -> Self {
        Self {
            vat: VAT_STANDARD_RATE,
            nhil: NHIL_RATE,
            getfund: GETFUND_RATE,
            covid: COVID_LEVY_RATE,
            tourism: TOURISM_LEVY_RATE,
        }
    }
}

impl LevyRates {
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_rate("VAT", self.vat)?;
        validate_rate("NHIL", self.nhil)?;
        validate_rate("GETFund", self.getfund)?;
        validate_rate("COVID-19 levy", self.covid)?;
        validate_rate("tourism levy", self.tourism)
    }
}

/// Rates used to extract input VAT from an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseVatRates {
    /// Standard VAT rate contained in a VAT-inclusive amount.
    pub standard: Decimal,
    /// Flat-rate scheme percentage applied to the gross amount.
    pub flat: Decimal,
}

impl Default for ExpenseVatRates {
    fn default() -> Self {
        Self {
            standard: VAT_STANDARD_RATE,
            flat: VAT_FLAT_RATE,
        }
    }
}

impl ExpenseVatRates {
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_rate("standard VAT", self.standard)?;
        validate_rate("flat VAT", self.flat)
    }
}

/// Withholding tax rates applied to payments made to suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithholdingRates {
    pub goods: Decimal,
    pub works: Decimal,
    pub services: Decimal,
}

impl Default for WithholdingRates {
    fn default() -> Self {
        Self {
            goods: WHT_GOODS_RATE,
            works: WHT_WORKS_RATE,
            services: WHT_SERVICES_RATE,
        }
    }
}

impl WithholdingRates {
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_rate("withholding (goods)", self.goods)?;
        validate_rate("withholding (works)", self.works)?;
        validate_rate("withholding (services)", self.services)
    }
}

/// Complete set of rates the calculators need.
///
/// Missing sections in a configuration file fall back to the 2024 defaults.
///
/// # Example
///
/// ```
/// use ghtax_core::calculations::RateTable;
///
/// let table = RateTable::ghana_2024();
/// assert!(table.validate().is_ok());
/// assert_eq!(table.paye_bands.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub paye_bands: Vec<TaxBand>,
    pub contributions: ContributionRates,
    pub levies: LevyRates,
    pub expense_vat: ExpenseVatRates,
    pub withholding: WithholdingRates,
}

impl RateTable {
    pub fn ghana_2024() -> Self {
        Self {
            paye_bands: ghana_2024_paye_bands(),
            contributions: ContributionRates::default(),
            levies: LevyRates::default(),
            expense_vat: ExpenseVatRates::default(),
            withholding: WithholdingRates::default(),
        }
    }

    /// Validates every section of the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found: a malformed PAYE band
    /// list, or any rate outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_bands(&self.paye_bands)?;
        self.contributions.validate()?;
        self.levies.validate()?;
        self.expense_vat.validate()?;
        self.withholding.validate()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::ghana_2024()
    }
}
