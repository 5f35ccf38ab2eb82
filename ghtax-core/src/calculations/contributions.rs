//! SSNIT and occupational pension contributions.
//!
//! Every contribution is a flat percentage of gross income. The rate is a
//! parameter so the same primitive serves the employee Tier 1 deduction,
//! the employer SSNIT cost, Tier 2 and voluntary Tier 3.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{CalculationError, ensure_non_negative, round_half_up};
use crate::calculations::rates::{ContributionRates, RateTableError};

/// Employee-side statutory contributions on one gross income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// SSNIT Tier 1, deducted from take-home pay.
    pub ssnit: Decimal,
    /// Tier 2 occupational pension.
    pub tier2: Decimal,
}

/// Computes `gross_income × rate`, rounded to two decimal places.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] for negative income and
/// [`CalculationError::InvalidRate`] for a rate outside `[0, 1]`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ghtax_core::calculations::compute_contribution;
///
/// // Employer SSNIT at 13%
/// assert_eq!(compute_contribution(dec!(3500.00), dec!(0.13)).unwrap(), dec!(455.00));
/// ```
pub fn compute_contribution(
    gross_income: Decimal,
    rate: Decimal,
) -> Result<Decimal, CalculationError> {
    let gross_income = ensure_non_negative("gross income", gross_income)?;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(CalculationError::InvalidRate {
            name: "contribution",
            rate,
        });
    }
    Ok(round_half_up(gross_income * rate))
}

#[derive(Debug, Clone, Default)]
pub struct ContributionCalculator {
    rates: ContributionRates,
}

impl ContributionCalculator {
    /// # Errors
    ///
    /// Returns [`RateTableError::InvalidRate`] when any rate is outside `[0, 1]`.
    pub fn new(rates: ContributionRates) -> Result<Self, RateTableError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &ContributionRates {
        &self.rates
    }

    /// Employee SSNIT and Tier 2 on `gross_income`.
    pub fn compute_contributions(
        &self,
        gross_income: Decimal,
    ) -> Result<Contributions, CalculationError> {
        Ok(Contributions {
            ssnit: compute_contribution(gross_income, self.rates.ssnit_employee)?,
            tier2: compute_contribution(gross_income, self.rates.tier2)?,
        })
    }

    /// Employer SSNIT on `gross_income`.
    pub fn employer_ssnit(
        &self,
        gross_income: Decimal,
    ) -> Result<Decimal, CalculationError> {
        compute_contribution(gross_income, self.rates.ssnit_employer)
    }

    /// Voluntary Tier 3 at the employee's chosen `rate`.
    pub fn tier3(
        &self,
        gross_income: Decimal,
        rate: Decimal,
    ) -> Result<Decimal, CalculationError> {
        compute_contribution(gross_income, rate).map_err(|err| match err {
            CalculationError::InvalidRate { rate, .. } => CalculationError::InvalidRate {
                name: "Tier 3",
                rate,
            },
            other => other,
        })
    }
}
