//! Input VAT contained in an expense.
//!
//! The VAT scheme of the supplier decides how input VAT is derived from the
//! gross amount paid:
//!
//! | Scheme     | `vat_exclusive_amount`     | `input_vat`                   |
//! |------------|----------------------------|-------------------------------|
//! | `standard` | gross / (1 + standard rate) | gross − `vat_exclusive_amount` |
//! | `flat`     | gross                      | gross × flat rate             |
//! | `zero`     | gross                      | 0                             |

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{CalculationError, ensure_non_negative, round_half_up};
use crate::calculations::rates::ExpenseVatRates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatType {
    /// Gross amount includes VAT at the standard rate.
    Standard,
    /// Supplier is on the VAT flat-rate scheme.
    Flat,
    /// Zero-rated or exempt supply.
    Zero,
}

impl VatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Flat => "flat",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for VatType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown VAT type '{0}' (expected standard, flat or zero)")]
pub struct ParseVatTypeError(pub String);

impl FromStr for VatType {
    type Err = ParseVatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "flat" => Ok(Self::Flat),
            "zero" => Ok(Self::Zero),
            _ => Err(ParseVatTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub vat_exclusive_amount: Decimal,
    pub input_vat: Decimal,
}

/// Splits an expense into its VAT-exclusive amount and reclaimable input VAT.
///
/// # Errors
///
/// * [`CalculationError::NegativeAmount`] if `gross_amount` is negative.
/// * [`CalculationError::InvalidRate`] if the standard rate is `-1` or lower
///   (the divisor `1 + rate` would be zero or negative).
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ghtax_core::calculations::{ExpenseVatRates, VatType, compute_expense_vat};
///
/// let rates = ExpenseVatRates::default();
/// let result = compute_expense_vat(dec!(1125.00), VatType::Standard, &rates).unwrap();
///
/// assert_eq!(result.vat_exclusive_amount, dec!(1000.00));
/// assert_eq!(result.input_vat, dec!(125.00));
/// ```
pub fn compute_expense_vat(
    gross_amount: Decimal,
    vat_type: VatType,
    rates: &ExpenseVatRates,
) -> Result<ExpenseBreakdown, CalculationError> {
    let gross = round_half_up(ensure_non_negative("gross amount", gross_amount)?);

    let breakdown = match vat_type {
        VatType::Standard => {
            if rates.standard <= -Decimal::ONE {
                return Err(CalculationError::InvalidRate {
                    name: "standard VAT",
                    rate: rates.standard,
                });
            }
            let vat_exclusive_amount = round_half_up(gross / (Decimal::ONE + rates.standard));
            ExpenseBreakdown {
                vat_exclusive_amount,
                input_vat: gross - vat_exclusive_amount,
            }
        }
        VatType::Flat => ExpenseBreakdown {
            vat_exclusive_amount: gross,
            input_vat: round_half_up(gross * rates.flat),
        },
        VatType::Zero => ExpenseBreakdown {
            vat_exclusive_amount: gross,
            input_vat: Decimal::ZERO,
        },
    };

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rates() -> ExpenseVatRates {
        ExpenseVatRates::default()
    }

    // =========================================================================
    // standard scheme
    // =========================================================================

    #[test]
    fn standard_extracts_vat_from_inclusive_amount() {
        let result = compute_expense_vat(dec!(100.00), VatType::Standard, &rates()).unwrap();

        assert_eq!(result.vat_exclusive_amount, dec!(88.89));
        assert_eq!(result.input_vat, dec!(11.11));
    }

    #[test]
    fn standard_parts_sum_to_gross() {
        for gross in [dec!(0.01), dec!(9.99), dec!(250.00), dec!(1337.37), dec!(98765.43)] {
            let result = compute_expense_vat(gross, VatType::Standard, &rates()).unwrap();

            assert_eq!(result.vat_exclusive_amount + result.input_vat, gross);
        }
    }

    #[test]
    fn standard_with_fifteen_percent_rate() {
        let rates = ExpenseVatRates {
            standard: dec!(0.15),
            ..rates()
        };

        let result = compute_expense_vat(dec!(1150.00), VatType::Standard, &rates).unwrap();

        assert_eq!(result.vat_exclusive_amount, dec!(1000.00));
        assert_eq!(result.input_vat, dec!(150.00));
    }

    #[test]
    fn standard_rejects_rate_of_minus_one() {
        let rates = ExpenseVatRates {
            standard: dec!(-1),
            ..rates()
        };

        assert_eq!(
            compute_expense_vat(dec!(100), VatType::Standard, &rates),
            Err(CalculationError::InvalidRate {
                name: "standard VAT",
                rate: dec!(-1),
            })
        );
    }

    // =========================================================================
    // flat and zero schemes
    // =========================================================================

    #[test]
    fn flat_multiplies_gross_and_keeps_base() {
        let result = compute_expense_vat(dec!(1000.00), VatType::Flat, &rates()).unwrap();

        assert_eq!(result.vat_exclusive_amount, dec!(1000.00));
        assert_eq!(result.input_vat, dec!(30.00));
    }

    #[test]
    fn flat_ignores_invalid_standard_rate() {
        let rates = ExpenseVatRates {
            standard: dec!(-1),
            ..rates()
        };

        assert!(compute_expense_vat(dec!(1000.00), VatType::Flat, &rates).is_ok());
    }

    #[test]
    fn zero_has_no_input_vat() {
        let result = compute_expense_vat(dec!(480.50), VatType::Zero, &rates()).unwrap();

        assert_eq!(
            result,
            ExpenseBreakdown {
                vat_exclusive_amount: dec!(480.50),
                input_vat: dec!(0),
            }
        );
    }

    #[test]
    fn negative_gross_is_rejected() {
        assert!(matches!(
            compute_expense_vat(dec!(-1), VatType::Zero, &rates()),
            Err(CalculationError::NegativeAmount { .. })
        ));
    }

    // =========================================================================
    // VatType parsing
    // =========================================================================

    #[test]
    fn vat_type_parses_case_insensitively() {
        assert_eq!("Standard".parse::<VatType>(), Ok(VatType::Standard));
        assert_eq!(" flat ".parse::<VatType>(), Ok(VatType::Flat));
        assert_eq!("ZERO".parse::<VatType>(), Ok(VatType::Zero));
    }

    #[test]
    fn vat_type_rejects_unknown_scheme() {
        assert_eq!(
            "exempt".parse::<VatType>(),
            Err(ParseVatTypeError("exempt".to_string()))
        );
    }

    #[test]
    fn vat_type_display_round_trips() {
        for vat_type in [VatType::Standard, VatType::Flat, VatType::Zero] {
            assert_eq!(vat_type.to_string().parse::<VatType>(), Ok(vat_type));
        }
    }
}
