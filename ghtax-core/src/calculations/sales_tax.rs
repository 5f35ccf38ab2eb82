//! VAT and statutory levies on a sale.
//!
//! Each levy is a percentage of the same base amount. Levies are never
//! compounded on one another or on a running subtotal.
//!
//! | Field            | Formula                        |
//! |------------------|--------------------------------|
//! | `vat_amount`     | base × VAT rate                |
//! | `nhil_amount`    | base × NHIL rate               |
//! | `getfund_amount` | base × GETFund rate            |
//! | `covid_amount`   | base × COVID-19 levy rate      |
//! | `tourism_amount` | base × tourism levy rate       |
//! | `total_taxes`    | sum of the five amounts above  |
//! | `total_amount`   | base + `total_taxes`           |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{CalculationError, ensure_non_negative, round_half_up};
use crate::calculations::rates::LevyRates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBreakdown {
    /// The base amount, rounded to cents.
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub nhil_amount: Decimal,
    pub getfund_amount: Decimal,
    pub covid_amount: Decimal,
    pub tourism_amount: Decimal,
    pub total_taxes: Decimal,
    pub total_amount: Decimal,
}

impl SaleBreakdown {
    /// Sum of the levies other than VAT.
    pub fn levies(&self) -> Decimal {
        self.nhil_amount + self.getfund_amount + self.covid_amount + self.tourism_amount
    }
}

/// Computes the VAT and levy breakdown of a sale.
///
/// Every levy is rounded individually, so `total_amount` always equals
/// `subtotal` plus the sum of the displayed levy amounts.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if `base_amount` is negative.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ghtax_core::calculations::{LevyRates, compute_sale_breakdown};
///
/// let breakdown = compute_sale_breakdown(dec!(1000.00), &LevyRates::default()).unwrap();
///
/// assert_eq!(breakdown.vat_amount, dec!(125.00));
/// assert_eq!(breakdown.total_taxes, dec!(195.00));
/// assert_eq!(breakdown.total_amount, dec!(1195.00));
/// ```
pub fn compute_sale_breakdown(
    base_amount: Decimal,
    rates: &LevyRates,
) -> Result<SaleBreakdown, CalculationError> {
    let subtotal = round_half_up(ensure_non_negative("base amount", base_amount)?);
    let levy = |rate: Decimal| round_half_up(subtotal * rate);

    let vat_amount = levy(rates.vat);
    let nhil_amount = levy(rates.nhil);
    let getfund_amount = levy(rates.getfund);
    let covid_amount = levy(rates.covid);
    let tourism_amount = levy(rates.tourism);

    let total_taxes = vat_amount + nhil_amount + getfund_amount + covid_amount + tourism_amount;
    let total_amount = subtotal + total_taxes;

    debug!(subtotal = %subtotal, total_taxes = %total_taxes, "computed sale breakdown");

    Ok(SaleBreakdown {
        subtotal,
        vat_amount,
        nhil_amount,
        getfund_amount,
        covid_amount,
        tourism_amount,
        total_taxes,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn zero_rates() -> LevyRates {
        LevyRates {
            vat: dec!(0),
            nhil: dec!(0),
            getfund: dec!(0),
            covid: dec!(0),
            tourism: dec!(0),
        }
    }

    #[test]
    fn default_rates_on_round_amount() {
        let result = compute_sale_breakdown(dec!(1000.00), &LevyRates::default()).unwrap();

        assert_eq!(
            result,
            SaleBreakdown {
                subtotal: dec!(1000.00),
                vat_amount: dec!(125.00),
                nhil_amount: dec!(25.00),
                getfund_amount: dec!(25.00),
                covid_amount: dec!(10.00),
                tourism_amount: dec!(10.00),
                total_taxes: dec!(195.00),
                total_amount: dec!(1195.00),
            }
        );
    }

    #[test]
    fn each_levy_is_rounded_individually() {
        let result = compute_sale_breakdown(dec!(99.99), &LevyRates::default()).unwrap();

        assert_eq!(result.vat_amount, dec!(12.50)); // 12.49875
        assert_eq!(result.nhil_amount, dec!(2.50)); // 2.49975
        assert_eq!(result.covid_amount, dec!(1.00)); // 0.9999
        assert_eq!(result.total_taxes, dec!(19.50));
        assert_eq!(result.total_amount, dec!(119.49));
    }

    #[test]
    fn total_is_subtotal_plus_levies_exactly() {
        let rates = LevyRates {
            vat: dec!(0.15),
            ..LevyRates::default()
        };

        for base in [dec!(0.01), dec!(17.77), dec!(333.33), dec!(4999.995), dec!(123456.78)] {
            let result = compute_sale_breakdown(base, &rates).unwrap();
            let sum = result.vat_amount
                + result.nhil_amount
                + result.getfund_amount
                + result.covid_amount
                + result.tourism_amount;

            assert_eq!(result.total_taxes, sum);
            assert_eq!(result.total_amount, result.subtotal + sum);
        }
    }

    #[test]
    fn levies_are_not_compounded() {
        let vat_only = compute_sale_breakdown(
            dec!(2000),
            &LevyRates {
                vat: dec!(0.125),
                ..zero_rates()
            },
        )
        .unwrap();
        let all = compute_sale_breakdown(dec!(2000), &LevyRates::default()).unwrap();

        assert_eq!(vat_only.vat_amount, all.vat_amount);
        assert_eq!(all.vat_amount, dec!(250.00));
    }

    #[test]
    fn zero_rates_produce_no_tax() {
        let result = compute_sale_breakdown(dec!(500), &zero_rates()).unwrap();

        assert_eq!(result.total_taxes, dec!(0));
        assert_eq!(result.total_amount, dec!(500));
    }

    #[test]
    fn levies_excludes_vat() {
        let result = compute_sale_breakdown(dec!(1000), &LevyRates::default()).unwrap();

        assert_eq!(result.levies(), dec!(70.00));
    }

    #[test]
    fn negative_base_is_rejected() {
        assert_eq!(
            compute_sale_breakdown(dec!(-10), &LevyRates::default()),
            Err(CalculationError::NegativeAmount {
                field: "base amount",
                value: dec!(-10),
            })
        );
    }
}
