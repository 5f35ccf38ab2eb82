//! Withholding tax deducted from payments to suppliers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{CalculationError, ensure_non_negative, round_half_up};
use crate::calculations::rates::WithholdingRates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithholdingCategory {
    Goods,
    Works,
    Services,
    /// Payments not subject to withholding.
    Exempt,
}

impl WithholdingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goods => "goods",
            Self::Works => "works",
            Self::Services => "services",
            Self::Exempt => "exempt",
        }
    }

    pub fn rate(
        &self,
        rates: &WithholdingRates,
    ) -> Decimal {
        match self {
            Self::Goods => rates.goods,
            Self::Works => rates.works,
            Self::Services => rates.services,
            Self::Exempt => Decimal::ZERO,
        }
    }
}

impl fmt::Display for WithholdingCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown withholding category '{0}' (expected goods, works, services or exempt)")]
pub struct ParseWithholdingCategoryError(pub String);

impl FromStr for WithholdingCategory {
    type Err = ParseWithholdingCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goods" => Ok(Self::Goods),
            "works" => Ok(Self::Works),
            "services" => Ok(Self::Services),
            "exempt" => Ok(Self::Exempt),
            _ => Err(ParseWithholdingCategoryError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingBreakdown {
    pub gross_amount: Decimal,
    pub rate: Decimal,
    pub tax_withheld: Decimal,
    /// Amount actually paid to the supplier.
    pub net_payable: Decimal,
}

/// Computes the tax to withhold from a supplier payment of `gross_amount`.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if `gross_amount` is negative.
pub fn compute_withholding(
    gross_amount: Decimal,
    category: WithholdingCategory,
    rates: &WithholdingRates,
) -> Result<WithholdingBreakdown, CalculationError> {
    let gross_amount = round_half_up(ensure_non_negative("gross amount", gross_amount)?);
    let rate = category.rate(rates);
    let tax_withheld = round_half_up(gross_amount * rate);

    Ok(WithholdingBreakdown {
        gross_amount,
        rate,
        tax_withheld,
        net_payable: gross_amount - tax_withheld,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn goods_withheld_at_three_percent() {
        let result =
            compute_withholding(dec!(2000.00), WithholdingCategory::Goods, &WithholdingRates::default())
                .unwrap();

        assert_eq!(
            result,
            WithholdingBreakdown {
                gross_amount: dec!(2000.00),
                rate: dec!(0.03),
                tax_withheld: dec!(60.00),
                net_payable: dec!(1940.00),
            }
        );
    }

    #[test]
    fn services_withheld_at_seven_and_half_percent() {
        let result = compute_withholding(
            dec!(1234.56),
            WithholdingCategory::Services,
            &WithholdingRates::default(),
        )
        .unwrap();

        // 92.592
        assert_eq!(result.tax_withheld, dec!(92.59));
        assert_eq!(result.net_payable, dec!(1141.97));
    }

    #[test]
    fn works_withheld_at_five_percent() {
        let result =
            compute_withholding(dec!(800), WithholdingCategory::Works, &WithholdingRates::default())
                .unwrap();

        assert_eq!(result.tax_withheld, dec!(40.00));
    }

    #[test]
    fn exempt_withholds_nothing() {
        let result =
            compute_withholding(dec!(800), WithholdingCategory::Exempt, &WithholdingRates::default())
                .unwrap();

        assert_eq!(result.tax_withheld, dec!(0));
        assert_eq!(result.net_payable, dec!(800));
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(
            compute_withholding(dec!(-5), WithholdingCategory::Goods, &WithholdingRates::default())
                .is_err()
        );
    }

    #[test]
    fn category_parses_from_string() {
        assert_eq!("Services".parse::<WithholdingCategory>(), Ok(WithholdingCategory::Services));
        assert_eq!(
            "rent".parse::<WithholdingCategory>(),
            Err(ParseWithholdingCategoryError("rent".to_string()))
        );
    }
}
