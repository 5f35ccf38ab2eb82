//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the calculators,
//! including rounding, input guards and the shared input error type.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

/// Errors raised when a calculator receives input it cannot accept.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A monetary input was below zero.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A rate supplied at call time is outside its usable range.
    #[error("{name} rate {rate} is out of range")]
    InvalidRate { name: &'static str, rate: Decimal },
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ghtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(192.494)), dec!(192.49));
/// assert_eq!(round_half_up(dec!(192.495)), dec!(192.50));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `amount` unchanged, or [`CalculationError::NegativeAmount`] if it is below zero.
pub fn ensure_non_negative(
    field: &'static str,
    amount: Decimal,
) -> Result<Decimal, CalculationError> {
    if amount < Decimal::ZERO {
        return Err(CalculationError::NegativeAmount {
            field,
            value: amount,
        });
    }
    Ok(amount)
}

/// Clamps `amount` to zero, logging when a negative value was supplied.
pub fn clamp_non_negative(
    field: &'static str,
    amount: Decimal,
) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(field, amount = %amount, "negative amount clamped to zero");
        return Decimal::ZERO;
    }
    amount
}
