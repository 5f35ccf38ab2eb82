//! PAYE (Pay-As-You-Earn) income tax over a progressive band schedule.
//!
//! Tax is accumulated band by band: each band taxes only the slice of income
//! that falls inside it, and evaluation stops as soon as the income is used
//! up. The top band is unbounded, so it absorbs whatever income remains.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ghtax_core::calculations::PayeSchedule;
//!
//! let schedule = PayeSchedule::ghana_2024();
//!
//! // 0 + 110 × 5% + 130 × 10% + 2,770 × 17.5%
//! assert_eq!(schedule.compute_paye(dec!(3500.00)), dec!(503.25));
//! assert_eq!(schedule.marginal_rate(dec!(3500.00)), dec!(0.175));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBand;
use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::calculations::rates::{RateTableError, ghana_2024_paye_bands, validate_bands};

/// A validated, immutable PAYE band schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayeSchedule {
    bands: Vec<TaxBand>,
}

impl PayeSchedule {
    /// Builds a schedule from `bands`, which must be ascending, contiguous,
    /// start at zero and end with an unbounded band.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] describing the first malformed band.
    pub fn new(bands: Vec<TaxBand>) -> Result<Self, RateTableError> {
        validate_bands(&bands)?;
        Ok(Self { bands })
    }

    /// The 2024 monthly schedule.
    pub fn ghana_2024() -> Self {
        Self {
            bands: ghana_2024_paye_bands(),
        }
    }

    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }

    /// Computes PAYE on `taxable_income`, rounded to two decimal places.
    ///
    /// Negative income is clamped to zero rather than rejected.
    pub fn compute_paye(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let mut remaining = clamp_non_negative("taxable income", taxable_income);
        let mut tax = Decimal::ZERO;

        for band in &self.bands {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxable_in_band = match band.width() {
                Some(width) => remaining.min(width),
                None => remaining,
            };

            tax += taxable_in_band * band.rate;
            remaining -= taxable_in_band;
        }

        let tax = round_half_up(tax);
        debug!(taxable_income = %taxable_income, paye = %tax, "computed PAYE");
        tax
    }

    /// Rate of the band that `taxable_income` falls in.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let income = taxable_income.max(Decimal::ZERO);

        self.bands
            .iter()
            .find(|band| band.contains(income))
            .or_else(|| self.bands.last())
            .map_or(Decimal::ZERO, |band| band.rate)
    }
}

impl Default for PayeSchedule {
    fn default() -> Self {
        Self::ghana_2024()
    }
}
