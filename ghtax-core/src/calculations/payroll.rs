//! Monthly payroll: PAYE and pension contributions for one or more employees.
//!
//! # Payslip Structure
//!
//! | Field                | Formula                                        |
//! |----------------------|------------------------------------------------|
//! | `gross_income`       | basic income + allowances                      |
//! | `taxable_income`     | gross income − tax relief (minimum 0)          |
//! | `paye_tax`           | PAYE schedule applied to taxable income        |
//! | `ssnit_contribution` | gross income × employee SSNIT rate             |
//! | `tier2_pension`      | gross income × Tier 2 rate                     |
//! | `tier3_contribution` | gross income × employee's voluntary Tier 3 rate |
//! | `employer_ssnit`     | gross income × employer SSNIT rate             |
//! | `net_income`         | gross income − PAYE − SSNIT                    |
//!
//! Tier 2 and Tier 3 are reported but not deducted from `net_income`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ghtax_core::IncomeRecord;
//! use ghtax_core::calculations::PayrollCalculator;
//!
//! let calculator = PayrollCalculator::default();
//! let result = calculator
//!     .compute(&IncomeRecord::new(dec!(3000.00), dec!(500.00), dec!(0.00)))
//!     .unwrap();
//!
//! assert_eq!(result.gross_income, dec!(3500.00));
//! assert_eq!(result.paye_tax, dec!(503.25));
//! assert_eq!(result.ssnit_contribution, dec!(192.50));
//! assert_eq!(result.net_income, dec!(2804.25));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::IncomeRecord;
use crate::calculations::common::{CalculationError, ensure_non_negative, round_half_up};
use crate::calculations::contributions::ContributionCalculator;
use crate::calculations::paye::PayeSchedule;
use crate::calculations::rates::{RateTable, RateTableError};

/// Payslip figures for one employee for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub paye_tax: Decimal,
    pub ssnit_contribution: Decimal,
    pub tier2_pension: Decimal,
    pub net_income: Decimal,

    pub tier3_contribution: Decimal,

    /// Employer SSNIT cost; not part of the employee's deductions.
    pub employer_ssnit: Decimal,
}

/// Column totals over a set of payslips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub employees: usize,
    pub total_gross: Decimal,
    pub total_paye: Decimal,
    pub total_ssnit: Decimal,
    pub total_tier2: Decimal,
    pub total_tier3: Decimal,
    pub total_employer_ssnit: Decimal,
    pub total_net: Decimal,
}

impl PayrollSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ContributionResult>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut summary, result| {
                summary.employees += 1;
                summary.total_gross += result.gross_income;
                summary.total_paye += result.paye_tax;
                summary.total_ssnit += result.ssnit_contribution;
                summary.total_tier2 += result.tier2_pension;
                summary.total_tier3 += result.tier3_contribution;
                summary.total_employer_ssnit += result.employer_ssnit;
                summary.total_net += result.net_income;
                summary
            })
    }

    /// Total SSNIT remittance: employee plus employer share.
    pub fn total_ssnit_remittance(&self) -> Decimal {
        self.total_ssnit + self.total_employer_ssnit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    pub results: Vec<ContributionResult>,
    pub summary: PayrollSummary,
}

/// Calculator combining a PAYE schedule with contribution rates.
#[derive(Debug, Clone, Default)]
pub struct PayrollCalculator {
    schedule: PayeSchedule,
    contributions: ContributionCalculator,
}

impl PayrollCalculator {
    pub fn new(
        schedule: PayeSchedule,
        contributions: ContributionCalculator,
    ) -> Self {
        Self {
            schedule,
            contributions,
        }
    }

    /// Builds a calculator from the PAYE bands and contribution rates of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the bands or rates are invalid.
    pub fn from_rate_table(table: &RateTable) -> Result<Self, RateTableError> {
        Ok(Self {
            schedule: PayeSchedule::new(table.paye_bands.clone())?,
            contributions: ContributionCalculator::new(table.contributions)?,
        })
    }

    pub fn schedule(&self) -> &PayeSchedule {
        &self.schedule
    }

    /// Computes the payslip for one employee.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::NegativeAmount`] if any income component
    /// is negative, or [`CalculationError::InvalidRate`] for a Tier 3 rate
    /// outside `[0, 1]`.
    pub fn compute(
        &self,
        record: &IncomeRecord,
    ) -> Result<ContributionResult, CalculationError> {
        let basic_income = ensure_non_negative("basic income", record.basic_income)?;
        let allowances = ensure_non_negative("allowances", record.allowances)?;
        let tax_relief = ensure_non_negative("tax relief", record.tax_relief)?;

        let gross_income = round_half_up(basic_income + allowances);
        let taxable_income = round_half_up(gross_income - tax_relief).max(Decimal::ZERO);

        let paye_tax = self.schedule.compute_paye(taxable_income);
        let contributions = self.contributions.compute_contributions(gross_income)?;
        let tier3_contribution = self
            .contributions
            .tier3(gross_income, record.tier3_rate.unwrap_or(Decimal::ZERO))?;
        let employer_ssnit = self.contributions.employer_ssnit(gross_income)?;

        let net_income = gross_income - paye_tax - contributions.ssnit;

        debug!(
            gross = %gross_income,
            paye = %paye_tax,
            ssnit = %contributions.ssnit,
            net = %net_income,
            "computed payslip"
        );

        Ok(ContributionResult {
            gross_income,
            taxable_income,
            paye_tax,
            ssnit_contribution: contributions.ssnit,
            tier2_pension: contributions.tier2,
            net_income,
            tier3_contribution,
            employer_ssnit,
        })
    }

    /// Computes payslips for every record and their totals.
    ///
    /// # Errors
    ///
    /// Fails on the first record that [`compute`](Self::compute) rejects.
    pub fn run(
        &self,
        records: &[IncomeRecord],
    ) -> Result<PayrollRun, CalculationError> {
        let results = records
            .iter()
            .map(|record| self.compute(record))
            .collect::<Result<Vec<_>, _>>()?;
        let summary = PayrollSummary::from_results(&results);

        Ok(PayrollRun { results, summary })
    }
}
