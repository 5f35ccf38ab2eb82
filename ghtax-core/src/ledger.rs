//! Computes records with the configured rate table and persists them.
//!
//! [`Ledger`] is the caller the calculators expect: it runs the pure
//! calculation, decides whether the result may be saved, and only then
//! hands it to a [`LedgerRepository`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::common::ensure_non_negative;
use crate::calculations::{
    CalculationError, PayrollCalculator, PayrollSummary, RateTable, RateTableError, VatReturn,
    VatType, compute_expense_vat, compute_sale_breakdown,
};
use crate::db::repository::{LedgerRepository, RepositoryError};
use crate::models::{
    DateRange, ExpenseTransaction, IncomeRecord, JournalEntry, NewExpenseTransaction,
    NewJournalEntry, NewPayrollRecord, NewSaleTransaction, PayrollRecord, SaleTransaction,
};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(
        "journal entry '{reference}' is unbalanced: debits {total_debit}, credits {total_credit}"
    )]
    Unbalanced {
        reference: String,
        total_debit: Decimal,
        total_credit: Decimal,
    },

    #[error("journal entry '{0}' has no lines")]
    EmptyEntry(String),

    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    #[error("Rate table error: {0}")]
    Rates(#[from] RateTableError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Employee details accompanying an [`IncomeRecord`] on a payroll run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
}

pub struct Ledger<'a, R: LedgerRepository + ?Sized> {
    repo: &'a R,
    rates: RateTable,
    payroll: PayrollCalculator,
}

impl<'a, R: LedgerRepository + ?Sized> Ledger<'a, R> {
    /// # Errors
    ///
    /// Returns [`LedgerError::Rates`] if `rates` fails validation.
    pub fn new(
        repo: &'a R,
        rates: RateTable,
    ) -> Result<Self, LedgerError> {
        rates.validate()?;
        let payroll = PayrollCalculator::from_rate_table(&rates)?;

        Ok(Self {
            repo,
            rates,
            payroll,
        })
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn payroll_calculator(&self) -> &PayrollCalculator {
        &self.payroll
    }

    /// Validates and stores a journal entry.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::EmptyEntry`] if the entry has no lines.
    /// * [`LedgerError::Calculation`] if a line carries a negative amount.
    /// * [`LedgerError::Unbalanced`] if debits and credits differ by 0.01 or
    ///   more. The entry is not stored.
    pub async fn post_journal_entry(
        &self,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, LedgerError> {
        if entry.lines.is_empty() {
            return Err(LedgerError::EmptyEntry(entry.reference));
        }
        for line in &entry.lines {
            ensure_non_negative("debit", line.debit)?;
            ensure_non_negative("credit", line.credit)?;
        }

        let validation = entry.validation();
        if !validation.is_balanced {
            warn!(
                reference = %entry.reference,
                total_debit = %validation.total_debit,
                total_credit = %validation.total_credit,
                "rejected unbalanced journal entry"
            );
            return Err(LedgerError::Unbalanced {
                reference: entry.reference,
                total_debit: validation.total_debit,
                total_credit: validation.total_credit,
            });
        }

        let saved = self.repo.save_journal_entry(entry).await?;
        info!(id = saved.id, reference = %saved.reference, amount = %validation.total_debit, "posted journal entry");
        Ok(saved)
    }

    pub async fn record_sale(
        &self,
        date: NaiveDate,
        reference: impl Into<String>,
        base_amount: Decimal,
    ) -> Result<SaleTransaction, LedgerError> {
        let breakdown = compute_sale_breakdown(base_amount, &self.rates.levies)?;
        let saved = self
            .repo
            .save_sale(NewSaleTransaction {
                date,
                reference: reference.into(),
                breakdown,
            })
            .await?;
        info!(id = saved.id, total = %saved.breakdown.total_amount, "recorded sale");
        Ok(saved)
    }

    pub async fn record_expense(
        &self,
        date: NaiveDate,
        reference: impl Into<String>,
        gross_amount: Decimal,
        vat_type: VatType,
    ) -> Result<ExpenseTransaction, LedgerError> {
        let breakdown = compute_expense_vat(gross_amount, vat_type, &self.rates.expense_vat)?;
        let saved = self
            .repo
            .save_expense(NewExpenseTransaction {
                date,
                reference: reference.into(),
                vat_type,
                breakdown,
            })
            .await?;
        info!(id = saved.id, input_vat = %saved.breakdown.input_vat, "recorded expense");
        Ok(saved)
    }

    pub async fn record_payroll(
        &self,
        employee: Employee,
        pay_date: NaiveDate,
        income: IncomeRecord,
    ) -> Result<PayrollRecord, LedgerError> {
        let result = self.payroll.compute(&income)?;
        let saved = self
            .repo
            .save_payroll_record(NewPayrollRecord {
                employee_id: employee.id,
                employee_name: employee.name,
                pay_date,
                income,
                result,
            })
            .await?;
        info!(id = saved.id, employee = %saved.employee_id, net = %saved.result.net_income, "recorded payslip");
        Ok(saved)
    }

    /// Summarises stored sales and expenses dated within `range`.
    pub async fn vat_return(
        &self,
        range: Option<DateRange>,
    ) -> Result<VatReturn, LedgerError> {
        let sales: Vec<_> = self
            .repo
            .list_sales(range)
            .await?
            .into_iter()
            .map(|sale| sale.breakdown)
            .collect();
        let expenses: Vec<_> = self
            .repo
            .list_expenses(range)
            .await?
            .into_iter()
            .map(|expense| expense.breakdown)
            .collect();

        Ok(VatReturn::from_breakdowns(&sales, &expenses))
    }

    /// Totals stored payslips dated within `range`.
    pub async fn payroll_summary(
        &self,
        range: Option<DateRange>,
    ) -> Result<PayrollSummary, LedgerError> {
        let records = self.repo.list_payroll_records(range).await?;
        Ok(PayrollSummary::from_results(records.iter().map(|r| &r.result)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::JournalLine;
    use crate::db::MemoryRepository;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn entry(lines: Vec<JournalLine>) -> NewJournalEntry {
        NewJournalEntry {
            reference: "JE-100".to_string(),
            date: date(1),
            description: None,
            lines,
        }
    }

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {id}"),
        }
    }

    // =========================================================================
    // construction
    // =========================================================================

    #[test]
    fn new_rejects_invalid_rate_table() {
        let repo = MemoryRepository::new();
        let mut rates = RateTable::ghana_2024();
        rates.levies.vat = dec!(1.25);

        assert!(matches!(
            Ledger::new(&repo, rates),
            Err(LedgerError::Rates(RateTableError::InvalidRate { name: "VAT", .. }))
        ));
    }

    // =========================================================================
    // post_journal_entry
    // =========================================================================

    #[tokio::test]
    async fn balanced_entry_is_persisted() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        let saved = ledger
            .post_journal_entry(entry(vec![
                JournalLine::debit(dec!(100)),
                JournalLine::credit(dec!(100)),
            ]))
            .await
            .unwrap();

        assert_eq!(repo.get_journal_entry(saved.id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn unbalanced_entry_is_rejected_and_not_persisted() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        let result = ledger
            .post_journal_entry(entry(vec![
                JournalLine::debit(dec!(100)),
                JournalLine::credit(dec!(99)),
            ]))
            .await;

        match result {
            Err(LedgerError::Unbalanced {
                reference,
                total_debit,
                total_credit,
            }) => {
                assert_eq!(reference, "JE-100");
                assert_eq!(total_debit, dec!(100));
                assert_eq!(total_credit, dec!(99));
            }
            other => panic!("expected Unbalanced, got {other:?}"),
        }
        assert!(repo.list_journal_entries(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_entry_is_rejected() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        assert!(matches!(
            ledger.post_journal_entry(entry(vec![])).await,
            Err(LedgerError::EmptyEntry(_))
        ));
    }

    #[tokio::test]
    async fn negative_line_is_rejected() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        let result = ledger
            .post_journal_entry(entry(vec![
                JournalLine::debit(dec!(-50)),
                JournalLine::credit(dec!(-50)),
            ]))
            .await;

        assert!(matches!(
            result,
            Err(LedgerError::Calculation(CalculationError::NegativeAmount { field: "debit", .. }))
        ));
    }

    // =========================================================================
    // sales, expenses and the VAT return
    // =========================================================================

    #[tokio::test]
    async fn vat_return_covers_only_the_requested_period() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        ledger.record_sale(date(3), "INV-1", dec!(1000)).await.unwrap();
        ledger.record_sale(date(20), "INV-2", dec!(2000)).await.unwrap();
        ledger
            .record_expense(date(5), "SUP-1", dec!(1125), VatType::Standard)
            .await
            .unwrap();

        let first_half = DateRange::new(date(1), date(15));
        let result = ledger.vat_return(Some(first_half)).await.unwrap();

        assert_eq!(result.sale_count, 1);
        assert_eq!(result.output_vat, dec!(125.00));
        assert_eq!(result.input_vat, dec!(125.00));
        assert_eq!(result.net_vat_payable, dec!(0));

        let whole_month = ledger.vat_return(None).await.unwrap();
        assert_eq!(whole_month.output_vat, dec!(375.00));
    }

    #[tokio::test]
    async fn record_sale_uses_configured_levies() {
        let repo = MemoryRepository::new();
        let mut rates = RateTable::ghana_2024();
        rates.levies.vat = dec!(0.15);
        let ledger = Ledger::new(&repo, rates).unwrap();

        let sale = ledger.record_sale(date(1), "INV-9", dec!(100)).await.unwrap();

        assert_eq!(sale.breakdown.vat_amount, dec!(15.00));
    }

    #[tokio::test]
    async fn record_expense_rejects_negative_amount() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        let result = ledger
            .record_expense(date(1), "SUP-2", dec!(-1), VatType::Zero)
            .await;

        assert!(matches!(result, Err(LedgerError::Calculation(_))));
        assert!(repo.list_expenses(None).await.unwrap().is_empty());
    }

    // =========================================================================
    // payroll
    // =========================================================================

    #[tokio::test]
    async fn payroll_summary_totals_stored_payslips() {
        let repo = MemoryRepository::new();
        let ledger = Ledger::new(&repo, RateTable::ghana_2024()).unwrap();

        ledger
            .record_payroll(
                employee("E001"),
                date(28),
                IncomeRecord::new(dec!(3000), dec!(500), dec!(0)),
            )
            .await
            .unwrap();
        ledger
            .record_payroll(
                employee("E002"),
                date(28),
                IncomeRecord::new(dec!(600), dec!(0), dec!(0)),
            )
            .await
            .unwrap();

        let summary = ledger.payroll_summary(None).await.unwrap();

        assert_eq!(summary.employees, 2);
        assert_eq!(summary.total_paye, dec!(508.75));
        assert_eq!(summary.total_net, dec!(3365.75));
    }
}
