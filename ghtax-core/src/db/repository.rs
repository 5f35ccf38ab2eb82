use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    DateRange, ExpenseTransaction, JournalEntry, NewExpenseTransaction, NewJournalEntry,
    NewPayrollRecord, NewSaleTransaction, PayrollRecord, SaleTransaction,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for computed payroll, journal and VAT records.
///
/// Calculators never touch a repository; callers compute first and then
/// hand finished records to one of the `save_*` methods.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    // Payroll
    async fn save_payroll_record(
        &self,
        record: NewPayrollRecord,
    ) -> Result<PayrollRecord, RepositoryError>;

    async fn list_payroll_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<PayrollRecord>, RepositoryError>;

    // Journal entries
    async fn save_journal_entry(
        &self,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, RepositoryError>;

    async fn get_journal_entry(&self, id: i64) -> Result<JournalEntry, RepositoryError>;

    async fn list_journal_entries(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<JournalEntry>, RepositoryError>;

    // Sales and expenses
    async fn save_sale(
        &self,
        sale: NewSaleTransaction,
    ) -> Result<SaleTransaction, RepositoryError>;

    async fn list_sales(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<SaleTransaction>, RepositoryError>;

    async fn save_expense(
        &self,
        expense: NewExpenseTransaction,
    ) -> Result<ExpenseTransaction, RepositoryError>;

    async fn list_expenses(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<ExpenseTransaction>, RepositoryError>;
}
