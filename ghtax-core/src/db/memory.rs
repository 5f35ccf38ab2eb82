//! Process-local storage backend.
//!
//! Records live only as long as the repository does. Ids are assigned from
//! one sequence shared by all record kinds.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{LedgerRepository, RepositoryError};
use crate::models::{
    DateRange, ExpenseTransaction, JournalEntry, NewExpenseTransaction, NewJournalEntry,
    NewPayrollRecord, NewSaleTransaction, PayrollRecord, SaleTransaction,
};

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    payroll: Vec<PayrollRecord>,
    journal: Vec<JournalEntry>,
    sales: Vec<SaleTransaction>,
    expenses: Vec<ExpenseTransaction>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn filtered<T: Clone>(
    rows: &[T],
    range: Option<DateRange>,
    date_of: impl Fn(&T) -> NaiveDate,
) -> Vec<T> {
    rows.iter()
        .filter(|row| DateRange::matches(range.as_ref(), date_of(row)))
        .cloned()
        .collect()
}

#[async_trait]
impl LedgerRepository for MemoryRepository {
    async fn save_payroll_record(
        &self,
        record: NewPayrollRecord,
    ) -> Result<PayrollRecord, RepositoryError> {
        let mut tables = self.tables.write().await;
        let saved = PayrollRecord {
            id: tables.next_id(),
            employee_id: record.employee_id,
            employee_name: record.employee_name,
            pay_date: record.pay_date,
            income: record.income,
            result: record.result,
            created_at: Utc::now(),
        };
        tables.payroll.push(saved.clone());
        Ok(saved)
    }

    async fn list_payroll_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<PayrollRecord>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(filtered(&tables.payroll, range, |r| r.pay_date))
    }

    async fn save_journal_entry(
        &self,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, RepositoryError> {
        let mut tables = self.tables.write().await;
        let saved = JournalEntry {
            id: tables.next_id(),
            reference: entry.reference,
            date: entry.date,
            description: entry.description,
            lines: entry.lines,
            created_at: Utc::now(),
        };
        tables.journal.push(saved.clone());
        debug!(id = saved.id, reference = %saved.reference, "stored journal entry");
        Ok(saved)
    }

    async fn get_journal_entry(
        &self,
        id: i64,
    ) -> Result<JournalEntry, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .journal
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_journal_entries(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<JournalEntry>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(filtered(&tables.journal, range, |e| e.date))
    }

    async fn save_sale(
        &self,
        sale: NewSaleTransaction,
    ) -> Result<SaleTransaction, RepositoryError> {
        let mut tables = self.tables.write().await;
        let saved = SaleTransaction {
            id: tables.next_id(),
            date: sale.date,
            reference: sale.reference,
            breakdown: sale.breakdown,
            created_at: Utc::now(),
        };
        tables.sales.push(saved.clone());
        Ok(saved)
    }

    async fn list_sales(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<SaleTransaction>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(filtered(&tables.sales, range, |s| s.date))
    }

    async fn save_expense(
        &self,
        expense: NewExpenseTransaction,
    ) -> Result<ExpenseTransaction, RepositoryError> {
        let mut tables = self.tables.write().await;
        let saved = ExpenseTransaction {
            id: tables.next_id(),
            date: expense.date,
            reference: expense.reference,
            vat_type: expense.vat_type,
            breakdown: expense.breakdown,
            created_at: Utc::now(),
        };
        tables.expenses.push(saved.clone());
        Ok(saved)
    }

    async fn list_expenses(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<ExpenseTransaction>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(filtered(&tables.expenses, range, |e| e.date))
    }
}

/// Factory for the `memory` backend. The connection string is ignored.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
        debug!(connection_string = %config.connection_string, "opening in-memory repository");
        Ok(Box::new(MemoryRepository::new()))
    }
}
