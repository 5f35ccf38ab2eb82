mod date_range;
mod income_record;
mod journal_entry;
mod payroll_record;
mod tax_band;
mod transaction;

pub use date_range::DateRange;
pub use income_record::IncomeRecord;
pub use journal_entry::{JournalEntry, JournalLine, NewJournalEntry};
pub use payroll_record::{NewPayrollRecord, PayrollRecord};
pub use tax_band::TaxBand;
pub use transaction::{ExpenseTransaction, NewExpenseTransaction, NewSaleTransaction, SaleTransaction};
