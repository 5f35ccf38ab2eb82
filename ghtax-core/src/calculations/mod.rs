//! Pure calculators for Ghanaian payroll and indirect tax.
//!
//! Every calculator takes plain inputs plus the relevant slice of the
//! [`RateTable`](rates::RateTable) and returns a freshly computed result.
//! None of them hold mutable state or perform I/O.

pub mod common;
pub mod contributions;
pub mod expense_vat;
pub mod journal;
pub mod paye;
pub mod payroll;
pub mod rates;
pub mod sales_tax;
pub mod vat_return;
pub mod withholding;

pub use common::CalculationError;
pub use contributions::{ContributionCalculator, Contributions, compute_contribution};
pub use expense_vat::{ExpenseBreakdown, ParseVatTypeError, VatType, compute_expense_vat};
pub use journal::{JournalValidation, validate_journal_entry};
pub use paye::PayeSchedule;
pub use payroll::{ContributionResult, PayrollCalculator, PayrollRun, PayrollSummary};
pub use rates::{
    ContributionRates, ExpenseVatRates, LevyRates, RateTable, RateTableError, WithholdingRates,
};
pub use sales_tax::{SaleBreakdown, compute_sale_breakdown};
pub use vat_return::VatReturn;
pub use withholding::{
    ParseWithholdingCategoryError, WithholdingBreakdown, WithholdingCategory, compute_withholding,
};
