mod loader;

pub use loader::{
    BandLoader, ExpenseLoader, ExpenseRecord, JournalLineRecord, JournalLoader, LoaderError,
    PayrollInputRecord, PayrollLoader, SaleLoader, SaleRecord, TaxBandRecord,
};
