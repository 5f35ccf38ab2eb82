pub mod calculations;
pub mod db;
pub mod ledger;
pub mod models;

pub use calculations::RateTable;
pub use db::repository::{LedgerRepository, RepositoryError};
pub use ledger::{Employee, Ledger, LedgerError};
pub use models::*;
