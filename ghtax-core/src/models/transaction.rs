use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{ExpenseBreakdown, SaleBreakdown, VatType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub reference: String,
    pub breakdown: SaleBreakdown,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleTransaction {
    pub date: NaiveDate,
    pub reference: String,
    pub breakdown: SaleBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub reference: String,
    pub vat_type: VatType,
    pub breakdown: ExpenseBreakdown,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenseTransaction {
    pub date: NaiveDate,
    pub reference: String,
    pub vat_type: VatType,
    pub breakdown: ExpenseBreakdown,
}
