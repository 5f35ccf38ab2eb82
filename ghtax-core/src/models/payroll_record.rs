use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::ContributionResult;
use crate::models::IncomeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub pay_date: NaiveDate,

    // User-provided values
    pub income: IncomeRecord,

    // Calculated values
    pub result: ContributionResult,

    pub created_at: DateTime<Utc>,
}

/// For creating new payroll records (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayrollRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub pay_date: NaiveDate,
    pub income: IncomeRecord,
    pub result: ContributionResult,
}
