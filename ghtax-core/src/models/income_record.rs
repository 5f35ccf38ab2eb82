use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly earnings of one employee, as entered on the payroll form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub basic_income: Decimal,
    pub allowances: Decimal,
    pub tax_relief: Decimal,

    /// Voluntary Tier 3 contribution as a fraction of gross income.
    #[serde(default)]
    pub tier3_rate: Option<Decimal>,
}

impl IncomeRecord {
    pub fn new(
        basic_income: Decimal,
        allowances: Decimal,
        tax_relief: Decimal,
    ) -> Self {
        Self {
            basic_income,
            allowances,
            tax_relief,
            tier3_rate: None,
        }
    }

    pub fn with_tier3_rate(
        mut self,
        rate: Decimal,
    ) -> Self {
        self.tier3_rate = Some(rate);
        self
    }
}
