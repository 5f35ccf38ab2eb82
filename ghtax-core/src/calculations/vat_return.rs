//! Periodic VAT return: output VAT on sales less input VAT on expenses.
//!
//! NHIL, GETFund, COVID-19 and tourism levies are reported alongside but
//! are not offset by input VAT.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::expense_vat::ExpenseBreakdown;
use crate::calculations::sales_tax::SaleBreakdown;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatReturn {
    pub sale_count: usize,
    pub expense_count: usize,
    pub taxable_sales: Decimal,
    pub output_vat: Decimal,
    pub output_levies: Decimal,
    pub input_vat: Decimal,
    /// Output VAT minus input VAT; negative means a credit is due.
    pub net_vat_payable: Decimal,
}

impl VatReturn {
    pub fn from_breakdowns(
        sales: &[SaleBreakdown],
        expenses: &[ExpenseBreakdown],
    ) -> Self {
        let taxable_sales = sales.iter().map(|s| s.subtotal).sum::<Decimal>();
        let output_vat = sales.iter().map(|s| s.vat_amount).sum::<Decimal>();
        let output_levies = sales.iter().map(SaleBreakdown::levies).sum::<Decimal>();
        let input_vat = expenses.iter().map(|e| e.input_vat).sum::<Decimal>();

        Self {
            sale_count: sales.len(),
            expense_count: expenses.len(),
            taxable_sales,
            output_vat,
            output_levies,
            input_vat,
            net_vat_payable: output_vat - input_vat,
        }
    }

    /// Total due to the revenue authority: VAT (if positive) plus levies.
    pub fn total_payable(&self) -> Decimal {
        self.net_vat_payable.max(Decimal::ZERO) + self.output_levies
    }
}
