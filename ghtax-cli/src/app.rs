//! Command handlers behind the `ghtax` binary.
//!
//! Each handler runs one calculation or load and returns the report text;
//! `main` only parses arguments, opens files and prints.

use std::fmt::Write as _;
use std::io::Read;

use anyhow::Result;
use chrono::NaiveDate;
use ghtax_core::calculations::{
    PayeSchedule, PayrollCalculator, VatType, WithholdingCategory, compute_expense_vat,
    compute_sale_breakdown, compute_withholding,
};
use ghtax_core::db::{MemoryRepositoryFactory, RepositoryRegistry};
use ghtax_core::{DateRange, IncomeRecord, Ledger, LedgerError, LedgerRepository, RateTable};
use ghtax_data::{ExpenseLoader, JournalLoader, PayrollLoader, SaleLoader};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::render_rate_table;

/// Registry with every storage backend this build supports.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry
}

fn row(
    out: &mut String,
    label: &str,
    amount: Decimal,
) -> std::fmt::Result {
    writeln!(out, "{label:<26}{amount:>14.2}")
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

pub fn paye_report(
    rates: &RateTable,
    taxable_income: Decimal,
) -> Result<String> {
    let schedule = PayeSchedule::new(rates.paye_bands.clone())?;
    let mut out = String::new();

    row(&mut out, "Taxable income", taxable_income)?;
    row(&mut out, "PAYE", schedule.compute_paye(taxable_income))?;
    writeln!(
        out,
        "{:<26}{:>13}%",
        "Marginal rate",
        percent(schedule.marginal_rate(taxable_income))
    )?;
    Ok(out)
}

pub fn payslip_report(
    calculator: &PayrollCalculator,
    income: &IncomeRecord,
) -> Result<String> {
    let result = calculator.compute(income)?;
    let mut out = String::new();

    row(&mut out, "Gross income", result.gross_income)?;
    row(&mut out, "Taxable income", result.taxable_income)?;
    row(&mut out, "PAYE", result.paye_tax)?;
    row(&mut out, "SSNIT (employee)", result.ssnit_contribution)?;
    row(&mut out, "Net income", result.net_income)?;
    writeln!(out)?;
    row(&mut out, "Tier 2 pension", result.tier2_pension)?;
    if !result.tier3_contribution.is_zero() {
        row(&mut out, "Tier 3 contribution", result.tier3_contribution)?;
    }
    row(&mut out, "SSNIT (employer)", result.employer_ssnit)?;
    Ok(out)
}

/// Loads a payroll CSV as payslips dated `pay_date` and renders them with
/// the period totals.
pub async fn payroll_report<R: LedgerRepository + ?Sized>(
    ledger: &Ledger<'_, R>,
    input: impl Read,
    pay_date: NaiveDate,
) -> Result<String> {
    let records = PayrollLoader::parse(input)?;
    let saved = PayrollLoader::load(ledger, pay_date, &records).await?;
    let summary = ledger
        .payroll_summary(Some(DateRange::new(pay_date, pay_date)))
        .await?;

    let mut out = String::new();
    writeln!(
        out,
        "{:<8}{:<22}{:>12}{:>12}{:>12}{:>12}",
        "ID", "Name", "Gross", "PAYE", "SSNIT", "Net"
    )?;
    for record in &saved {
        let r = &record.result;
        writeln!(
            out,
            "{:<8}{:<22}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
            record.employee_id,
            record.employee_name,
            r.gross_income,
            r.paye_tax,
            r.ssnit_contribution,
            r.net_income
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Employees: {}", summary.employees)?;
    row(&mut out, "Total gross", summary.total_gross)?;
    row(&mut out, "Total PAYE", summary.total_paye)?;
    row(&mut out, "Total net", summary.total_net)?;
    row(&mut out, "SSNIT remittance", summary.total_ssnit_remittance())?;
    row(&mut out, "Tier 2 remittance", summary.total_tier2)?;
    Ok(out)
}

pub fn sale_report(
    rates: &RateTable,
    base_amount: Decimal,
) -> Result<String> {
    let levies = &rates.levies;
    let breakdown = compute_sale_breakdown(base_amount, levies)?;
    let mut out = String::new();

    row(&mut out, "Subtotal", breakdown.subtotal)?;
    row(&mut out, &format!("VAT ({}%)", percent(levies.vat)), breakdown.vat_amount)?;
    row(&mut out, &format!("NHIL ({}%)", percent(levies.nhil)), breakdown.nhil_amount)?;
    row(
        &mut out,
        &format!("GETFund ({}%)", percent(levies.getfund)),
        breakdown.getfund_amount,
    )?;
    row(&mut out, &format!("COVID-19 ({}%)", percent(levies.covid)), breakdown.covid_amount)?;
    row(
        &mut out,
        &format!("Tourism ({}%)", percent(levies.tourism)),
        breakdown.tourism_amount,
    )?;
    row(&mut out, "Total taxes", breakdown.total_taxes)?;
    row(&mut out, "Total", breakdown.total_amount)?;
    Ok(out)
}

pub fn expense_report(
    rates: &RateTable,
    gross_amount: Decimal,
    vat_type: VatType,
) -> Result<String> {
    let breakdown = compute_expense_vat(gross_amount, vat_type, &rates.expense_vat)?;
    let mut out = String::new();

    writeln!(out, "{:<26}{:>14}", "VAT type", vat_type.as_str())?;
    row(&mut out, "VAT-exclusive amount", breakdown.vat_exclusive_amount)?;
    row(&mut out, "Input VAT", breakdown.input_vat)?;
    Ok(out)
}

pub fn withholding_report(
    rates: &RateTable,
    gross_amount: Decimal,
    category: WithholdingCategory,
) -> Result<String> {
    let breakdown = compute_withholding(gross_amount, category, &rates.withholding)?;
    let mut out = String::new();

    row(&mut out, "Gross payment", breakdown.gross_amount)?;
    row(
        &mut out,
        &format!("Withheld ({category}, {}%)", percent(breakdown.rate)),
        breakdown.tax_withheld,
    )?;
    row(&mut out, "Net payable", breakdown.net_payable)?;
    Ok(out)
}

/// Posts every entry in a journal CSV. Unbalanced entries are reported and
/// skipped; any other ledger error aborts the load.
pub async fn journal_report<R: LedgerRepository + ?Sized>(
    ledger: &Ledger<'_, R>,
    input: impl Read,
) -> Result<String> {
    let entries = JournalLoader::entries(&JournalLoader::parse(input)?);
    let mut out = String::new();
    let mut rejected = 0;

    for entry in entries {
        let reference = entry.reference.clone();
        match ledger.post_journal_entry(entry).await {
            Ok(saved) => {
                let validation = saved.validation();
                writeln!(
                    out,
                    "{reference:<12} posted    debits {:>12.2}  credits {:>12.2}",
                    validation.total_debit, validation.total_credit
                )?;
            }
            Err(LedgerError::Unbalanced {
                total_debit,
                total_credit,
                ..
            }) => {
                rejected += 1;
                writeln!(
                    out,
                    "{reference:<12} REJECTED  debits {total_debit:>12.2}  credits {total_credit:>12.2}  off by {:.2}",
                    total_debit - total_credit
                )?;
            }
            Err(other) => return Err(other.into()),
        }
    }

    if rejected > 0 {
        warn!(rejected, "some journal entries were not posted");
    }
    writeln!(out)?;
    writeln!(out, "{rejected} entries rejected")?;
    Ok(out)
}

/// Loads sales and expenses and renders the VAT return for `range`.
pub async fn vat_return_report<R: LedgerRepository + ?Sized>(
    ledger: &Ledger<'_, R>,
    sales: impl Read,
    expenses: impl Read,
    range: Option<DateRange>,
) -> Result<String> {
    let sales = SaleLoader::parse(sales)?;
    let expenses = ExpenseLoader::parse(expenses)?;
    SaleLoader::load(ledger, &sales).await?;
    ExpenseLoader::load(ledger, &expenses).await?;

    let vat_return = ledger.vat_return(range).await?;
    let mut out = String::new();

    match range {
        Some(range) => writeln!(out, "Period {} to {}", range.from, range.to)?,
        None => writeln!(out, "All periods")?,
    }
    writeln!(
        out,
        "{} sales, {} expenses",
        vat_return.sale_count, vat_return.expense_count
    )?;
    row(&mut out, "Taxable sales", vat_return.taxable_sales)?;
    row(&mut out, "Output VAT", vat_return.output_vat)?;
    row(&mut out, "Input VAT", vat_return.input_vat)?;
    row(&mut out, "Net VAT", vat_return.net_vat_payable)?;
    row(&mut out, "Levies", vat_return.output_levies)?;
    row(&mut out, "Total payable", vat_return.total_payable())?;
    Ok(out)
}

pub fn rates_report(rates: &RateTable) -> Result<String> {
    render_rate_table(rates)
}
