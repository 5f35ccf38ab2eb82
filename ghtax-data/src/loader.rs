use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use ghtax_core::calculations::{ParseVatTypeError, PayeSchedule, RateTableError, VatType};
use ghtax_core::{
    Employee, ExpenseTransaction, IncomeRecord, JournalEntry, JournalLine, Ledger, LedgerError,
    LedgerRepository, NewJournalEntry, PayrollRecord, SaleTransaction, TaxBand,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading CSV input.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid VAT type on expense '{reference}': {source}")]
    InvalidVatType {
        reference: String,
        source: ParseVatTypeError,
    },

    #[error("Invalid PAYE bands: {0}")]
    Rates(#[from] RateTableError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_optional_decimal(deserializer).map(Option::unwrap_or_default)
}

fn parse_records<T: DeserializeOwned, R: Read>(
    reader: R,
    kind: &str,
) -> Result<Vec<T>, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    debug!(count = records.len(), kind, "parsed CSV records");
    Ok(records)
}

// ─────────────────────────────────────────────────────────────────────────────
// PAYE bands
// ─────────────────────────────────────────────────────────────────────────────

/// A single row of a PAYE band table.
///
/// - `lower_bound`: monthly chargeable income where the band starts
/// - `upper_bound`: where it ends (empty for the unbounded top band)
/// - `rate`: marginal rate as a decimal (e.g. 0.175 for 17.5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBandRecord {
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

pub struct BandLoader;

impl BandLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBandRecord>, LoaderError> {
        parse_records(reader, "PAYE band")
    }

    /// Builds a validated schedule from parsed rows, in file order.
    pub fn schedule(records: &[TaxBandRecord]) -> Result<PayeSchedule, LoaderError> {
        let bands = records
            .iter()
            .map(|r| TaxBand::new(r.lower_bound, r.upper_bound, r.rate))
            .collect();

        Ok(PayeSchedule::new(bands)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// payroll
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PayrollInputRecord {
    pub employee_id: String,
    pub name: String,
    pub basic_income: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub allowances: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub tax_relief: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub tier3_rate: Option<Decimal>,
}

impl PayrollInputRecord {
    pub fn income(&self) -> IncomeRecord {
        IncomeRecord {
            basic_income: self.basic_income,
            allowances: self.allowances,
            tax_relief: self.tax_relief,
            tier3_rate: self.tier3_rate,
        }
    }
}

pub struct PayrollLoader;

impl PayrollLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PayrollInputRecord>, LoaderError> {
        parse_records(reader, "payroll")
    }

    /// Computes and stores one payslip per record, all dated `pay_date`.
    ///
    /// Stops at the first record the ledger rejects; payslips stored before
    /// it are kept.
    pub async fn load<R: LedgerRepository + ?Sized>(
        ledger: &Ledger<'_, R>,
        pay_date: NaiveDate,
        records: &[PayrollInputRecord],
    ) -> Result<Vec<PayrollRecord>, LoaderError> {
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let employee = Employee {
                id: record.employee_id.clone(),
                name: record.name.clone(),
            };
            saved.push(
                ledger
                    .record_payroll(employee, pay_date, record.income())
                    .await?,
            );
        }

        Ok(saved)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// journal
// ─────────────────────────────────────────────────────────────────────────────

/// One line of a journal CSV. Lines sharing an `entry` reference form one
/// journal entry. An empty `debit` or `credit` cell reads as zero.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JournalLineRecord {
    pub entry: String,
    pub date: NaiveDate,
    pub account: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub debit: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub credit: Decimal,
}

pub struct JournalLoader;

impl JournalLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<JournalLineRecord>, LoaderError> {
        parse_records(reader, "journal line")
    }

    /// Groups lines into entries by reference, in the order each reference
    /// first appears. An entry takes its date from its first line.
    pub fn entries(records: &[JournalLineRecord]) -> Vec<NewJournalEntry> {
        let mut entries: Vec<NewJournalEntry> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let line = JournalLine {
                account: record.account.clone(),
                description: record.description.clone(),
                debit: record.debit,
                credit: record.credit,
            };

            match index.get(record.entry.as_str()) {
                Some(&i) => entries[i].lines.push(line),
                None => {
                    index.insert(record.entry.as_str(), entries.len());
                    entries.push(NewJournalEntry {
                        reference: record.entry.clone(),
                        date: record.date,
                        description: None,
                        lines: vec![line],
                    });
                }
            }
        }

        entries
    }

    /// Posts every entry, stopping at the first one the ledger rejects.
    pub async fn load<R: LedgerRepository + ?Sized>(
        ledger: &Ledger<'_, R>,
        entries: Vec<NewJournalEntry>,
    ) -> Result<Vec<JournalEntry>, LoaderError> {
        let mut posted = Vec::with_capacity(entries.len());
        for entry in entries {
            posted.push(ledger.post_journal_entry(entry).await?);
        }
        Ok(posted)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// sales and expenses
// ─────────────────────────────────────────────────────────────────────────────

/// A VAT-exclusive sale.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub reference: String,
    pub base_amount: Decimal,
}

pub struct SaleLoader;

impl SaleLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SaleRecord>, LoaderError> {
        parse_records(reader, "sale")
    }

    pub async fn load<R: LedgerRepository + ?Sized>(
        ledger: &Ledger<'_, R>,
        records: &[SaleRecord],
    ) -> Result<Vec<SaleTransaction>, LoaderError> {
        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            saved.push(
                ledger
                    .record_sale(record.date, record.reference.clone(), record.base_amount)
                    .await?,
            );
        }
        Ok(saved)
    }
}

/// A VAT-inclusive purchase. `vat_type` is matched case-insensitively.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub reference: String,
    pub gross_amount: Decimal,
    pub vat_type: String,
}

impl ExpenseRecord {
    pub fn vat_type(&self) -> Result<VatType, LoaderError> {
        self.vat_type
            .parse()
            .map_err(|source| LoaderError::InvalidVatType {
                reference: self.reference.clone(),
                source,
            })
    }
}

pub struct ExpenseLoader;

impl ExpenseLoader {
    /// Parses expense rows and checks every `vat_type` up front, so a bad
    /// row is reported before anything is stored.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>, LoaderError> {
        let records: Vec<ExpenseRecord> = parse_records(reader, "expense")?;
        for record in &records {
            record.vat_type()?;
        }
        Ok(records)
    }

    pub async fn load<R: LedgerRepository + ?Sized>(
        ledger: &Ledger<'_, R>,
        records: &[ExpenseRecord],
    ) -> Result<Vec<ExpenseTransaction>, LoaderError> {
        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            saved.push(
                ledger
                    .record_expense(
                        record.date,
                        record.reference.clone(),
                        record.gross_amount,
                        record.vat_type()?,
                    )
                    .await?,
            );
        }
        Ok(saved)
    }
}
