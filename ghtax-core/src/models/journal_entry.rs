use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{JournalValidation, validate_journal_entry};

/// A single debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl JournalLine {
    pub fn debit(amount: Decimal) -> Self {
        Self {
            account: None,
            description: None,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(amount: Decimal) -> Self {
        Self {
            account: None,
            description: None,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    pub fn with_account(
        mut self,
        account: impl Into<String>,
    ) -> Self {
        self.account = Some(account.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub reference: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub lines: Vec<JournalLine>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn validation(&self) -> JournalValidation {
        validate_journal_entry(&self.lines)
    }
}

/// For posting new entries (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub reference: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub lines: Vec<JournalLine>,
}

impl NewJournalEntry {
    pub fn validation(&self) -> JournalValidation {
        validate_journal_entry(&self.lines)
    }
}
