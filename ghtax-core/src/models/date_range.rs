use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar dates used to filter stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(
        from: NaiveDate,
        to: NaiveDate,
    ) -> Self {
        Self { from, to }
    }

    pub fn contains(
        &self,
        date: NaiveDate,
    ) -> bool {
        date >= self.from && date <= self.to
    }

    /// `true` when `range` is `None` or contains `date`.
    pub fn matches(
        range: Option<&DateRange>,
        date: NaiveDate,
    ) -> bool {
        range.is_none_or(|r| r.contains(date))
    }
}
