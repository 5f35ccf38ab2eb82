//! Debit/credit balance check for journal entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::JournalLine;
use crate::calculations::common::round_half_up;
use crate::calculations::rates::JOURNAL_BALANCE_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalValidation {
    pub is_balanced: bool,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl JournalValidation {
    /// Debits minus credits.
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Sums the debit and credit columns of `lines` and reports whether they balance.
///
/// An entry is balanced when the two totals differ by less than
/// [`JOURNAL_BALANCE_TOLERANCE`]. A line carrying both a debit and a credit
/// contributes to both totals; rejecting such lines is left to data entry.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ghtax_core::JournalLine;
/// use ghtax_core::calculations::validate_journal_entry;
///
/// let lines = [JournalLine::debit(dec!(100)), JournalLine::credit(dec!(99))];
/// let result = validate_journal_entry(&lines);
///
/// assert!(!result.is_balanced);
/// assert_eq!(result.difference(), dec!(1));
/// ```
pub fn validate_journal_entry(lines: &[JournalLine]) -> JournalValidation {
    let (total_debit, total_credit) = lines
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), line| {
            (debit + line.debit, credit + line.credit)
        });

    JournalValidation {
        is_balanced: (total_debit - total_credit).abs() < JOURNAL_BALANCE_TOLERANCE,
        total_debit: round_half_up(total_debit),
        total_credit: round_half_up(total_credit),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn balanced_two_line_entry() {
        let lines = [JournalLine::debit(dec!(100)), JournalLine::credit(dec!(100))];

        assert_eq!(
            validate_journal_entry(&lines),
            JournalValidation {
                is_balanced: true,
                total_debit: dec!(100),
                total_credit: dec!(100),
            }
        );
    }

    #[test]
    fn unbalanced_two_line_entry() {
        let lines = [JournalLine::debit(dec!(100)), JournalLine::credit(dec!(99))];

        let result = validate_journal_entry(&lines);

        assert!(!result.is_balanced);
        assert_eq!(result.total_debit, dec!(100));
        assert_eq!(result.total_credit, dec!(99));
    }

    #[test]
    fn difference_below_tolerance_is_balanced() {
        let lines = [
            JournalLine::debit(dec!(33.333)),
            JournalLine::debit(dec!(33.333)),
            JournalLine::debit(dec!(33.333)),
            JournalLine::credit(dec!(100.00)),
        ];

        assert!(validate_journal_entry(&lines).is_balanced);
    }

    #[test]
    fn difference_of_one_cent_is_unbalanced() {
        let lines = [JournalLine::debit(dec!(100.01)), JournalLine::credit(dec!(100.00))];

        assert!(!validate_journal_entry(&lines).is_balanced);
    }

    #[test]
    fn multi_line_entry_sums_each_column() {
        let lines = [
            JournalLine::debit(dec!(1195.00)).with_account("Cash"),
            JournalLine::credit(dec!(1000.00)).with_account("Room revenue"),
            JournalLine::credit(dec!(125.00)).with_account("VAT payable"),
            JournalLine::credit(dec!(70.00)).with_account("Levies payable"),
        ];

        let result = validate_journal_entry(&lines);

        assert!(result.is_balanced);
        assert_eq!(result.total_credit, dec!(1195.00));
    }

    #[test]
    fn line_with_both_sides_counts_twice() {
        let line = JournalLine {
            account: None,
            description: None,
            debit: dec!(50),
            credit: dec!(50),
        };

        let result = validate_journal_entry(&[line]);

        assert!(result.is_balanced);
        assert_eq!(result.total_debit, dec!(50));
        assert_eq!(result.total_credit, dec!(50));
    }

    #[test]
    fn empty_entry_is_trivially_balanced() {
        let result = validate_journal_entry(&[]);

        assert!(result.is_balanced);
        assert_eq!(result.difference(), dec!(0));
    }
}
