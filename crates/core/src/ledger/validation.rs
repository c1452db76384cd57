//! Balance validation for ledger batches.

use itc_shared::types::Precision;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::entry::LedgerEntry;

/// Validation errors for ledger batches.
#[derive(Debug, Error)]
pub enum LedgerValidationError {
    /// Batch entries do not balance.
    #[error("Batch is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// An entry has a negative side, or both sides set.
    #[error("Entry on account {0} must have exactly one positive side")]
    InvalidAmount(String),
}

/// Debit and credit totals of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl BatchTotals {
    /// Sums the entries.
    #[must_use]
    pub fn of(entries: &[LedgerEntry]) -> Self {
        Self {
            debit: entries.iter().map(|e| e.debit).sum(),
            credit: entries.iter().map(|e| e.credit).sum(),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if debits equal credits at `precision`.
    #[must_use]
    pub fn is_balanced(&self, precision: Precision) -> bool {
        precision.round(self.difference()).is_zero()
    }
}

/// Validates that a batch is balanced and every line is well-formed.
///
/// An empty batch is balanced.
///
/// # Errors
///
/// Returns an error if a line is malformed or the batch does not balance.
pub fn validate_entries(
    entries: &[LedgerEntry],
    precision: Precision,
) -> Result<BatchTotals, LedgerValidationError> {
    for entry in entries {
        let negative = entry.debit < Decimal::ZERO || entry.credit < Decimal::ZERO;
        let both_sides = !entry.debit.is_zero() && !entry.credit.is_zero();
        if negative || both_sides {
            return Err(LedgerValidationError::InvalidAmount(
                entry.account.to_string(),
            ));
        }
    }

    let totals = BatchTotals::of(entries);
    if !totals.is_balanced(precision) {
        return Err(LedgerValidationError::Unbalanced {
            debits: totals.debit,
            credits: totals.credit,
        });
    }

    Ok(totals)
}
