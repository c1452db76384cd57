//! Cancellation of a posted batch.
//!
//! Cancelling mirrors exactly what was posted. It never recomputes the
//! reversal, so master data edited since submission cannot cause drift.

use itc_shared::types::Precision;

use super::entry::LedgerEntry;
use super::validation::{LedgerValidationError, validate_entries};

/// Stateless service for cancelling posted batches.
pub struct CancellationService;

impl CancellationService {
    /// Create cancelling entries by swapping debits and credits.
    ///
    /// For each posted entry:
    /// - Debits become credits
    /// - Credits become debits
    /// - Account, cost center and counter account are preserved
    /// - Remarks are prefixed with "Cancellation: "
    ///
    /// # Errors
    ///
    /// Returns an error if the posted batch itself does not balance.
    pub fn cancel_entries(
        posted: &[LedgerEntry],
        precision: Precision,
    ) -> Result<Vec<LedgerEntry>, LedgerValidationError> {
        validate_entries(posted, precision)?;

        Ok(posted
            .iter()
            .map(|entry| {
                let mut mirror = entry.mirrored();
                mirror.remarks = Some(format!(
                    "Cancellation: {}",
                    entry.remarks.clone().unwrap_or_default()
                ));
                mirror
            })
            .collect())
    }
}
