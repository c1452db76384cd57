//! Ledger lines produced by the engine.
//!
//! This module implements:
//! - Ledger entries (debits and credits)
//! - Two-phase batch construction with keyed net-out
//! - Balance validation
//! - Cancellation of a posted batch

pub mod batch;
pub mod cancellation;
pub mod entry;
pub mod validation;

pub use batch::GlBatch;
pub use cancellation::CancellationService;
pub use entry::{EntryType, LedgerEntry};
pub use validation::{BatchTotals, LedgerValidationError, validate_entries};
