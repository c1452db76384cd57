//! Ineligible input tax credit reversal engine.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Master data arrives and stock/asset writes leave through the traits in [`host`].
//!
//! # Modules
//!
//! - `tax_breakdown` - Per-item GST from aggregate tax rows
//! - `eligibility` - Section 17(5) and place-of-supply restrictions
//! - `reversal` - Reversal ledger lines per document kind
//! - `valuation` - Valuation rate and asset cost adjustment
//! - `landed_cost` - Bill of entry propagation into landed cost vouchers
//! - `ledger` - Ledger lines, batches, balance checks and cancellation
//! - `engine` - Host-facing entry points

pub mod document;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod host;
pub mod landed_cost;
pub mod ledger;
pub mod reversal;
pub mod tax_breakdown;
pub mod valuation;

#[cfg(test)]
mod testing;

pub use engine::ItcEngine;
pub use error::ItcError;
