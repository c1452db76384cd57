//! Per-item GST breakdown.
//!
//! Recovers each item row's rate and amount per GST component from the
//! document's aggregate tax rows.

pub mod resolver;

#[cfg(test)]
mod resolver_props;

pub use resolver::{ItemTaxDetail, TaxBreakdownResolver, item_key, parse_item_wise_tax_detail};
