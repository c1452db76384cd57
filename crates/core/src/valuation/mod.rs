//! Valuation adjustment for reversed tax.

pub mod adjuster;

pub use adjuster::{ValuationAdjuster, ValuationMode};
