//! Decimal precision and rounding.
//!
//! CRITICAL: Never use floating-point for tax calculations.
//! Every rounded figure in the engine goes through [`Precision::round`] so a
//! single strategy (banker's rounding) applies everywhere.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used when rounding an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Precision(pub u32);

impl Precision {
    /// Two decimal places, the default for currency amounts.
    pub const CURRENCY: Self = Self(2);

    /// Creates a precision of `decimal_places`.
    #[must_use]
    pub const fn new(decimal_places: u32) -> Self {
        Self(decimal_places)
    }

    /// Rounds `value` to this precision using Banker's Rounding.
    #[must_use]
    pub fn round(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.0, RoundingStrategy::MidpointNearestEven)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::CURRENCY
    }
}
