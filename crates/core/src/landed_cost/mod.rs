//! Landed cost voucher propagation for bills of entry.

pub mod propagator;

pub use propagator::{
    INELIGIBLE_TAX_DESCRIPTION, LandedCostItem, LandedCostPropagator, LandedCostTax,
    LandedCostVoucher,
};
