//! Transaction documents handed to the engine by the host.

pub mod types;

pub use types::{
    ChargeType, DocumentKind, GstTaxType, IneligibilityReason, ItemRow, ItemTax, ItemTaxes,
    TaxRow, TransactionDocument, VoucherRef,
};
