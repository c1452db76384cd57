//! Engine error types.
//!
//! Configuration errors are raised before any ledger line is produced; data
//! errors name the offending row. Nothing here is retryable: the caller must
//! correct the document or its setup and resubmit.

use itc_shared::AppError;
use itc_shared::types::{AccountName, AssetCategoryName, CompanyName, ItemCode, WarehouseName};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::document::{DocumentKind, GstTaxType};
use crate::host::{GstAccountRole, HostError};
use crate::ledger::LedgerValidationError;

/// Errors that can occur while computing an ITC reversal.
#[derive(Debug, Error)]
pub enum ItcError {
    // ========== Configuration Errors ==========
    /// Company master record not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyName),

    /// No GST accounts of the given role are set up for the company.
    #[error("{role} GST accounts are not set up for company {company}")]
    MissingGstAccounts {
        /// Company name.
        company: CompanyName,
        /// Account role.
        role: GstAccountRole,
    },

    /// The input account for one tax component is missing.
    #[error("Input {tax_type} account is not set up for company {company}")]
    MissingGstAccount {
        /// Company name.
        company: CompanyName,
        /// Tax component without an account.
        tax_type: GstTaxType,
    },

    /// Company has no default GST expense account.
    #[error("Default GST Expense Account is not set in company {0}")]
    MissingGstExpenseAccount(CompanyName),

    /// Company has no stock adjustment account.
    #[error("Stock Adjustment Account is not set in company {0}")]
    MissingStockAdjustmentAccount(CompanyName),

    /// Warehouse has no linked stock account.
    #[error("No stock account linked to warehouse {0}")]
    MissingStockAccount(WarehouseName),

    /// Asset category has no usable account.
    #[error("Asset category {0} has no fixed asset account for this company")]
    MissingAssetAccount(AssetCategoryName),

    // ========== Data Errors ==========
    /// Item master record not found.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemCode),

    /// Row #idx: an Actual-charge tax has an amount but no per-item rate.
    #[error(
        "Row #{row}: tax rate is zero for item {item} on account {account} with charge type Actual. \
         Set a tax rate so the item-wise tax can be recovered"
    )]
    ZeroRateForActualCharge {
        /// Tax row index.
        row: usize,
        /// Tax account.
        account: AccountName,
        /// Item key from the item-wise tax detail.
        item: String,
    },

    /// Row #idx: the item-wise tax detail could not be decoded.
    #[error("Row #{row}: invalid item-wise tax detail: {reason}")]
    MalformedItemTaxDetail {
        /// Tax row index.
        row: usize,
        /// What was wrong.
        reason: String,
    },

    /// Row #idx: an ineligible item has zero quantity.
    #[error("Row #{row}: quantity of item {item} cannot be zero")]
    ZeroQuantity {
        /// Item row index.
        row: usize,
        /// Item code.
        item: ItemCode,
    },

    /// Row #idx: a row needs a field that is not set.
    #[error("Row #{row}: {field} is required for item {item}")]
    MissingRowField {
        /// Item row index.
        row: usize,
        /// Item code.
        item: ItemCode,
        /// Missing field name.
        field: &'static str,
    },

    /// Operation called with the wrong document kind.
    #[error("Expected a {expected} but got a {actual}")]
    WrongDocumentKind {
        /// Kind the operation needs.
        expected: DocumentKind,
        /// Kind provided.
        actual: DocumentKind,
    },

    // ========== Internal Errors ==========
    /// The generated lines do not balance.
    #[error("Generated ITC reversal is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedBatch {
        /// Total debit of generated lines.
        debit: Decimal,
        /// Total credit of generated lines.
        credit: Decimal,
    },

    /// A posted batch handed back for cancellation is malformed.
    #[error("Posted batch is invalid: {0}")]
    InvalidPostedBatch(#[from] LedgerValidationError),

    // ========== Host Errors ==========
    /// A host collaborator failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ItcError {
    /// Returns the error code for host responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            Self::MissingGstAccounts { .. } => "MISSING_GST_ACCOUNTS",
            Self::MissingGstAccount { .. } => "MISSING_GST_ACCOUNT",
            Self::MissingGstExpenseAccount(_) => "MISSING_GST_EXPENSE_ACCOUNT",
            Self::MissingStockAdjustmentAccount(_) => "MISSING_STOCK_ADJUSTMENT_ACCOUNT",
            Self::MissingStockAccount(_) => "MISSING_STOCK_ACCOUNT",
            Self::MissingAssetAccount(_) => "MISSING_ASSET_ACCOUNT",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::ZeroRateForActualCharge { .. } => "ZERO_RATE_FOR_ACTUAL_CHARGE",
            Self::MalformedItemTaxDetail { .. } => "MALFORMED_ITEM_TAX_DETAIL",
            Self::ZeroQuantity { .. } => "ZERO_QUANTITY",
            Self::MissingRowField { .. } => "MISSING_ROW_FIELD",
            Self::WrongDocumentKind { .. } => "WRONG_DOCUMENT_KIND",
            Self::UnbalancedBatch { .. } => "UNBALANCED_BATCH",
            Self::InvalidPostedBatch(_) => "INVALID_POSTED_BATCH",
            Self::Host(_) => "HOST_ERROR",
        }
    }

    /// Returns true if the error is a missing-setup problem rather than bad document data.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::CompanyNotFound(_)
                | Self::MissingGstAccounts { .. }
                | Self::MissingGstAccount { .. }
                | Self::MissingGstExpenseAccount(_)
                | Self::MissingStockAdjustmentAccount(_)
                | Self::MissingStockAccount(_)
                | Self::MissingAssetAccount(_)
        )
    }
}

impl From<ItcError> for AppError {
    fn from(err: ItcError) -> Self {
        match &err {
            ItcError::Host(_) => Self::ExternalService(err.to_string()),
            ItcError::UnbalancedBatch { .. } => Self::Internal(err.to_string()),
            ItcError::ItemNotFound(_) => Self::NotFound(err.to_string()),
            _ if err.is_configuration() => Self::Configuration(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
