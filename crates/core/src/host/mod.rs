//! Seams to the host accounting system.
//!
//! The engine owns no data. Master records are read and the stock ledger and
//! asset register are written through these traits. [`PassContext`] wraps a
//! [`Host`] so each lookup happens at most once per computation pass.

pub mod context;

use std::collections::{BTreeMap, HashMap};

use itc_shared::types::{
    AccountName, AssetCategoryName, AssetId, CompanyName, CostCenterName, ItemCode, WarehouseName,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{GstTaxType, VoucherRef};

pub use context::PassContext;

/// Failure reported by a host collaborator.
#[derive(Debug, Error)]
#[error("Host collaborator failed: {0}")]
pub struct HostError(pub String);

impl HostError {
    /// Creates a host error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Role a GST account plays for a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstAccountRole {
    /// Tax paid on purchases (creditable).
    Input,
    /// Tax collected on sales.
    Output,
    /// Tax payable under reverse charge.
    ReverseCharge,
}

impl std::fmt::Display for GstAccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Output => write!(f, "Output"),
            Self::ReverseCharge => write!(f, "Reverse Charge"),
        }
    }
}

/// The GST accounts of one role for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstAccounts {
    /// Account role.
    pub role: GstAccountRole,
    /// Account per tax component.
    pub accounts: BTreeMap<GstTaxType, AccountName>,
}

impl GstAccounts {
    /// Returns the account booked for `tax_type`.
    #[must_use]
    pub fn account(&self, tax_type: GstTaxType) -> Option<&AccountName> {
        self.accounts.get(&tax_type)
    }

    /// Returns the tax component an account books, if it is one of these accounts.
    #[must_use]
    pub fn tax_type_of(&self, account: &AccountName) -> Option<GstTaxType> {
        self.accounts
            .iter()
            .find(|(_, candidate)| *candidate == account)
            .map(|(tax_type, _)| *tax_type)
    }

    /// Returns true if no account is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Root classification of an account in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootType {
    /// Asset.
    Asset,
    /// Liability.
    Liability,
    /// Equity.
    Equity,
    /// Income.
    Income,
    /// Expense.
    Expense,
}

impl RootType {
    /// Returns true for balance-sheet roots (asset, liability, equity).
    #[must_use]
    pub fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

/// Company master fields the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name.
    pub name: CompanyName,
    /// Account that absorbs ineligible tax.
    pub default_gst_expense_account: Option<AccountName>,
    /// Default cost center.
    pub cost_center: Option<CostCenterName>,
    /// Whether stock is valued through the ledger.
    pub enable_perpetual_inventory: bool,
    /// Stock adjustment (cost of goods sold) account.
    pub stock_adjustment_account: Option<AccountName>,
}

/// Item master fields the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item code.
    pub item_code: ItemCode,
    /// Blocked from ITC under Section 17(5).
    pub is_ineligible_for_itc: bool,
    /// Maintains stock.
    pub is_stock_item: bool,
    /// Purchased as a fixed asset.
    pub is_fixed_asset: bool,
}

/// Asset category accounts for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCategoryRecord {
    /// Category name.
    pub name: AssetCategoryName,
    /// Whether assets are first booked to capital work in progress.
    pub enable_cwip_accounting: bool,
    /// Fixed asset account.
    pub fixed_asset_account: Option<AccountName>,
    /// Capital work in progress account.
    pub capital_work_in_progress_account: Option<AccountName>,
}

impl AssetCategoryRecord {
    /// Account receiving the asset's cost: CWIP when enabled, else the fixed asset account.
    #[must_use]
    pub fn receiving_account(&self) -> Option<&AccountName> {
        if self.enable_cwip_accounting {
            self.capital_work_in_progress_account.as_ref()
        } else {
            self.fixed_asset_account.as_ref()
        }
    }
}

/// Chart of accounts lookups.
pub trait ChartOfAccounts {
    /// GST accounts of `role` for `company`.
    fn gst_accounts(
        &self,
        company: &CompanyName,
        role: GstAccountRole,
    ) -> Result<Option<GstAccounts>, HostError>;

    /// Root type of `account`.
    fn root_type(&self, account: &AccountName) -> Result<Option<RootType>, HostError>;
}

/// Company master lookups.
pub trait CompanyMaster {
    /// The company record.
    fn company(&self, company: &CompanyName) -> Result<Option<CompanyRecord>, HostError>;
}

/// Item master lookups.
pub trait ItemMaster {
    /// The item record.
    fn item(&self, item_code: &ItemCode) -> Result<Option<ItemRecord>, HostError>;
}

/// Warehouse to stock account mapping.
pub trait WarehouseAccounts {
    /// Stock account per warehouse for `company`.
    fn warehouse_account_map(
        &self,
        company: &CompanyName,
    ) -> Result<HashMap<WarehouseName, AccountName>, HostError>;
}

/// Asset category lookups.
pub trait AssetCategories {
    /// The category's accounts for `company`.
    fn asset_category(
        &self,
        category: &AssetCategoryName,
        company: &CompanyName,
    ) -> Result<Option<AssetCategoryRecord>, HostError>;
}

/// Stock ledger re-sequencing.
pub trait StockLedger {
    /// Cancels and rebuilds the stock ledger entries of `voucher`.
    fn repost_voucher(&self, voucher: &VoucherRef) -> Result<(), HostError>;
}

/// Asset register access.
pub trait AssetRegistry {
    /// The asset created for `item_code` by `voucher`.
    fn find_asset(
        &self,
        item_code: &ItemCode,
        voucher: &VoucherRef,
    ) -> Result<Option<AssetId>, HostError>;

    /// Overwrites the asset's recorded purchase cost.
    fn update_purchase_cost(
        &self,
        asset: AssetId,
        purchase_cost: Decimal,
    ) -> Result<(), HostError>;
}

/// Everything the engine needs from the host.
pub trait Host:
    ChartOfAccounts
    + CompanyMaster
    + ItemMaster
    + WarehouseAccounts
    + AssetCategories
    + StockLedger
    + AssetRegistry
{
}

impl<T: ?Sized> Host for T where
    T: ChartOfAccounts
        + CompanyMaster
        + ItemMaster
        + WarehouseAccounts
        + AssetCategories
        + StockLedger
        + AssetRegistry
{
}
