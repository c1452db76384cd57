//! Per-pass memoization of host lookups.

use std::collections::HashMap;

use itc_shared::types::{AccountName, AssetCategoryName, CompanyName, ItemCode, WarehouseName};

use super::{
    AssetCategoryRecord, CompanyRecord, GstAccountRole, GstAccounts, Host, ItemRecord, RootType,
};
use crate::error::ItcError;

/// Host lookups cached for the duration of one computation pass.
///
/// The company record and its input GST accounts are loaded eagerly; all
/// other lookups load on first use and are never repeated within the pass.
pub struct PassContext<'h, H: Host + ?Sized> {
    host: &'h H,
    company: CompanyRecord,
    input_accounts: GstAccounts,
    items: HashMap<ItemCode, ItemRecord>,
    root_types: HashMap<AccountName, Option<RootType>>,
    warehouse_accounts: Option<HashMap<WarehouseName, AccountName>>,
    asset_categories: HashMap<AssetCategoryName, AssetCategoryRecord>,
}

impl<'h, H: Host + ?Sized> PassContext<'h, H> {
    /// Loads the company record and its input GST accounts.
    ///
    /// # Errors
    ///
    /// Fails if the company does not exist or has no input GST accounts.
    pub fn load(host: &'h H, company: &CompanyName) -> Result<Self, ItcError> {
        let company_record = host
            .company(company)?
            .ok_or_else(|| ItcError::CompanyNotFound(company.clone()))?;

        let input_accounts = host
            .gst_accounts(company, GstAccountRole::Input)?
            .filter(|accounts| !accounts.is_empty())
            .ok_or_else(|| ItcError::MissingGstAccounts {
                company: company.clone(),
                role: GstAccountRole::Input,
            })?;

        Ok(Self {
            host,
            company: company_record,
            input_accounts,
            items: HashMap::new(),
            root_types: HashMap::new(),
            warehouse_accounts: None,
            asset_categories: HashMap::new(),
        })
    }

    /// The company record.
    pub fn company(&self) -> &CompanyRecord {
        &self.company
    }

    /// The company's input GST accounts.
    pub fn input_accounts(&self) -> &GstAccounts {
        &self.input_accounts
    }

    /// The company's default GST expense account.
    pub fn gst_expense_account(&self) -> Result<AccountName, ItcError> {
        self.company
            .default_gst_expense_account
            .clone()
            .ok_or_else(|| ItcError::MissingGstExpenseAccount(self.company.name.clone()))
    }

    /// The company's stock adjustment account.
    pub fn stock_adjustment_account(&self) -> Result<AccountName, ItcError> {
        self.company
            .stock_adjustment_account
            .clone()
            .ok_or_else(|| ItcError::MissingStockAdjustmentAccount(self.company.name.clone()))
    }

    /// The item master record for `item_code`.
    pub fn item(&mut self, item_code: &ItemCode) -> Result<&ItemRecord, ItcError> {
        if !self.items.contains_key(item_code) {
            let record = self
                .host
                .item(item_code)?
                .ok_or_else(|| ItcError::ItemNotFound(item_code.clone()))?;
            self.items.insert(item_code.clone(), record);
        }
        self.items
            .get(item_code)
            .ok_or_else(|| ItcError::ItemNotFound(item_code.clone()))
    }

    /// Root type of `account`, if the chart of accounts knows it.
    pub fn root_type(&mut self, account: &AccountName) -> Result<Option<RootType>, ItcError> {
        if let Some(root_type) = self.root_types.get(account) {
            return Ok(*root_type);
        }
        let root_type = self.host.root_type(account)?;
        self.root_types.insert(account.clone(), root_type);
        Ok(root_type)
    }

    /// Stock account linked to `warehouse`.
    pub fn stock_account(&mut self, warehouse: &WarehouseName) -> Result<AccountName, ItcError> {
        if self.warehouse_accounts.is_none() {
            let map = self.host.warehouse_account_map(&self.company.name)?;
            self.warehouse_accounts = Some(map);
        }
        self.warehouse_accounts
            .as_ref()
            .and_then(|map| map.get(warehouse))
            .cloned()
            .ok_or_else(|| ItcError::MissingStockAccount(warehouse.clone()))
    }

    /// Account that receives an asset's cost for `category`.
    pub fn asset_account(&mut self, category: &AssetCategoryName) -> Result<AccountName, ItcError> {
        if !self.asset_categories.contains_key(category) {
            let record = self
                .host
                .asset_category(category, &self.company.name)?
                .ok_or_else(|| ItcError::MissingAssetAccount(category.clone()))?;
            self.asset_categories.insert(category.clone(), record);
        }
        self.asset_categories
            .get(category)
            .and_then(AssetCategoryRecord::receiving_account)
            .cloned()
            .ok_or_else(|| ItcError::MissingAssetAccount(category.clone()))
    }
}
