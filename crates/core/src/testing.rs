//! In-memory host and document fixtures for tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use itc_shared::types::{
    AccountName, AssetCategoryName, AssetId, CompanyName, CostCenterName, DocumentName, ItemCode,
    RowId, WarehouseName,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::document::{
    ChargeType, DocumentKind, GstTaxType, IneligibilityReason, ItemRow, ItemTaxes, TaxRow,
    TransactionDocument, VoucherRef,
};
use crate::host::{
    AssetCategories, AssetCategoryRecord, AssetRegistry, ChartOfAccounts, CompanyMaster,
    CompanyRecord, GstAccountRole, GstAccounts, HostError, ItemMaster, ItemRecord, RootType,
    StockLedger, WarehouseAccounts,
};

pub const GST_EXPENSE: &str = "GST Expense - TC";
pub const STOCK_ADJUSTMENT: &str = "Stock Adjustment - TC";
pub const STOCK_IN_HAND: &str = "Stock In Hand - TC";
pub const STORES: &str = "Stores - TC";
pub const VEHICLES: &str = "Vehicles - TC";
pub const OFFICE_EXPENSES: &str = "Office Expenses - TC";
pub const SRBNB: &str = "Stock Received But Not Billed - TC";
pub const INPUT_CGST: &str = "Input Tax CGST - TC";
pub const INPUT_SGST: &str = "Input Tax SGST - TC";
pub const INPUT_IGST: &str = "Input Tax IGST - TC";
pub const INPUT_CESS: &str = "Input Tax Cess - TC";
pub const INPUT_CESS_NON_ADVOL: &str = "Input Tax Cess Non-Advol - TC";

fn asset_id() -> AssetId {
    AssetId::from_uuid(Uuid::from_u128(1))
}

/// A host backed by plain maps, recording every lookup and write.
pub struct FakeHost {
    pub company: CompanyRecord,
    pub input_accounts: Option<GstAccounts>,
    pub items: HashMap<ItemCode, ItemRecord>,
    pub root_types: HashMap<AccountName, RootType>,
    pub warehouses: HashMap<WarehouseName, AccountName>,
    pub asset_categories: HashMap<AssetCategoryName, AssetCategoryRecord>,
    pub asset: Option<AssetId>,
    pub reposts: RefCell<Vec<VoucherRef>>,
    pub asset_updates: RefCell<Vec<(AssetId, Decimal)>>,
    calls: RefCell<HashMap<&'static str, usize>>,
}

impl FakeHost {
    pub fn company_name() -> CompanyName {
        CompanyName::from("Test Company")
    }

    pub fn asset_id() -> AssetId {
        asset_id()
    }

    /// A company with one warehouse, one asset category and five items:
    /// `WIDGET` (stock), `SERVICE` (non-stock), and the Section 17(5) items
    /// `FOOD` (non-stock), `CAR` (fixed asset), `BLOCKED-STOCK` (stock).
    pub fn standard() -> Self {
        let item = |code: &str, blocked: bool, stock: bool, asset: bool| {
            (
                ItemCode::from(code),
                ItemRecord {
                    item_code: ItemCode::from(code),
                    is_ineligible_for_itc: blocked,
                    is_stock_item: stock,
                    is_fixed_asset: asset,
                },
            )
        };

        Self {
            company: CompanyRecord {
                name: Self::company_name(),
                default_gst_expense_account: Some(AccountName::from(GST_EXPENSE)),
                cost_center: Some(CostCenterName::from("Main - TC")),
                enable_perpetual_inventory: true,
                stock_adjustment_account: Some(AccountName::from(STOCK_ADJUSTMENT)),
            },
            input_accounts: Some(GstAccounts {
                role: GstAccountRole::Input,
                accounts: BTreeMap::from([
                    (GstTaxType::Igst, AccountName::from(INPUT_IGST)),
                    (GstTaxType::Cgst, AccountName::from(INPUT_CGST)),
                    (GstTaxType::Sgst, AccountName::from(INPUT_SGST)),
                    (GstTaxType::Cess, AccountName::from(INPUT_CESS)),
                    (
                        GstTaxType::CessNonAdvol,
                        AccountName::from(INPUT_CESS_NON_ADVOL),
                    ),
                ]),
            }),
            items: HashMap::from([
                item("WIDGET", false, true, false),
                item("SERVICE", false, false, false),
                item("FOOD", true, false, false),
                item("CAR", true, false, true),
                item("BLOCKED-STOCK", true, true, false),
            ]),
            root_types: HashMap::from([
                (AccountName::from(OFFICE_EXPENSES), RootType::Expense),
                (AccountName::from("Cost of Goods Sold - TC"), RootType::Expense),
                (AccountName::from(SRBNB), RootType::Liability),
            ]),
            warehouses: HashMap::from([(
                WarehouseName::from(STORES),
                AccountName::from(STOCK_IN_HAND),
            )]),
            asset_categories: HashMap::from([(
                AssetCategoryName::from("Vehicles"),
                AssetCategoryRecord {
                    name: AssetCategoryName::from("Vehicles"),
                    enable_cwip_accounting: false,
                    fixed_asset_account: Some(AccountName::from(VEHICLES)),
                    capital_work_in_progress_account: None,
                },
            )]),
            asset: Some(asset_id()),
            reposts: RefCell::new(Vec::new()),
            asset_updates: RefCell::new(Vec::new()),
            calls: RefCell::new(HashMap::new()),
        }
    }

    /// Number of times the named lookup was performed.
    pub fn lookups(&self, name: &str) -> usize {
        self.calls.borrow().get(name).copied().unwrap_or(0)
    }

    fn record(&self, name: &'static str) {
        *self.calls.borrow_mut().entry(name).or_insert(0) += 1;
    }
}

impl ChartOfAccounts for FakeHost {
    fn gst_accounts(
        &self,
        company: &CompanyName,
        role: GstAccountRole,
    ) -> Result<Option<GstAccounts>, HostError> {
        self.record("gst_accounts");
        if *company != self.company.name || role != GstAccountRole::Input {
            return Ok(None);
        }
        Ok(self.input_accounts.clone())
    }

    fn root_type(&self, account: &AccountName) -> Result<Option<RootType>, HostError> {
        self.record("root_type");
        Ok(self.root_types.get(account).copied())
    }
}

impl CompanyMaster for FakeHost {
    fn company(&self, company: &CompanyName) -> Result<Option<CompanyRecord>, HostError> {
        self.record("company");
        Ok((*company == self.company.name).then(|| self.company.clone()))
    }
}

impl ItemMaster for FakeHost {
    fn item(&self, item_code: &ItemCode) -> Result<Option<ItemRecord>, HostError> {
        self.record("item");
        Ok(self.items.get(item_code).cloned())
    }
}

impl WarehouseAccounts for FakeHost {
    fn warehouse_account_map(
        &self,
        _company: &CompanyName,
    ) -> Result<HashMap<WarehouseName, AccountName>, HostError> {
        self.record("warehouse_account_map");
        Ok(self.warehouses.clone())
    }
}

impl AssetCategories for FakeHost {
    fn asset_category(
        &self,
        category: &AssetCategoryName,
        _company: &CompanyName,
    ) -> Result<Option<AssetCategoryRecord>, HostError> {
        self.record("asset_category");
        Ok(self.asset_categories.get(category).cloned())
    }
}

impl StockLedger for FakeHost {
    fn repost_voucher(&self, voucher: &VoucherRef) -> Result<(), HostError> {
        self.reposts.borrow_mut().push(voucher.clone());
        Ok(())
    }
}

impl AssetRegistry for FakeHost {
    fn find_asset(
        &self,
        _item_code: &ItemCode,
        _voucher: &VoucherRef,
    ) -> Result<Option<AssetId>, HostError> {
        self.record("find_asset");
        Ok(self.asset)
    }

    fn update_purchase_cost(
        &self,
        asset: AssetId,
        purchase_cost: Decimal,
    ) -> Result<(), HostError> {
        self.asset_updates.borrow_mut().push((asset, purchase_cost));
        Ok(())
    }
}

/// An intra-state document of `kind` with no rows.
pub fn document(kind: DocumentKind) -> TransactionDocument {
    TransactionDocument {
        kind,
        name: DocumentName::from("DOC-0001"),
        company: FakeHost::company_name(),
        cost_center: None,
        is_return: false,
        update_stock: false,
        place_of_supply: Some("29-Karnataka".to_string()),
        company_gstin: Some("29AAACT1234A1Z5".to_string()),
        ineligibility_reason: IneligibilityReason::None,
        items: Vec::new(),
        taxes: Vec::new(),
    }
}

/// An item row with stock qty equal to qty and the standard warehouse,
/// expense account and asset category filled in.
pub fn item_row(idx: usize, item_code: &str, qty: Decimal, taxable_value: Decimal) -> ItemRow {
    ItemRow {
        id: RowId::new(),
        idx,
        item_code: ItemCode::from(item_code),
        qty,
        stock_qty: qty,
        taxable_value,
        is_fixed_asset: false,
        asset_category: Some(AssetCategoryName::from("Vehicles")),
        warehouse: Some(WarehouseName::from(STORES)),
        expense_account: Some(AccountName::from(OFFICE_EXPENSES)),
        cost_center: None,
        base_valuation_rate: Decimal::ZERO,
        valuation_rate: Decimal::ZERO,
        taxes: ItemTaxes::default(),
        is_stock_item: false,
        ineligible_tax_amount: Decimal::ZERO,
        ineligible_taxes: BTreeMap::new(),
    }
}

/// A tax row whose item-wise detail lists `(item_key, rate, amount)` entries.
pub fn tax_row(
    idx: usize,
    account: &str,
    charge_type: ChargeType,
    details: &[(&str, Decimal, Decimal)],
) -> TaxRow {
    let tax_amount = details.iter().map(|(_, _, amount)| *amount).sum();
    let body = details
        .iter()
        .map(|(key, rate, amount)| format!("\"{key}\": [{rate}, {amount}]"))
        .collect::<Vec<_>>()
        .join(", ");
    TaxRow {
        idx,
        account_head: AccountName::from(account),
        charge_type,
        tax_amount,
        item_wise_tax_detail: Some(format!("{{{body}}}")),
    }
}

/// CGST and SGST rows on net total with identical item-wise detail.
pub fn cgst_sgst_rows(details: &[(&str, Decimal, Decimal)]) -> Vec<TaxRow> {
    vec![
        tax_row(1, INPUT_CGST, ChargeType::OnNetTotal, details),
        tax_row(2, INPUT_SGST, ChargeType::OnNetTotal, details),
    ]
}
