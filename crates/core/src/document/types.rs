//! Transaction document domain types.
//!
//! A [`TransactionDocument`] is the purchase-side voucher the host hands to
//! the engine. Item rows are mutated in place by a computation pass; tax rows
//! are read-only input.

use std::collections::BTreeMap;

use itc_shared::types::{
    AccountName, AssetCategoryName, CompanyName, CostCenterName, DocumentName, ItemCode, RowId,
    WarehouseName,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three document kinds the engine reverses ITC for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Purchase invoice (vendor bill).
    PurchaseInvoice,
    /// Purchase receipt (goods received, tax not yet booked).
    PurchaseReceipt,
    /// Customs bill of entry for imported goods.
    BillOfEntry,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PurchaseInvoice => write!(f, "Purchase Invoice"),
            Self::PurchaseReceipt => write!(f, "Purchase Receipt"),
            Self::BillOfEntry => write!(f, "Bill of Entry"),
        }
    }
}

/// A reference to a document as seen by stock/asset collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherRef {
    /// Document kind.
    pub kind: DocumentKind,
    /// Document name.
    pub name: DocumentName,
}

/// GST tax components.
///
/// Ordering is the canonical reporting order and drives iteration order
/// everywhere, which keeps generated batches deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstTaxType {
    /// Integrated GST (inter-state).
    Igst,
    /// Central GST (intra-state).
    Cgst,
    /// State GST (intra-state).
    Sgst,
    /// Ad valorem cess.
    Cess,
    /// Quantity-based cess.
    CessNonAdvol,
}

impl GstTaxType {
    /// Every tax type, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Igst,
        Self::Cgst,
        Self::Sgst,
        Self::Cess,
        Self::CessNonAdvol,
    ];

    /// Returns true if customs levies this component on imports.
    #[must_use]
    pub fn applies_to_imports(self) -> bool {
        matches!(self, Self::Igst | Self::Cess | Self::CessNonAdvol)
    }

    /// Returns true if the rate is per unit of quantity, not a percentage.
    #[must_use]
    pub fn is_quantity_based(self) -> bool {
        matches!(self, Self::CessNonAdvol)
    }
}

impl std::fmt::Display for GstTaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Igst => write!(f, "IGST"),
            Self::Cgst => write!(f, "CGST"),
            Self::Sgst => write!(f, "SGST"),
            Self::Cess => write!(f, "Cess"),
            Self::CessNonAdvol => write!(f, "Cess Non-Advol"),
        }
    }
}

/// How a tax row's amount was computed by the host tax engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeType {
    /// A fixed amount entered directly.
    Actual,
    /// Percentage of the net total.
    OnNetTotal,
    /// Percentage of a previous row's amount.
    OnPreviousRowAmount,
    /// Percentage of a previous row's running total.
    OnPreviousRowTotal,
    /// Amount per item quantity.
    OnItemQuantity,
}

/// Why a document's ITC is restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IneligibilityReason {
    /// Fully eligible.
    #[default]
    #[serde(rename = "")]
    None,
    /// At least one item is blocked by Section 17(5).
    #[serde(rename = "Ineligible As Per Section 17(5)")]
    Section17_5,
    /// Place of supply differs from the company's registration state.
    #[serde(rename = "ITC restricted due to PoS rules")]
    PlaceOfSupply,
}

impl IneligibilityReason {
    /// The text stored on the document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Section17_5 => "Ineligible As Per Section 17(5)",
            Self::PlaceOfSupply => "ITC restricted due to PoS rules",
        }
    }
}

/// Rate and amount of one tax component on one item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemTax {
    /// Rate (percentage, or per-unit for quantity-based cess).
    pub rate: Decimal,
    /// Tax amount.
    pub amount: Decimal,
}

/// Per-component tax of an item row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTaxes(pub BTreeMap<GstTaxType, ItemTax>);

impl ItemTaxes {
    /// Returns the component for `tax_type`, zero if absent.
    #[must_use]
    pub fn get(&self, tax_type: GstTaxType) -> ItemTax {
        self.0.get(&tax_type).copied().unwrap_or_default()
    }

    /// Sets the component for `tax_type`.
    pub fn set(&mut self, tax_type: GstTaxType, tax: ItemTax) {
        self.0.insert(tax_type, tax);
    }

    /// Iterates components in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (GstTaxType, ItemTax)> + '_ {
        self.0.iter().map(|(tax_type, tax)| (*tax_type, *tax))
    }

    /// Sum of all component amounts.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().map(|tax| tax.amount).sum()
    }
}

/// One line item of a transaction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    /// Row identifier, back-referenced by landed cost vouchers.
    pub id: RowId,
    /// 1-based row position, used in error messages.
    pub idx: usize,
    /// Item code.
    pub item_code: ItemCode,
    /// Quantity in the transaction UOM.
    pub qty: Decimal,
    /// Quantity in the stock UOM.
    pub stock_qty: Decimal,
    /// Taxable value of the whole row.
    pub taxable_value: Decimal,
    /// Whether the row purchases a fixed asset.
    pub is_fixed_asset: bool,
    /// Asset category for fixed-asset rows.
    pub asset_category: Option<AssetCategoryName>,
    /// Receiving warehouse for stock rows.
    pub warehouse: Option<WarehouseName>,
    /// Expense (or received-not-billed) account booked for this row.
    pub expense_account: Option<AccountName>,
    /// Row-level cost center override.
    pub cost_center: Option<CostCenterName>,
    /// Valuation rate as computed by the host, before any ITC adjustment.
    pub base_valuation_rate: Decimal,
    /// Valuation rate after ITC adjustment. Written by the engine.
    pub valuation_rate: Decimal,
    /// Per-component tax. Written by the tax breakdown resolver.
    #[serde(default)]
    pub taxes: ItemTaxes,
    /// Whether the item is a stock item. Written by the classifier.
    #[serde(default)]
    pub is_stock_item: bool,
    /// Tax to reverse for this row. Written by the classifier.
    #[serde(default)]
    pub ineligible_tax_amount: Decimal,
    /// Tax to reverse per input account. Written by the classifier.
    #[serde(default)]
    pub ineligible_taxes: BTreeMap<AccountName, Decimal>,
}

/// One tax-ledger line of a transaction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRow {
    /// 1-based row position, used in error messages.
    pub idx: usize,
    /// Account the tax is booked to.
    pub account_head: AccountName,
    /// How the host computed the amount.
    pub charge_type: ChargeType,
    /// Aggregate tax amount of the row.
    pub tax_amount: Decimal,
    /// Serialized `{item_key: [rate, amount]}` map.
    pub item_wise_tax_detail: Option<String>,
}

/// A purchase invoice, purchase receipt, or bill of entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDocument {
    /// Document kind.
    pub kind: DocumentKind,
    /// Document name (voucher number).
    pub name: DocumentName,
    /// Owning company.
    pub company: CompanyName,
    /// Document-level cost center.
    pub cost_center: Option<CostCenterName>,
    /// Whether this is a return (debit note / return receipt).
    pub is_return: bool,
    /// Whether an invoice also moves stock.
    pub update_stock: bool,
    /// Place of supply, e.g. `"29-Karnataka"`.
    pub place_of_supply: Option<String>,
    /// Company GSTIN the document is billed to.
    pub company_gstin: Option<String>,
    /// Why ITC is restricted. Written by the classifier.
    #[serde(default)]
    pub ineligibility_reason: IneligibilityReason,
    /// Item rows, in document order.
    pub items: Vec<ItemRow>,
    /// Tax rows, in document order.
    pub taxes: Vec<TaxRow>,
}

impl TransactionDocument {
    /// Reference used for stock and asset collaborators.
    #[must_use]
    pub fn voucher(&self) -> VoucherRef {
        VoucherRef {
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    /// Returns true if any item row carries tax to reverse.
    #[must_use]
    pub fn has_ineligible_items(&self) -> bool {
        self.items
            .iter()
            .any(|item| !item.ineligible_tax_amount.is_zero())
    }
}
