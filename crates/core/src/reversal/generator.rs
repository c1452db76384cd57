//! Reversal ledger lines for the three document kinds.
//!
//! For each ineligible item the generator, in order:
//! 1. reverses the booked input tax into the GST expense account
//!    (invoices and bills of entry only, receipts book no input tax),
//! 2. redirects the amount from GST expense into the item's economic
//!    account (stock, fixed asset, or expense),
//! 3. on returns of redirected stock items, nets the amount out of the
//!    stock and stock adjustment lines already in the batch.
//!
//! All sides flip for returns except the step 3 net-out pair. Stock reposts
//! and asset cost updates are collected, not performed, so that nothing
//! external happens unless the whole batch closes.

use itc_shared::types::{AccountName, ItemCode, Precision};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::lines::ItemLines;
use crate::document::{DocumentKind, ItemRow, TransactionDocument, VoucherRef};
use crate::error::ItcError;
use crate::host::{Host, PassContext};
use crate::ledger::{BatchTotals, EntryType, GlBatch, LedgerEntry};

/// Per-kind reversal strategy. The set is closed: one variant per document
/// kind the engine handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReversalEntryGenerator {
    /// Purchase invoice.
    Invoice,
    /// Purchase receipt.
    Receipt,
    /// Customs bill of entry.
    BillOfEntry,
}

impl From<DocumentKind> for ReversalEntryGenerator {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::PurchaseInvoice => Self::Invoice,
            DocumentKind::PurchaseReceipt => Self::Receipt,
            DocumentKind::BillOfEntry => Self::BillOfEntry,
        }
    }
}

/// Where an item's reversed tax ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The item's expense account.
    Expense(AccountName),
    /// The receiving warehouse's stock account.
    Stock(AccountName),
    /// The asset category's receiving account.
    Asset(AccountName),
}

impl RedirectTarget {
    /// The target account.
    #[must_use]
    pub fn account(&self) -> &AccountName {
        match self {
            Self::Expense(account) | Self::Stock(account) | Self::Asset(account) => account,
        }
    }
}

/// Asset purchase cost to write once the batch is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCostUpdate {
    /// Item row position.
    pub idx: usize,
    /// Asset item code.
    pub item_code: ItemCode,
    /// New purchase cost (the row's adjusted valuation rate).
    pub purchase_cost: Decimal,
}

/// Writes to stock and asset collaborators implied by a reversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalUpdates {
    /// Voucher whose stock ledger must be reposted.
    pub repost: Option<VoucherRef>,
    /// Asset purchase costs to overwrite.
    pub assets: Vec<AssetCostUpdate>,
}

impl ExternalUpdates {
    /// Returns true if nothing needs to be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repost.is_none() && self.assets.is_empty()
    }
}

/// Output of one reversal pass.
#[derive(Debug, Clone)]
pub struct Reversal {
    /// Base lines with the reversal lines added and netted.
    pub entries: Vec<LedgerEntry>,
    /// Totals of the lines the reversal added.
    pub generated: BatchTotals,
    /// Pending collaborator writes.
    pub updates: ExternalUpdates,
}

impl ReversalEntryGenerator {
    /// Returns true if input tax was booked on the document and must be
    /// moved out of the input accounts.
    #[must_use]
    pub fn reverses_booked_input_tax(self) -> bool {
        !matches!(self, Self::Receipt)
    }

    /// Returns true if the document moves stock.
    #[must_use]
    pub fn moves_stock(self, doc: &TransactionDocument) -> bool {
        match self {
            Self::Invoice => doc.update_stock,
            Self::Receipt => true,
            Self::BillOfEntry => false,
        }
    }

    /// Adds the reversal lines for `doc` on top of `base`.
    ///
    /// Item rows must already carry their ineligible amounts. A document
    /// without ineligible items gets `base` back untouched and no pending
    /// writes.
    ///
    /// # Errors
    ///
    /// Fails on missing accounts, or if the added lines do not balance.
    /// Nothing is returned on failure.
    pub fn generate<H: Host + ?Sized>(
        self,
        doc: &TransactionDocument,
        ctx: &mut PassContext<'_, H>,
        base: Vec<LedgerEntry>,
        precision: Precision,
    ) -> Result<Reversal, ItcError> {
        if !doc.has_ineligible_items() {
            return Ok(Reversal {
                entries: base,
                generated: BatchTotals::default(),
                updates: ExternalUpdates::default(),
            });
        }

        let gst_expense = ctx.gst_expense_account()?;
        let cost_center = doc
            .cost_center
            .clone()
            .or_else(|| ctx.company().cost_center.clone());

        let mut batch = GlBatch::new(base);
        let mut updates = ExternalUpdates::default();

        for row in doc.items.iter().filter(|row| !row.ineligible_tax_amount.is_zero()) {
            let amount = row.ineligible_tax_amount;
            let lines = ItemLines::new(row, cost_center.clone(), doc.is_return);

            if self.reverses_booked_input_tax()
                && let Some(first_input) = row.ineligible_taxes.keys().next()
            {
                batch.post(lines.debit(&gst_expense, amount, first_input));
                for (account, share) in &row.ineligible_taxes {
                    batch.post(lines.credit(account, *share, &gst_expense));
                }
            }

            let target = self.redirect_target(doc, row, ctx)?;
            debug!(
                document = %doc.name,
                item = %row.item_code,
                row = row.idx,
                amount = %amount,
                redirect = ?target,
                "Reversing ineligible ITC"
            );
            let Some(target) = target else {
                continue;
            };

            let account = target.account();
            batch.post(lines.debit(account, amount, &gst_expense));
            batch.post(lines.credit(&gst_expense, amount, account));

            match &target {
                RedirectTarget::Stock(stock_account) => {
                    updates.repost = Some(doc.voucher());
                    if doc.is_return {
                        let adjustment = ctx.stock_adjustment_account()?;
                        batch.net_out(lines.fixed(
                            stock_account,
                            EntryType::Debit,
                            amount,
                            &adjustment,
                        ));
                        batch.net_out(lines.fixed(
                            &adjustment,
                            EntryType::Credit,
                            amount,
                            stock_account,
                        ));
                    }
                }
                RedirectTarget::Asset(_) => updates.assets.push(AssetCostUpdate {
                    idx: row.idx,
                    item_code: row.item_code.clone(),
                    purchase_cost: row.valuation_rate,
                }),
                RedirectTarget::Expense(_) => {}
            }
        }

        let generated = batch.generated_totals();
        let entries = batch.close(precision)?;

        info!(
            document = %doc.name,
            kind = %doc.kind,
            is_return = doc.is_return,
            debit = %generated.debit,
            credit = %generated.credit,
            lines = entries.len(),
            "Generated ineligible ITC reversal"
        );

        Ok(Reversal {
            entries,
            generated,
            updates,
        })
    }

    /// Account the reversed amount moves into, if any.
    fn redirect_target<H: Host + ?Sized>(
        self,
        doc: &TransactionDocument,
        row: &ItemRow,
        ctx: &mut PassContext<'_, H>,
    ) -> Result<Option<RedirectTarget>, ItcError> {
        let perpetual = ctx.company().enable_perpetual_inventory;
        let moves_stock = self.moves_stock(doc);

        match self {
            Self::BillOfEntry => Ok(None),
            Self::Receipt | Self::Invoice => {
                if moves_stock && row.is_fixed_asset {
                    return asset_target(row, ctx).map(Some);
                }
                if moves_stock && row.is_stock_item && perpetual {
                    return stock_target(row, ctx).map(Some);
                }
                if self == Self::Invoice {
                    return expense_target(row, ctx);
                }
                Ok(None)
            }
        }
    }
}

fn asset_target<H: Host + ?Sized>(
    row: &ItemRow,
    ctx: &mut PassContext<'_, H>,
) -> Result<RedirectTarget, ItcError> {
    let category = row
        .asset_category
        .as_ref()
        .ok_or_else(|| missing_field(row, "asset_category"))?;
    Ok(RedirectTarget::Asset(ctx.asset_account(category)?))
}

fn stock_target<H: Host + ?Sized>(
    row: &ItemRow,
    ctx: &mut PassContext<'_, H>,
) -> Result<RedirectTarget, ItcError> {
    let warehouse = row
        .warehouse
        .as_ref()
        .ok_or_else(|| missing_field(row, "warehouse"))?;
    Ok(RedirectTarget::Stock(ctx.stock_account(warehouse)?))
}

/// Invoice rows booked to a balance-sheet account (received-not-billed
/// clearing accounts) were already redirected when the goods arrived.
fn expense_target<H: Host + ?Sized>(
    row: &ItemRow,
    ctx: &mut PassContext<'_, H>,
) -> Result<Option<RedirectTarget>, ItcError> {
    let account = row
        .expense_account
        .as_ref()
        .ok_or_else(|| missing_field(row, "expense_account"))?;
    match ctx.root_type(account)? {
        Some(root_type) if root_type.is_balance_sheet() => Ok(None),
        _ => Ok(Some(RedirectTarget::Expense(account.clone()))),
    }
}

fn missing_field(row: &ItemRow, field: &'static str) -> ItcError {
    ItcError::MissingRowField {
        row: row.idx,
        item: row.item_code.clone(),
        field,
    }
}
