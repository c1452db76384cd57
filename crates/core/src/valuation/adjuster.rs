//! Folding reversed tax into valuation.
//!
//! Valuation is always recomputed from the row's base rate, so running the
//! adjustment twice on the same document gives the same rates.

use itc_shared::types::Precision;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::document::{DocumentKind, ItemRow, TransactionDocument};
use crate::error::ItcError;
use crate::host::Host;
use crate::reversal::ExternalUpdates;

/// How the reversed amount combines with the base valuation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValuationMode {
    /// `base ± amount / stock_qty`.
    Additive,
    /// The amount itself. A bill of entry's base covers customs value only
    /// and its tax reaches the goods through a landed cost voucher.
    Replace,
}

impl From<DocumentKind> for ValuationMode {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::BillOfEntry => Self::Replace,
            DocumentKind::PurchaseInvoice | DocumentKind::PurchaseReceipt => Self::Additive,
        }
    }
}

/// Adjusts item valuation rates and syncs stock and asset records.
pub struct ValuationAdjuster {
    precision: Precision,
}

impl ValuationAdjuster {
    /// Creates an adjuster rounding per-unit adjustments to `precision`.
    #[must_use]
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Returns true if the row's cost lands in stock or a fixed asset on
    /// this document.
    #[must_use]
    pub fn is_capitalised(doc: &TransactionDocument, row: &ItemRow) -> bool {
        let goods = row.is_stock_item || row.is_fixed_asset;
        match doc.kind {
            DocumentKind::PurchaseInvoice => doc.update_stock && goods,
            DocumentKind::PurchaseReceipt => goods,
            DocumentKind::BillOfEntry => !row.ineligible_tax_amount.is_zero(),
        }
    }

    /// Rewrites every row's valuation rate from its base rate.
    ///
    /// Rows must already carry their ineligible amounts.
    ///
    /// # Errors
    ///
    /// Fails with [`ItcError::ZeroQuantity`] if an ineligible row has no
    /// stock quantity. Rows are left untouched in that case.
    pub fn apply(&self, doc: &mut TransactionDocument) -> Result<(), ItcError> {
        let mode = ValuationMode::from(doc.kind);
        let rates = doc
            .items
            .iter()
            .map(|row| self.valuation_rate(doc, row, mode))
            .collect::<Result<Vec<_>, _>>()?;

        for (row, rate) in doc.items.iter_mut().zip(rates) {
            if rate != row.base_valuation_rate {
                debug!(
                    document = %doc.name,
                    item = %row.item_code,
                    row = row.idx,
                    base = %row.base_valuation_rate,
                    rate = %rate,
                    "Adjusted valuation rate"
                );
            }
            row.valuation_rate = rate;
        }
        Ok(())
    }

    fn valuation_rate(
        &self,
        doc: &TransactionDocument,
        row: &ItemRow,
        mode: ValuationMode,
    ) -> Result<Decimal, ItcError> {
        let amount = row.ineligible_tax_amount;
        if amount.is_zero() || !Self::is_capitalised(doc, row) {
            return Ok(row.base_valuation_rate);
        }

        match mode {
            ValuationMode::Replace => Ok(amount),
            ValuationMode::Additive => {
                if row.stock_qty.is_zero() {
                    return Err(ItcError::ZeroQuantity {
                        row: row.idx,
                        item: row.item_code.clone(),
                    });
                }
                let per_unit = self.precision.round(amount / row.stock_qty);
                if doc.is_return {
                    Ok(row.base_valuation_rate - per_unit)
                } else {
                    Ok(row.base_valuation_rate + per_unit)
                }
            }
        }
    }

    /// Performs the stock repost and asset cost writes a reversal implies.
    ///
    /// The voucher is reposted at most once. A fixed-asset row without a
    /// linked asset record is logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails if a collaborator write fails.
    pub fn sync_external<H: Host + ?Sized>(
        host: &H,
        doc: &TransactionDocument,
        updates: &ExternalUpdates,
    ) -> Result<(), ItcError> {
        if let Some(voucher) = &updates.repost {
            host.repost_voucher(voucher)?;
            info!(
                document = %voucher.name,
                kind = %voucher.kind,
                "Reposted stock ledger after ITC reversal"
            );
        }

        let voucher = doc.voucher();
        for update in &updates.assets {
            match host.find_asset(&update.item_code, &voucher)? {
                Some(asset) => {
                    host.update_purchase_cost(asset, update.purchase_cost)?;
                    info!(
                        document = %doc.name,
                        item = %update.item_code,
                        asset = %asset,
                        purchase_cost = %update.purchase_cost,
                        "Updated asset purchase cost"
                    );
                }
                None => warn!(
                    document = %doc.name,
                    item = %update.item_code,
                    row = update.idx,
                    "No asset record linked to fixed asset row, purchase cost not updated"
                ),
            }
        }
        Ok(())
    }
}
