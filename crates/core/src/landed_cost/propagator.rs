//! Apportioning a bill of entry's ineligible tax into a landed cost voucher.

use std::collections::HashMap;

use itc_shared::types::{AccountName, DocumentName, ItemCode, Precision, RowId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{DocumentKind, TransactionDocument};
use crate::error::ItcError;

/// A voucher row receiving apportioned charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostItem {
    /// Row identifier.
    pub id: RowId,
    /// Item code.
    pub item_code: ItemCode,
    /// Quantity received.
    pub qty: Decimal,
    /// Bill of entry item row this row was created from.
    pub boe_detail: Option<RowId>,
    /// Charges apportioned to this row.
    pub applicable_charges: Decimal,
}

/// An additional cost booked by the voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostTax {
    /// Account the cost is credited to.
    pub expense_account: AccountName,
    /// Description shown on the voucher.
    pub description: String,
    /// Cost amount.
    pub amount: Decimal,
}

/// The target cost-apportionment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostVoucher {
    /// Voucher name.
    pub name: DocumentName,
    /// Rows receiving charges.
    pub items: Vec<LandedCostItem>,
    /// Cost rows.
    pub taxes: Vec<LandedCostTax>,
}

/// Description of the cost row added for ineligible customs tax.
pub const INELIGIBLE_TAX_DESCRIPTION: &str = "Ineligible ITC on Bill of Entry";

/// Carries a bill of entry's ineligible tax into a landed cost voucher.
pub struct LandedCostPropagator {
    precision: Precision,
}

impl LandedCostPropagator {
    /// Creates a propagator rounding apportioned charges to `precision`.
    #[must_use]
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Adds each bill of entry row's ineligible tax to the voucher rows
    /// created from it, in proportion to quantity, and books the total as
    /// one cost row against `gst_expense_account`.
    ///
    /// Meant to run once, when the voucher is created from the bill of
    /// entry. Returns the total apportioned.
    ///
    /// # Errors
    ///
    /// Fails with [`ItcError::WrongDocumentKind`] when `source` is not a
    /// bill of entry, and with [`ItcError::ZeroQuantity`] when an ineligible
    /// source row has no quantity.
    pub fn propagate(
        &self,
        source: &TransactionDocument,
        target: &mut LandedCostVoucher,
        gst_expense_account: &AccountName,
    ) -> Result<Decimal, ItcError> {
        if source.kind != DocumentKind::BillOfEntry {
            return Err(ItcError::WrongDocumentKind {
                expected: DocumentKind::BillOfEntry,
                actual: source.kind,
            });
        }

        // Cumulative quantity and charge already given to each source row's
        // voucher rows, so that split rows add up to the source amount.
        let mut allocated: HashMap<RowId, (Decimal, Decimal)> = HashMap::new();
        let mut shares = Vec::with_capacity(target.items.len());
        for item in &target.items {
            let Some(source_row) = item
                .boe_detail
                .and_then(|id| source.items.iter().find(|row| row.id == id))
            else {
                shares.push(Decimal::ZERO);
                continue;
            };
            if source_row.ineligible_tax_amount.is_zero() {
                shares.push(Decimal::ZERO);
                continue;
            }
            if source_row.qty.is_zero() {
                return Err(ItcError::ZeroQuantity {
                    row: source_row.idx,
                    item: source_row.item_code.clone(),
                });
            }

            let (covered, given) = allocated.entry(source_row.id).or_default();
            *covered += item.qty;
            let cumulative = self
                .precision
                .round(source_row.ineligible_tax_amount * *covered / source_row.qty);
            let share = cumulative - *given;
            *given = cumulative;
            debug!(
                voucher = %target.name,
                item = %item.item_code,
                share = %share,
                "Apportioned ineligible customs tax"
            );
            shares.push(share);
        }

        let mut total = Decimal::ZERO;
        for (item, share) in target.items.iter_mut().zip(shares) {
            item.applicable_charges += share;
            total += share;
        }

        if !total.is_zero() {
            target.taxes.push(LandedCostTax {
                expense_account: gst_expense_account.clone(),
                description: INELIGIBLE_TAX_DESCRIPTION.to_string(),
                amount: total,
            });
            info!(
                voucher = %target.name,
                bill_of_entry = %source.name,
                total = %total,
                "Added ineligible ITC to landed cost voucher"
            );
        }

        Ok(total)
    }
}
