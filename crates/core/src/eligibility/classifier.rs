//! ITC eligibility classification.

use std::collections::BTreeMap;

use itc_shared::config::PlaceOfSupplyConfig;
use itc_shared::types::{AccountName, RowId};
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::{DocumentKind, IneligibilityReason, ItemRow, TransactionDocument};
use crate::error::ItcError;
use crate::host::{GstAccounts, Host, PassContext};

/// Computation result for one item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAssessment {
    /// Row identifier.
    pub row: RowId,
    /// 1-based row position.
    pub idx: usize,
    /// Whether the item maintains stock.
    pub is_stock_item: bool,
    /// Whether the row purchases a fixed asset (row or master flag).
    pub is_fixed_asset: bool,
    /// Tax to reverse for this row.
    pub ineligible_tax_amount: Decimal,
    /// Tax to reverse per input account.
    pub ineligible_taxes: BTreeMap<AccountName, Decimal>,
}

impl ItemAssessment {
    /// Returns true if the row carries tax to reverse.
    #[must_use]
    pub fn is_ineligible(&self) -> bool {
        !self.ineligible_tax_amount.is_zero()
    }
}

/// Computation result for one document, one entry per item row in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityAssessment {
    /// Document-level reason.
    pub reason: IneligibilityReason,
    /// Per-row results.
    pub items: Vec<ItemAssessment>,
}

impl EligibilityAssessment {
    /// Returns true if any row carries tax to reverse.
    #[must_use]
    pub fn has_ineligible_items(&self) -> bool {
        self.items.iter().any(ItemAssessment::is_ineligible)
    }

    /// Total tax to reverse across rows.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.ineligible_tax_amount).sum()
    }

    /// Writes the results onto the document's rows.
    pub fn apply(&self, doc: &mut TransactionDocument) {
        doc.ineligibility_reason = self.reason;
        for (row, assessment) in doc.items.iter_mut().zip(&self.items) {
            row.is_stock_item = assessment.is_stock_item;
            row.is_fixed_asset = assessment.is_fixed_asset;
            row.ineligible_tax_amount = assessment.ineligible_tax_amount;
            row.ineligible_taxes = assessment.ineligible_taxes.clone();
        }
    }
}

/// Decides which item rows lose their input tax credit.
///
/// An item is ineligible when its master record blocks it under Section
/// 17(5), or when the whole document is restricted because its place of
/// supply lies outside the company's registration state.
pub struct EligibilityClassifier<'c> {
    place_of_supply: &'c PlaceOfSupplyConfig,
}

impl<'c> EligibilityClassifier<'c> {
    /// Creates a classifier with the given place-of-supply rules.
    #[must_use]
    pub fn new(place_of_supply: &'c PlaceOfSupplyConfig) -> Self {
        Self { place_of_supply }
    }

    /// Returns true if the document's place of supply differs from the
    /// state of the company GSTIN.
    ///
    /// Documents missing either value, or supplied to an exempt sentinel
    /// state, are never restricted.
    #[must_use]
    pub fn is_pos_restricted(&self, doc: &TransactionDocument) -> bool {
        let Some(pos_state) = doc.place_of_supply.as_deref().and_then(state_code) else {
            return false;
        };
        let Some(company_state) = doc.company_gstin.as_deref().and_then(state_code) else {
            return false;
        };
        if self.place_of_supply.is_exempt(pos_state) {
            return false;
        }
        pos_state != company_state
    }

    /// Classifies every item row of `doc`.
    ///
    /// Rows are expected to carry their resolved per-component taxes.
    ///
    /// # Errors
    ///
    /// Fails if an item master record is missing, or if a row carries tax
    /// for a component without an input account.
    pub fn classify<H: Host + ?Sized>(
        &self,
        doc: &TransactionDocument,
        ctx: &mut PassContext<'_, H>,
    ) -> Result<EligibilityAssessment, ItcError> {
        let pos_restricted = self.is_pos_restricted(doc);
        let mut any_blocked = false;
        let mut items = Vec::with_capacity(doc.items.len());

        for row in &doc.items {
            let (blocked, is_stock_item, master_fixed_asset) = {
                let record = ctx.item(&row.item_code)?;
                (
                    record.is_ineligible_for_itc,
                    record.is_stock_item,
                    record.is_fixed_asset,
                )
            };
            any_blocked |= blocked;

            let ineligible_taxes = if blocked || pos_restricted {
                input_tax_breakdown(doc, row, ctx.input_accounts())?
            } else {
                BTreeMap::new()
            };
            let ineligible_tax_amount: Decimal = ineligible_taxes.values().copied().sum();

            if !ineligible_tax_amount.is_zero() {
                debug!(
                    document = %doc.name,
                    item = %row.item_code,
                    row = row.idx,
                    amount = %ineligible_tax_amount,
                    "Item is ineligible for ITC"
                );
            }

            items.push(ItemAssessment {
                row: row.id,
                idx: row.idx,
                is_stock_item,
                is_fixed_asset: row.is_fixed_asset || master_fixed_asset,
                ineligible_tax_amount,
                ineligible_taxes,
            });
        }

        let reason = if pos_restricted {
            IneligibilityReason::PlaceOfSupply
        } else if any_blocked {
            IneligibilityReason::Section17_5
        } else {
            IneligibilityReason::None
        };

        Ok(EligibilityAssessment { reason, items })
    }
}

/// First two characters of a place of supply or GSTIN.
fn state_code(value: &str) -> Option<&str> {
    value.get(..2).filter(|code| !code.trim().is_empty())
}

/// Input-account breakdown of a row's tax. Bills of entry only carry
/// customs-levied components.
fn input_tax_breakdown(
    doc: &TransactionDocument,
    row: &ItemRow,
    accounts: &GstAccounts,
) -> Result<BTreeMap<AccountName, Decimal>, ItcError> {
    let mut taxes = BTreeMap::new();
    for (tax_type, tax) in row.taxes.iter() {
        if tax.amount.is_zero() {
            continue;
        }
        if doc.kind == DocumentKind::BillOfEntry && !tax_type.applies_to_imports() {
            continue;
        }
        let account = accounts
            .account(tax_type)
            .ok_or_else(|| ItcError::MissingGstAccount {
                company: doc.company.clone(),
                tax_type,
            })?;
        *taxes.entry(account.clone()).or_insert(Decimal::ZERO) += tax.amount;
    }
    Ok(taxes)
}
