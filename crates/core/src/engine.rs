//! Host-facing entry points.
//!
//! Each call is one computation pass: host lookups are made at most once,
//! every derived row field is recomputed from the document's base fields,
//! and nothing is written to a collaborator unless the whole pass succeeds.

use itc_shared::EngineConfig;
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::{DocumentKind, IneligibilityReason, TransactionDocument};
use crate::eligibility::EligibilityClassifier;
use crate::error::ItcError;
use crate::host::{Host, PassContext};
use crate::landed_cost::{LandedCostPropagator, LandedCostVoucher};
use crate::ledger::{CancellationService, LedgerEntry};
use crate::reversal::ReversalEntryGenerator;
use crate::tax_breakdown::TaxBreakdownResolver;
use crate::valuation::ValuationAdjuster;

/// The ineligible ITC engine bound to one host and configuration.
pub struct ItcEngine<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a EngineConfig,
}

impl<'a, H: Host + ?Sized> ItcEngine<'a, H> {
    /// Creates an engine over `host`.
    #[must_use]
    pub fn new(host: &'a H, config: &'a EngineConfig) -> Self {
        Self { host, config }
    }

    /// Recomputes item taxes, eligibility and the document's ineligibility
    /// reason, and returns the reason.
    ///
    /// # Errors
    ///
    /// See [`ItcError`].
    pub fn set_ineligibility_reason(
        &self,
        doc: &mut TransactionDocument,
    ) -> Result<IneligibilityReason, ItcError> {
        let mut ctx = PassContext::load(self.host, &doc.company)?;
        self.assess(doc, &mut ctx)?;
        Ok(doc.ineligibility_reason)
    }

    /// Recomputes item taxes and eligibility, then folds the ineligible
    /// amounts into each row's valuation rate.
    ///
    /// # Errors
    ///
    /// See [`ItcError`].
    pub fn update_valuation_rate(&self, doc: &mut TransactionDocument) -> Result<(), ItcError> {
        let mut ctx = PassContext::load(self.host, &doc.company)?;
        self.assess(doc, &mut ctx)?;
        ValuationAdjuster::new(self.config.precision.valuation_rate).apply(doc)
    }

    /// Returns `base` with the reversal lines for `doc` added, then reposts
    /// stock and updates asset costs as the reversal requires.
    ///
    /// A document without ineligible items gets `base` back and causes no
    /// collaborator writes.
    ///
    /// # Errors
    ///
    /// See [`ItcError`]. No lines are returned and nothing is written on
    /// failure before the batch closes.
    pub fn get_gl_entries(
        &self,
        doc: &mut TransactionDocument,
        base: Vec<LedgerEntry>,
    ) -> Result<Vec<LedgerEntry>, ItcError> {
        let mut ctx = PassContext::load(self.host, &doc.company)?;
        self.assess(doc, &mut ctx)?;
        if !doc.has_ineligible_items() {
            debug!(document = %doc.name, "No ineligible items, ledger lines unchanged");
            return Ok(base);
        }

        ValuationAdjuster::new(self.config.precision.valuation_rate).apply(doc)?;
        let reversal = ReversalEntryGenerator::from(doc.kind).generate(
            doc,
            &mut ctx,
            base,
            self.config.precision.currency,
        )?;
        ValuationAdjuster::sync_external(self.host, doc, &reversal.updates)?;
        Ok(reversal.entries)
    }

    /// Apportions a submitted bill of entry's ineligible tax into the
    /// landed cost voucher created from it. Returns the total added.
    ///
    /// # Errors
    ///
    /// Fails if `source` is not a bill of entry, or if the company has no
    /// GST expense account when there is tax to carry.
    pub fn update_landed_cost_voucher(
        &self,
        source: &TransactionDocument,
        target: &mut LandedCostVoucher,
    ) -> Result<Decimal, ItcError> {
        if source.kind != DocumentKind::BillOfEntry {
            return Err(ItcError::WrongDocumentKind {
                expected: DocumentKind::BillOfEntry,
                actual: source.kind,
            });
        }
        if !source.has_ineligible_items() {
            return Ok(Decimal::ZERO);
        }

        let ctx = PassContext::load(self.host, &source.company)?;
        let gst_expense = ctx.gst_expense_account()?;
        LandedCostPropagator::new(self.config.precision.currency).propagate(
            source,
            target,
            &gst_expense,
        )
    }

    /// Lines cancelling a previously posted batch.
    ///
    /// # Errors
    ///
    /// Fails if the posted batch is malformed.
    pub fn cancel_gl_entries(&self, posted: &[LedgerEntry]) -> Result<Vec<LedgerEntry>, ItcError> {
        Ok(CancellationService::cancel_entries(
            posted,
            self.config.precision.currency,
        )?)
    }

    fn assess(
        &self,
        doc: &mut TransactionDocument,
        ctx: &mut PassContext<'_, H>,
    ) -> Result<(), ItcError> {
        TaxBreakdownResolver::new(ctx.input_accounts(), self.config.precision.currency)
            .apply(&mut doc.items, &doc.taxes)?;
        EligibilityClassifier::new(&self.config.place_of_supply)
            .classify(doc, ctx)?
            .apply(doc);
        Ok(())
    }
}
