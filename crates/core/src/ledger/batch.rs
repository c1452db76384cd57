//! Two-phase ledger batch construction.
//!
//! Phase one appends forward lines. Phase two applies net-out patches keyed
//! by account: a patch folds into the first line already booked to its
//! account, or is appended as a line of its own when the batch has none.
//! Patches never scan or mutate lines except through that one keyed step.

use std::collections::{BTreeMap, BTreeSet};

use itc_shared::types::{AccountName, Precision};

use super::entry::LedgerEntry;
use super::validation::BatchTotals;
use crate::error::ItcError;

/// A batch of ledger lines under construction.
#[derive(Debug, Clone, Default)]
pub struct GlBatch {
    entries: Vec<LedgerEntry>,
    patches: Vec<LedgerEntry>,
    generated: BatchTotals,
}

impl GlBatch {
    /// Starts a batch on top of lines the host already generated.
    #[must_use]
    pub fn new(base: Vec<LedgerEntry>) -> Self {
        Self {
            entries: base,
            patches: Vec::new(),
            generated: BatchTotals::default(),
        }
    }

    /// Appends a forward line. Zero lines are skipped.
    pub fn post(&mut self, entry: LedgerEntry) {
        if entry.is_zero() {
            return;
        }
        self.track(&entry);
        self.entries.push(entry);
    }

    /// Queues a line to be netted into the first line on the same account.
    pub fn net_out(&mut self, entry: LedgerEntry) {
        if entry.is_zero() {
            return;
        }
        self.track(&entry);
        self.patches.push(entry);
    }

    /// Totals of the lines and patches the engine added.
    #[must_use]
    pub fn generated_totals(&self) -> BatchTotals {
        self.generated
    }

    /// Applies the queued patches and returns the final lines.
    ///
    /// # Errors
    ///
    /// Fails with [`ItcError::UnbalancedBatch`] if the added lines do not
    /// balance at `precision`. No lines are returned in that case.
    pub fn close(self, precision: Precision) -> Result<Vec<LedgerEntry>, ItcError> {
        if !self.generated.is_balanced(precision) {
            return Err(ItcError::UnbalancedBatch {
                debit: self.generated.debit,
                credit: self.generated.credit,
            });
        }

        let mut entries = self.entries;
        let mut first_by_account: BTreeMap<AccountName, usize> = BTreeMap::new();
        for (index, entry) in entries.iter().enumerate() {
            first_by_account
                .entry(entry.account.clone())
                .or_insert(index);
        }

        let mut patched = BTreeSet::new();
        for patch in self.patches {
            if let Some(&index) = first_by_account.get(&patch.account) {
                let target = &mut entries[index];
                let netted = target.signed_amount() + patch.signed_amount();
                target.set_signed_amount(netted);
                patched.insert(index);
            } else {
                first_by_account.insert(patch.account.clone(), entries.len());
                entries.push(patch);
            }
        }

        // Only lines emptied by netting are dropped; host lines stay as given.
        let mut index = 0;
        entries.retain(|entry| {
            let keep = !(patched.contains(&index) && entry.is_zero());
            index += 1;
            keep
        });

        Ok(entries)
    }

    fn track(&mut self, entry: &LedgerEntry) {
        self.generated.debit += entry.debit;
        self.generated.credit += entry.credit;
    }
}
