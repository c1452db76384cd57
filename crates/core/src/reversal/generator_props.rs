//! Property-based tests for ReversalEntryGenerator.
//!
//! - Every generated batch balances
//! - Recomputation on an unchanged document is identical
//! - GST expense carries the total ineligible amount
//! - Returns mirror the forward flow for non-stock redirects

use itc_shared::config::PlaceOfSupplyConfig;
use itc_shared::types::Precision;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::generator::{Reversal, ReversalEntryGenerator};
use crate::document::{DocumentKind, GstTaxType, ItemTax, TransactionDocument};
use crate::eligibility::EligibilityClassifier;
use crate::host::PassContext;
use crate::ledger::validate_entries;
use crate::testing::{self, FakeHost, GST_EXPENSE, item_row};

/// Strategy to generate per-component tax amounts (0.01 to 1,000.00).
fn tax_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn any_item() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("FOOD"),
        Just("CAR"),
        Just("SERVICE"),
        Just("WIDGET"),
        Just("BLOCKED-STOCK"),
    ]
}

/// Items whose reversal never touches a stock account.
fn non_stock_item() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("FOOD"), Just("CAR"), Just("SERVICE")]
}

fn any_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::PurchaseInvoice),
        Just(DocumentKind::PurchaseReceipt),
        Just(DocumentKind::BillOfEntry),
    ]
}

fn booked_tax_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::PurchaseInvoice),
        Just(DocumentKind::BillOfEntry),
    ]
}

fn row_strategy(
    items: impl Strategy<Value = &'static str>,
) -> impl Strategy<Value = Vec<(&'static str, Decimal, Decimal)>> {
    prop::collection::vec((items, tax_amount(), tax_amount()), 1..5)
}

fn document(
    kind: DocumentKind,
    update_stock: bool,
    is_return: bool,
    rows: &[(&'static str, Decimal, Decimal)],
) -> TransactionDocument {
    let mut doc = testing::document(kind);
    doc.update_stock = update_stock;
    doc.is_return = is_return;
    doc.items = rows
        .iter()
        .enumerate()
        .map(|(i, (code, split, igst))| {
            let mut row = item_row(i + 1, code, Decimal::ONE, Decimal::ONE_HUNDRED);
            let tax = |amount| ItemTax {
                rate: Decimal::new(9, 0),
                amount,
            };
            row.taxes.set(GstTaxType::Cgst, tax(*split));
            row.taxes.set(GstTaxType::Sgst, tax(*split));
            row.taxes.set(GstTaxType::Igst, tax(*igst));
            row
        })
        .collect();
    doc
}

fn reverse(host: &FakeHost, doc: &mut TransactionDocument) -> Reversal {
    let config = PlaceOfSupplyConfig::default();
    let mut ctx = PassContext::load(host, &doc.company).unwrap();
    EligibilityClassifier::new(&config)
        .classify(doc, &mut ctx)
        .unwrap()
        .apply(doc);
    ReversalEntryGenerator::from(doc.kind)
        .generate(doc, &mut ctx, Vec::new(), Precision::CURRENCY)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* document, the generated lines SHALL balance.
    #[test]
    fn prop_generated_batch_balances(
        kind in any_kind(),
        update_stock in any::<bool>(),
        is_return in any::<bool>(),
        rows in row_strategy(any_item()),
    ) {
        let host = FakeHost::standard();
        let mut doc = document(kind, update_stock, is_return, &rows);
        let reversal = reverse(&host, &mut doc);

        prop_assert!(validate_entries(&reversal.entries, Precision::CURRENCY).is_ok());
        prop_assert_eq!(reversal.generated.debit, reversal.generated.credit);
    }

    /// *For any* document, two passes over the same input SHALL produce
    /// identical lines and pending writes.
    #[test]
    fn prop_recomputation_is_identical(
        kind in any_kind(),
        update_stock in any::<bool>(),
        is_return in any::<bool>(),
        rows in row_strategy(any_item()),
    ) {
        let host = FakeHost::standard();
        let mut first_doc = document(kind, update_stock, is_return, &rows);
        let first = reverse(&host, &mut first_doc);
        let mut second_doc = first_doc.clone();
        let second = reverse(&host, &mut second_doc);

        prop_assert_eq!(first.entries, second.entries);
        prop_assert_eq!(first.updates, second.updates);
        prop_assert_eq!(first_doc, second_doc);
    }

    /// *For any* document that booked input tax, the GST expense lines on
    /// the reversing side SHALL sum to the total ineligible amount.
    #[test]
    fn prop_gst_expense_carries_total(
        kind in booked_tax_kind(),
        update_stock in any::<bool>(),
        is_return in any::<bool>(),
        rows in row_strategy(any_item()),
    ) {
        let host = FakeHost::standard();
        let mut doc = document(kind, update_stock, is_return, &rows);
        let reversal = reverse(&host, &mut doc);

        let expected: Decimal = doc.items.iter().map(|row| row.ineligible_tax_amount).sum();
        let carried: Decimal = reversal
            .entries
            .iter()
            .filter(|entry| entry.account.as_str() == GST_EXPENSE)
            .map(|entry| if is_return { entry.credit } else { entry.debit })
            .sum();
        prop_assert_eq!(carried, expected);
    }

    /// *For any* document without stock redirects, the return SHALL be the
    /// exact mirror of the forward document.
    #[test]
    fn prop_return_mirrors_forward(
        kind in any_kind(),
        update_stock in any::<bool>(),
        rows in row_strategy(non_stock_item()),
    ) {
        let host = FakeHost::standard();
        let forward = reverse(&host, &mut document(kind, update_stock, false, &rows));
        let backward = reverse(&host, &mut document(kind, update_stock, true, &rows));

        prop_assert_eq!(forward.entries.len(), backward.entries.len());
        for (forward_line, backward_line) in forward.entries.iter().zip(&backward.entries) {
            prop_assert_eq!(&forward_line.mirrored(), backward_line);
        }
    }
}
