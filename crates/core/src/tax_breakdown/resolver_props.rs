//! Property-based tests for TaxBreakdownResolver.
//!
//! - Split conservation across repeated item codes
//! - Order of tax rows does not change the breakdown

use itc_shared::types::Precision;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::resolver::TaxBreakdownResolver;
use crate::document::{ChargeType, GstTaxType, ItemRow};
use crate::testing::{FakeHost, INPUT_CGST, INPUT_IGST, INPUT_SGST, item_row, tax_row};

/// Strategy to generate taxable values (0.01 to 10,000.00).
fn taxable_value() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate GST rates.
fn gst_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::new(25, 1)),
        Just(Decimal::new(6, 0)),
        Just(Decimal::new(9, 0)),
        Just(Decimal::new(14, 0)),
        Just(Decimal::new(18, 0)),
    ]
}

fn rows(values: &[Decimal]) -> Vec<ItemRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| item_row(i + 1, "WIDGET", Decimal::ONE, *value))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* set of rows sharing an item code, the per-row amounts of a
    /// component SHALL sum exactly to the aggregate amount in the tax row.
    #[test]
    fn prop_split_sums_to_aggregate(
        values in prop::collection::vec(taxable_value(), 1..6),
        rate in gst_rate(),
        drift in -5i64..5i64,
    ) {
        let precision = Precision::CURRENCY;
        let formula: Decimal = values
            .iter()
            .map(|value| precision.round(rate * value / Decimal::ONE_HUNDRED))
            .sum();
        // The host may have rounded the aggregate differently from the rows.
        let aggregate = formula + Decimal::new(drift, 2);
        prop_assume!(!aggregate.is_zero());

        let items = rows(&values);
        let taxes = vec![tax_row(
            1,
            INPUT_IGST,
            ChargeType::OnNetTotal,
            &[("WIDGET", rate, aggregate)],
        )];
        let accounts = FakeHost::standard().input_accounts.unwrap();
        let resolver = TaxBreakdownResolver::new(&accounts, precision);
        let breakdown = resolver.resolve(&items, &taxes).unwrap();

        let total: Decimal = breakdown
            .iter()
            .map(|taxes| taxes.get(GstTaxType::Igst).amount)
            .sum();
        prop_assert_eq!(total, aggregate);

        for (row, value) in breakdown.iter().zip(&values).take(values.len() - 1) {
            prop_assert_eq!(
                row.get(GstTaxType::Igst).amount,
                precision.round(rate * value / Decimal::ONE_HUNDRED)
            );
        }
    }

    /// *For any* CGST/SGST pair, swapping the tax row order SHALL leave the
    /// breakdown unchanged.
    #[test]
    fn prop_tax_row_order_irrelevant(
        values in prop::collection::vec(taxable_value(), 1..4),
        rate in gst_rate(),
    ) {
        let precision = Precision::CURRENCY;
        let aggregate: Decimal = values
            .iter()
            .map(|value| precision.round(rate * value / Decimal::ONE_HUNDRED))
            .sum();
        let items = rows(&values);
        let detail = [("WIDGET", rate, aggregate)];
        let forward = vec![
            tax_row(1, INPUT_CGST, ChargeType::OnNetTotal, &detail),
            tax_row(2, INPUT_SGST, ChargeType::OnNetTotal, &detail),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        let accounts = FakeHost::standard().input_accounts.unwrap();
        let resolver = TaxBreakdownResolver::new(&accounts, precision);
        prop_assert_eq!(
            resolver.resolve(&items, &forward).unwrap(),
            resolver.resolve(&items, &backward).unwrap()
        );
    }
}
