//! Per-item tax resolution from aggregate tax rows.
//!
//! Tax rows carry an item-wise detail map keyed by item code. When the same
//! item code appears on several item rows the map holds one combined amount;
//! it is split back across the rows so that every row except the last gets
//! its formula share and the last one gets whatever is left. The split
//! always sums to the combined amount exactly.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use itc_shared::types::{ItemCode, Precision};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::document::{ChargeType, GstTaxType, ItemRow, ItemTax, ItemTaxes, TaxRow};
use crate::error::ItcError;
use crate::host::GstAccounts;

/// One `{item_key: [rate, amount]}` entry of a tax row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTaxDetail {
    /// Item key (item code).
    pub item_key: String,
    /// Tax rate.
    pub rate: Decimal,
    /// Tax amount.
    pub amount: Decimal,
}

/// Running per-item-code totals while scanning tax rows.
#[derive(Debug, Default)]
struct Aggregate {
    taxes: BTreeMap<GstTaxType, ItemTax>,
    remaining_rows: usize,
}

/// Resolves per-item tax rates and amounts for one document.
pub struct TaxBreakdownResolver<'a> {
    accounts: &'a GstAccounts,
    precision: Precision,
}

impl<'a> TaxBreakdownResolver<'a> {
    /// Creates a resolver over the document's GST accounts.
    #[must_use]
    pub fn new(accounts: &'a GstAccounts, precision: Precision) -> Self {
        Self {
            accounts,
            precision,
        }
    }

    /// Computes the tax breakdown of each item row, in row order.
    ///
    /// # Errors
    ///
    /// Fails if an item-wise detail cannot be decoded, or if an Actual-charge
    /// row carries an amount for an item with a zero rate.
    pub fn resolve(
        &self,
        items: &[ItemRow],
        taxes: &[TaxRow],
    ) -> Result<Vec<ItemTaxes>, ItcError> {
        let mut aggregates: HashMap<&str, Aggregate> = HashMap::new();
        for item in items {
            aggregates
                .entry(item_key(&item.item_code))
                .or_default()
                .remaining_rows += 1;
        }

        for row in taxes {
            let Some(tax_type) = self.accounts.tax_type_of(&row.account_head) else {
                continue;
            };
            if row.tax_amount.is_zero() {
                continue;
            }

            for detail in parse_item_wise_tax_detail(row)? {
                let amount = self.precision.round(detail.amount);
                if row.charge_type == ChargeType::Actual
                    && detail.rate.is_zero()
                    && !amount.is_zero()
                {
                    return Err(ItcError::ZeroRateForActualCharge {
                        row: row.idx,
                        account: row.account_head.clone(),
                        item: detail.item_key,
                    });
                }

                let Some(aggregate) = aggregates.get_mut(detail.item_key.as_str()) else {
                    debug!(
                        row = row.idx,
                        item = %detail.item_key,
                        "Item-wise tax detail references no item row, skipping"
                    );
                    continue;
                };
                let tax = aggregate.taxes.entry(tax_type).or_default();
                tax.rate = detail.rate;
                tax.amount += amount;
            }
        }

        let mut breakdowns = Vec::with_capacity(items.len());
        for item in items {
            let Some(aggregate) = aggregates.get_mut(item_key(&item.item_code)) else {
                breakdowns.push(ItemTaxes::default());
                continue;
            };
            breakdowns.push(self.take_share(item, aggregate));
        }

        Ok(breakdowns)
    }

    /// Resolves and writes the breakdown onto each item row.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub fn apply(&self, items: &mut [ItemRow], taxes: &[TaxRow]) -> Result<(), ItcError> {
        let breakdowns = self.resolve(items, taxes)?;
        for (item, breakdown) in items.iter_mut().zip(breakdowns) {
            item.taxes = breakdown;
        }
        Ok(())
    }

    fn take_share(&self, item: &ItemRow, aggregate: &mut Aggregate) -> ItemTaxes {
        let mut taxes = ItemTaxes::default();
        let is_last = aggregate.remaining_rows <= 1;

        for (tax_type, remaining) in &mut aggregate.taxes {
            let amount = if is_last {
                remaining.amount
            } else {
                let multiplier = if tax_type.is_quantity_based() {
                    item.qty
                } else {
                    item.taxable_value / Decimal::ONE_HUNDRED
                };
                let share = self.precision.round(remaining.rate * multiplier);
                remaining.amount -= share;
                share
            };
            taxes.set(
                *tax_type,
                ItemTax {
                    rate: remaining.rate,
                    amount,
                },
            );
        }

        if !is_last {
            debug!(
                item = %item.item_code,
                row = item.idx,
                "Repeated item code, row takes its formula share"
            );
        }
        aggregate.remaining_rows = aggregate.remaining_rows.saturating_sub(1);
        taxes
    }
}

/// Item key used in item-wise tax detail maps.
#[must_use]
pub fn item_key(item_code: &ItemCode) -> &str {
    item_code.as_str()
}

/// Decodes a tax row's serialized `{item_key: [rate, amount]}` map.
///
/// Rows without a detail yield an empty list.
///
/// # Errors
///
/// Fails if the detail is not a JSON object of two-number arrays.
pub fn parse_item_wise_tax_detail(row: &TaxRow) -> Result<Vec<ItemTaxDetail>, ItcError> {
    let Some(raw) = row.item_wise_tax_detail.as_deref() else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let malformed = |reason: String| ItcError::MalformedItemTaxDetail {
        row: row.idx,
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(malformed("expected an object".to_string()));
    };

    map.into_iter()
        .map(|(item_key, entry)| {
            let Value::Array(pair) = entry else {
                return Err(malformed(format!("{item_key}: expected [rate, amount]")));
            };
            let [rate, amount] = pair.as_slice() else {
                return Err(malformed(format!("{item_key}: expected [rate, amount]")));
            };
            let rate = decimal_of(rate).ok_or_else(|| malformed(format!("{item_key}: bad rate")))?;
            let amount =
                decimal_of(amount).ok_or_else(|| malformed(format!("{item_key}: bad amount")))?;
            Ok(ItemTaxDetail {
                item_key,
                rate,
                amount,
            })
        })
        .collect()
}

/// Reads a JSON number (or numeric string) through its decimal text.
fn decimal_of(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Null => return Some(Decimal::ZERO),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
