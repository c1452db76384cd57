//! Line construction for one reversed item.

use itc_shared::types::{AccountName, CostCenterName, ItemCode};
use rust_decimal::Decimal;

use crate::document::ItemRow;
use crate::ledger::{EntryType, LedgerEntry};

/// Builds the reversal lines of one item row with shared cost center and
/// remarks. Sides are given for the forward flow and flipped for returns.
pub(crate) struct ItemLines {
    cost_center: Option<CostCenterName>,
    item_code: ItemCode,
    is_return: bool,
}

impl ItemLines {
    pub(crate) fn new(row: &ItemRow, cost_center: Option<CostCenterName>, is_return: bool) -> Self {
        Self {
            cost_center: row.cost_center.clone().or(cost_center),
            item_code: row.item_code.clone(),
            is_return,
        }
    }

    /// A debit on the forward flow.
    pub(crate) fn debit(
        &self,
        account: &AccountName,
        amount: Decimal,
        against: &AccountName,
    ) -> LedgerEntry {
        self.line(account, EntryType::Debit.for_return(self.is_return), amount, against)
    }

    /// A credit on the forward flow.
    pub(crate) fn credit(
        &self,
        account: &AccountName,
        amount: Decimal,
        against: &AccountName,
    ) -> LedgerEntry {
        self.line(account, EntryType::Credit.for_return(self.is_return), amount, against)
    }

    /// A line on a fixed side, regardless of return flow.
    pub(crate) fn fixed(
        &self,
        account: &AccountName,
        entry_type: EntryType,
        amount: Decimal,
        against: &AccountName,
    ) -> LedgerEntry {
        self.line(account, entry_type, amount, against)
    }

    fn line(
        &self,
        account: &AccountName,
        entry_type: EntryType,
        amount: Decimal,
        against: &AccountName,
    ) -> LedgerEntry {
        LedgerEntry::new(account.clone(), entry_type, amount)
            .with_cost_center(self.cost_center.clone())
            .against(against)
            .with_remarks(format!("Ineligible ITC reversal for item {}", self.item_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::item_row;
    use rust_decimal_macros::dec;

    #[test]
    fn test_return_flips_sides() {
        let row = item_row(1, "FOOD", dec!(1), dec!(10));
        let expense = AccountName::from("GST Expense - TC");
        let input = AccountName::from("Input Tax CGST - TC");

        let forward = ItemLines::new(&row, None, false);
        let backward = ItemLines::new(&row, None, true);

        assert_eq!(forward.debit(&expense, dec!(5), &input).debit, dec!(5));
        assert_eq!(backward.debit(&expense, dec!(5), &input).credit, dec!(5));
        assert_eq!(
            backward.fixed(&expense, EntryType::Debit, dec!(5), &input).debit,
            dec!(5)
        );
    }

    #[test]
    fn test_row_cost_center_wins() {
        let mut row = item_row(1, "FOOD", dec!(1), dec!(10));
        row.cost_center = Some(CostCenterName::from("Row - TC"));
        let lines = ItemLines::new(&row, Some(CostCenterName::from("Main - TC")), false);
        let entry = lines.debit(
            &AccountName::from("A"),
            dec!(1),
            &AccountName::from("B"),
        );
        assert_eq!(entry.cost_center, Some(CostCenterName::from("Row - TC")));
        assert_eq!(entry.against, Some(AccountName::from("B")));
        assert_eq!(
            entry.remarks.as_deref(),
            Some("Ineligible ITC reversal for item FOOD")
        );
    }
}
