//! Ledger entry domain types.

use itc_shared::types::{AccountName, CostCenterName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

impl EntryType {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// This side, flipped when `is_return` is set.
    #[must_use]
    pub fn for_return(self, is_return: bool) -> Self {
        if is_return { self.opposite() } else { self }
    }
}

/// A single double-entry posting line.
///
/// Exactly one of `debit` and `credit` is non-zero for a well-formed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The account affected by this entry.
    pub account: AccountName,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Cost center the line is booked against.
    pub cost_center: Option<CostCenterName>,
    /// Counter account of the posting.
    pub against: Option<AccountName>,
    /// Optional description for this line.
    pub remarks: Option<String>,
}

impl LedgerEntry {
    /// Creates an entry of `amount` on `entry_type` side of `account`.
    #[must_use]
    pub fn new(account: AccountName, entry_type: EntryType, amount: Decimal) -> Self {
        let (debit, credit) = match entry_type {
            EntryType::Debit => (amount, Decimal::ZERO),
            EntryType::Credit => (Decimal::ZERO, amount),
        };
        Self {
            account,
            debit,
            credit,
            cost_center: None,
            against: None,
            remarks: None,
        }
    }

    /// Sets the cost center.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center: Option<CostCenterName>) -> Self {
        self.cost_center = cost_center;
        self
    }

    /// Sets the counter account.
    #[must_use]
    pub fn against(mut self, account: &AccountName) -> Self {
        self.against = Some(account.clone());
        self
    }

    /// Sets the remarks.
    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Replaces the amounts so that `signed_amount()` equals `signed`.
    pub fn set_signed_amount(&mut self, signed: Decimal) {
        if signed.is_sign_negative() {
            self.debit = Decimal::ZERO;
            self.credit = -signed;
        } else {
            self.debit = signed;
            self.credit = Decimal::ZERO;
        }
    }

    /// Returns true if both sides are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }

    /// The same line with debit and credit swapped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            debit: self.credit,
            credit: self.debit,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_entry_sides() {
        let debit = LedgerEntry::new(AccountName::from("A"), EntryType::Debit, dec!(10));
        assert_eq!((debit.debit, debit.credit), (dec!(10), dec!(0)));
        let credit = LedgerEntry::new(AccountName::from("A"), EntryType::Credit, dec!(10));
        assert_eq!((credit.debit, credit.credit), (dec!(0), dec!(10)));
        assert_eq!(credit.signed_amount(), dec!(-10));
    }

    #[test]
    fn test_set_signed_amount_switches_side() {
        let mut entry = LedgerEntry::new(AccountName::from("A"), EntryType::Debit, dec!(10));
        entry.set_signed_amount(dec!(-4));
        assert_eq!((entry.debit, entry.credit), (dec!(0), dec!(4)));
        entry.set_signed_amount(dec!(0));
        assert!(entry.is_zero());
    }

    #[test]
    fn test_for_return_flips() {
        assert_eq!(EntryType::Debit.for_return(false), EntryType::Debit);
        assert_eq!(EntryType::Debit.for_return(true), EntryType::Credit);
        assert_eq!(EntryType::Credit.for_return(true), EntryType::Debit);
    }

    #[test]
    fn test_mirrored_keeps_everything_else() {
        let entry = LedgerEntry::new(AccountName::from("A"), EntryType::Debit, dec!(3))
            .against(&AccountName::from("B"))
            .with_remarks("note");
        let mirror = entry.mirrored();
        assert_eq!(mirror.credit, dec!(3));
        assert_eq!(mirror.debit, dec!(0));
        assert_eq!(mirror.against, entry.against);
        assert_eq!(mirror.remarks, entry.remarks);
    }
}
