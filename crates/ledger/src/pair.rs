//! Canonical pairwise balances.
//!
//! Every unordered pair `{A, B}` is stored once, under a key normalized so that
//! `low < high`. The stored scalar is positive when `high` owes `low` and
//! negative when `low` owes `high`. There is no mirrored `B -> A` cell to keep
//! in sync.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use splitledger_core::{Money, UserId, ValueObject};

/// Unordered pair of distinct users, normalized so `low < high`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PairKey {
    low: UserId,
    high: UserId,
}

impl ValueObject for PairKey {}

impl PairKey {
    /// Build the canonical key for `{a, b}`.
    ///
    /// Returns `None` for `a == b`: a user never holds a balance with themselves.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            core::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            core::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            core::cmp::Ordering::Equal => None,
        }
    }

    /// Key and signed contribution for "`debtor` owes `creditor` `amount`".
    pub fn orient(debtor: UserId, creditor: UserId, amount: i128) -> Option<(Self, i128)> {
        let key = Self::new(debtor, creditor)?;
        let signed = if key.low == creditor { amount } else { -amount };
        Some((key, signed))
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }
}

/// Signed net amount between exactly two users.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PairwiseBalance {
    #[serde(flatten)]
    pub pair: PairKey,
    /// Positive: `high` owes `low`. Negative: `low` owes `high`.
    pub amount: Money,
}

impl PairwiseBalance {
    /// The user who owes money in this pair.
    pub fn debtor(&self) -> UserId {
        if self.amount.is_positive() {
            self.pair.high
        } else {
            self.pair.low
        }
    }

    /// The user who is owed money in this pair.
    pub fn creditor(&self) -> UserId {
        if self.amount.is_positive() {
            self.pair.low
        } else {
            self.pair.high
        }
    }

    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.pair.contains(user)
    }

    /// Amount from `user`'s point of view: positive when owed to them, negative
    /// when they owe, zero when they are not part of the pair.
    pub fn signed_for(&self, user: UserId) -> Money {
        if user == self.pair.low {
            self.amount
        } else if user == self.pair.high {
            -self.amount
        } else {
            Money::ZERO
        }
    }
}

/// Immutable snapshot of every non-negligible pairwise balance in a group.
///
/// Iteration is ordered by pair key, so two snapshots built from the same
/// events (in any order) are identical, including their iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairwiseBalances {
    entries: BTreeMap<PairKey, Money>,
    by_user: BTreeMap<UserId, Vec<PairKey>>,
}

impl PairwiseBalances {
    pub(crate) fn from_entries(entries: BTreeMap<PairKey, Money>) -> Self {
        let mut by_user: BTreeMap<UserId, Vec<PairKey>> = BTreeMap::new();
        for key in entries.keys() {
            by_user.entry(key.low).or_default().push(*key);
            by_user.entry(key.high).or_default().push(*key);
        }
        Self { entries, by_user }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether nobody owes anybody anything.
    pub fn is_settled(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pair: &PairKey) -> Option<Money> {
        self.entries.get(pair).copied()
    }

    /// Signed amount between `a` and `b` from `a`'s point of view (positive
    /// when `b` owes `a`). Zero for settled pairs and for `a == b`.
    pub fn between(&self, a: UserId, b: UserId) -> Money {
        PairKey::new(a, b)
            .and_then(|key| self.entries.get(&key).map(|amount| (key, *amount)))
            .map(|(pair, amount)| PairwiseBalance { pair, amount }.signed_for(a))
            .unwrap_or(Money::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = PairwiseBalance> + '_ {
        self.entries
            .iter()
            .map(|(pair, amount)| PairwiseBalance {
                pair: *pair,
                amount: *amount,
            })
    }

    /// Balances touching `user`, without scanning unrelated pairs.
    pub fn for_user(&self, user: UserId) -> impl Iterator<Item = PairwiseBalance> + '_ {
        self.by_user
            .get(&user)
            .into_iter()
            .flatten()
            .filter_map(|key| {
                self.entries.get(key).map(|amount| PairwiseBalance {
                    pair: *key,
                    amount: *amount,
                })
            })
    }

    /// Every user holding at least one open balance, in ascending order.
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.by_user.keys().copied()
    }
}

impl Serialize for PairwiseBalances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn pair_key_is_order_insensitive() {
        assert_eq!(PairKey::new(user(1), user(2)), PairKey::new(user(2), user(1)));
        let key = PairKey::new(user(2), user(1)).unwrap();
        assert_eq!(key.low(), user(1));
        assert_eq!(key.high(), user(2));
    }

    #[test]
    fn pair_key_rejects_self_pair() {
        assert_eq!(PairKey::new(user(1), user(1)), None);
        assert_eq!(PairKey::orient(user(1), user(1), 10), None);
    }

    #[test]
    fn orient_uses_low_is_owed_convention() {
        // user(2) owes user(1): high owes low -> positive.
        let (key, signed) = PairKey::orient(user(2), user(1), 30).unwrap();
        assert_eq!(key, PairKey::new(user(1), user(2)).unwrap());
        assert_eq!(signed, 30);

        // user(1) owes user(2): low owes high -> negative.
        let (_, signed) = PairKey::orient(user(1), user(2), 30).unwrap();
        assert_eq!(signed, -30);
    }

    #[test]
    fn balance_reports_debtor_and_creditor() {
        let balance = PairwiseBalance {
            pair: PairKey::new(user(1), user(2)).unwrap(),
            amount: Money::from_minor(-40),
        };
        assert_eq!(balance.debtor(), user(1));
        assert_eq!(balance.creditor(), user(2));
        assert_eq!(balance.magnitude(), Money::from_minor(40));
        assert_eq!(balance.signed_for(user(1)), Money::from_minor(-40));
        assert_eq!(balance.signed_for(user(2)), Money::from_minor(40));
        assert_eq!(balance.signed_for(user(3)), Money::ZERO);
    }

    #[test]
    fn snapshot_indexes_balances_by_user() {
        let mut entries = BTreeMap::new();
        entries.insert(PairKey::new(user(1), user(2)).unwrap(), Money::from_minor(30));
        entries.insert(PairKey::new(user(1), user(3)).unwrap(), Money::from_minor(30));
        let balances = PairwiseBalances::from_entries(entries);

        assert_eq!(balances.len(), 2);
        assert_eq!(balances.for_user(user(1)).count(), 2);
        assert_eq!(balances.for_user(user(2)).count(), 1);
        assert_eq!(balances.for_user(user(9)).count(), 0);
        assert_eq!(balances.users().collect::<Vec<_>>(), vec![user(1), user(2), user(3)]);

        assert_eq!(balances.between(user(1), user(2)), Money::from_minor(30));
        assert_eq!(balances.between(user(2), user(1)), Money::from_minor(-30));
        assert_eq!(balances.between(user(2), user(3)), Money::ZERO);
    }

    #[test]
    fn serializes_as_flat_entries() {
        let mut entries = BTreeMap::new();
        entries.insert(PairKey::new(user(1), user(2)).unwrap(), Money::from_minor(30));
        let json = serde_json::to_value(PairwiseBalances::from_entries(entries)).unwrap();

        assert_eq!(json[0]["low"], user(1).to_string());
        assert_eq!(json[0]["high"], user(2).to_string());
        assert_eq!(json[0]["amount"], 30);
    }
}
