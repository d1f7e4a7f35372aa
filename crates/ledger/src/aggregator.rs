//! Ledger aggregation: event history -> canonical pairwise balances.

use std::collections::{BTreeMap, HashMap, HashSet};

use splitledger_core::{EventId, GroupId, InvalidEventReason, LedgerError, LedgerResult, Money, UserId};
use splitledger_events::{ExpenseEvent, OwedEdge, SettlementEvent};

use crate::config::LedgerConfig;
use crate::pair::{PairKey, PairwiseBalances};

/// Folds a group's expenses and settlements into pairwise balances.
///
/// Aggregation is all-or-nothing: every event is validated before anything is
/// accumulated, and the first offending event fails the whole computation.
#[derive(Debug, Clone)]
pub struct Aggregator {
    group_id: GroupId,
    config: LedgerConfig,
    members: Option<HashSet<UserId>>,
}

impl Aggregator {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            config: LedgerConfig::default(),
            members: None,
        }
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Require every payer, participant and receiver to be one of `members`.
    ///
    /// Without a member set identities are treated opaquely.
    pub fn with_members(mut self, members: impl IntoIterator<Item = UserId>) -> Self {
        self.members = Some(members.into_iter().collect());
        self
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn aggregate(
        &self,
        expenses: &[ExpenseEvent],
        settlements: &[SettlementEvent],
    ) -> LedgerResult<PairwiseBalances> {
        self.validate(expenses, settlements).inspect_err(|err| {
            tracing::warn!(
                group_id = %self.group_id,
                event_id = ?err.event_id(),
                reason = %err,
                "rejected ledger event"
            );
        })?;

        let mut accumulators: HashMap<PairKey, i128> = HashMap::new();
        let edges = expenses
            .iter()
            .flat_map(|e| e.owed_edges())
            .chain(settlements.iter().map(|s| s.owed_edge()));

        for OwedEdge {
            debtor,
            creditor,
            amount,
        } in edges
        {
            // Validation guarantees debtor != creditor, so orient never skips.
            if let Some((key, signed)) = PairKey::orient(debtor, creditor, amount.wide()) {
                *accumulators.entry(key).or_insert(0) += signed;
            }
        }

        let mut entries = BTreeMap::new();
        for (key, value) in accumulators {
            let amount = Money::from_wide(value).ok_or(LedgerError::AmountOverflow { event_id: None })?;
            if !self.config.is_negligible(amount) {
                entries.insert(key, amount);
            }
        }

        ensure_positions_fit(&entries)?;

        let balances = PairwiseBalances::from_entries(entries);
        tracing::debug!(
            group_id = %self.group_id,
            expenses = expenses.len(),
            settlements = settlements.len(),
            pairs = balances.len(),
            "aggregated pairwise balances"
        );
        Ok(balances)
    }

    fn validate(&self, expenses: &[ExpenseEvent], settlements: &[SettlementEvent]) -> LedgerResult<()> {
        for expense in expenses {
            self.ensure_group(expense.event_id, expense.group_id)?;
            expense
                .validate()
                .map_err(|reason| LedgerError::invalid(expense.event_id, reason))?;
            self.ensure_members(expense.event_id, expense.participants())?;
        }

        for settlement in settlements {
            self.ensure_group(settlement.event_id, settlement.group_id)?;
            settlement
                .validate()
                .map_err(|reason| LedgerError::invalid(settlement.event_id, reason))?;
            self.ensure_members(settlement.event_id, settlement.participants())?;
        }

        Ok(())
    }

    fn ensure_group(&self, event_id: EventId, found: GroupId) -> LedgerResult<()> {
        if found != self.group_id {
            return Err(LedgerError::invalid(
                event_id,
                InvalidEventReason::GroupMismatch {
                    expected: self.group_id,
                    found,
                },
            ));
        }
        Ok(())
    }

    fn ensure_members(
        &self,
        event_id: EventId,
        users: impl IntoIterator<Item = UserId>,
    ) -> LedgerResult<()> {
        let Some(members) = &self.members else {
            return Ok(());
        };
        match users.into_iter().find(|u| !members.contains(u)) {
            Some(user_id) => Err(LedgerError::unknown_participant(event_id, user_id)),
            None => Ok(()),
        }
    }
}

/// Every user's owed and owing totals must fit the minor-unit range, so that
/// downstream net-balance and settlement arithmetic cannot overflow.
fn ensure_positions_fit(entries: &BTreeMap<PairKey, Money>) -> LedgerResult<()> {
    let mut totals: HashMap<UserId, (i128, i128)> = HashMap::new();
    for (key, amount) in entries {
        let magnitude = amount.wide().abs();
        let (creditor, debtor) = if amount.is_positive() {
            (key.low(), key.high())
        } else {
            (key.high(), key.low())
        };
        totals.entry(creditor).or_default().0 += magnitude;
        totals.entry(debtor).or_default().1 += magnitude;
    }

    let limit = i64::MAX as i128;
    if totals.values().any(|(owed, owing)| *owed > limit || *owing > limit) {
        return Err(LedgerError::AmountOverflow { event_id: None });
    }
    Ok(())
}

/// Aggregate a group's history with default configuration.
///
/// See [`Aggregator`] for membership checks and a non-zero tolerance.
pub fn aggregate(
    group_id: GroupId,
    expenses: &[ExpenseEvent],
    settlements: &[SettlementEvent],
) -> LedgerResult<PairwiseBalances> {
    Aggregator::new(group_id).aggregate(expenses, settlements)
}
