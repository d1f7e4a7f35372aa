//! Debt simplification: a greedy minimum-transaction settlement plan.
//!
//! Finding the true minimum number of payments is a subset-sum partition
//! problem. The greedy pass below matches the largest debtor with the largest
//! creditor until one side runs out, which yields at most `n - 1` payments for
//! `n` unsettled users.

use chrono::{DateTime, Utc};
use serde::Serialize;

use splitledger_core::{EventId, GroupId, Money, UserId};
use splitledger_events::SettlementEvent;

use crate::config::LedgerConfig;
use crate::net_balance::net_balances;
use crate::pair::PairwiseBalances;

/// A proposed single payment: `from` pays `to` `amount`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementInstruction {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}

impl SettlementInstruction {
    /// Record an accepted instruction as a settlement event.
    pub fn into_settlement_event(
        self,
        group_id: GroupId,
        event_id: EventId,
        occurred_at: DateTime<Utc>,
    ) -> SettlementEvent {
        SettlementEvent {
            event_id,
            group_id,
            payer: self.from,
            receiver: self.to,
            amount: self.amount,
            occurred_at,
        }
    }
}

#[derive(Debug)]
struct Position {
    user_id: UserId,
    remaining: Money,
}

/// Largest magnitude first, lower identity first among equals.
fn sort_positions(positions: &mut [Position]) {
    positions.sort_by(|a, b| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Plan payments that bring every user in `balances` to zero (exact comparison).
pub fn optimize(balances: &PairwiseBalances) -> Vec<SettlementInstruction> {
    optimize_with(balances, &LedgerConfig::default())
}

/// Plan payments using `config.zero_tolerance` to decide who is settled.
pub fn optimize_with(balances: &PairwiseBalances, config: &LedgerConfig) -> Vec<SettlementInstruction> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for summary in net_balances(balances) {
        if config.is_negligible(summary.net) {
            continue;
        }
        let position = Position {
            user_id: summary.user_id,
            remaining: summary.net.abs(),
        };
        if summary.net.is_negative() {
            debtors.push(position);
        } else {
            creditors.push(position);
        }
    }

    sort_positions(&mut debtors);
    sort_positions(&mut creditors);

    let unsettled = debtors.len() + creditors.len();
    let mut plan = Vec::with_capacity(unsettled.saturating_sub(1));
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];
        let amount = debtor.remaining.min(creditor.remaining);

        if !config.is_negligible(amount) {
            plan.push(SettlementInstruction {
                from: debtor.user_id,
                to: creditor.user_id,
                amount,
            });
        }

        debtor.remaining -= amount;
        creditor.remaining -= amount;

        if config.is_negligible(debtor.remaining) {
            d += 1;
        }
        if config.is_negligible(creditor.remaining) {
            c += 1;
        }
    }

    tracing::debug!(
        instructions = plan.len(),
        unsettled,
        "computed settlement plan"
    );
    plan
}
