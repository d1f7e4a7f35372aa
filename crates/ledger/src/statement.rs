//! All three ledger views for one group, computed from a single aggregation.

use serde::Serialize;

use splitledger_core::{GroupId, LedgerResult, UserId};
use splitledger_events::{ExpenseEvent, SettlementEvent};

use crate::aggregator::Aggregator;
use crate::config::LedgerConfig;
use crate::net_balance::{NetBalance, net_balance_for, net_balances};
use crate::optimizer::{SettlementInstruction, optimize_with};
use crate::pair::PairwiseBalances;

/// Snapshot of a group's ledger.
///
/// `balances` preserves who owes whom pair by pair; `plan` nets the whole group
/// and may route money between users who never shared an expense. Callers
/// choose which view to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatement {
    pub group_id: GroupId,
    pub balances: PairwiseBalances,
    pub net_balances: Vec<NetBalance>,
    pub plan: Vec<SettlementInstruction>,
}

impl GroupStatement {
    pub fn compute(
        group_id: GroupId,
        expenses: &[ExpenseEvent],
        settlements: &[SettlementEvent],
        config: &LedgerConfig,
    ) -> LedgerResult<Self> {
        Self::compute_with(&Aggregator::new(group_id).with_config(*config), expenses, settlements)
    }

    /// Like [`GroupStatement::compute`], with a preconfigured aggregator (e.g.
    /// one enforcing group membership).
    pub fn compute_with(
        aggregator: &Aggregator,
        expenses: &[ExpenseEvent],
        settlements: &[SettlementEvent],
    ) -> LedgerResult<Self> {
        let balances = aggregator.aggregate(expenses, settlements)?;
        let net_balances = net_balances(&balances);
        let plan = optimize_with(&balances, aggregator.config());

        Ok(Self {
            group_id: aggregator.group_id(),
            balances,
            net_balances,
            plan,
        })
    }

    /// Net balance for `user`; settled users get an all-zero entry.
    pub fn net_balance_for(&self, user: UserId) -> NetBalance {
        net_balance_for(user, &self.balances)
    }

    pub fn is_settled(&self) -> bool {
        self.balances.is_settled()
    }
}
