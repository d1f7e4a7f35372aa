//! Per-user aggregate positions derived from pairwise balances.

use serde::Serialize;

use splitledger_core::{Money, UserId};

use crate::pair::PairwiseBalances;

/// One user's owed/owing summary within a group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct NetBalance {
    pub user_id: UserId,
    /// Sum of amounts others owe this user.
    pub total_owed: Money,
    /// Sum of amounts this user owes others, as a positive magnitude.
    pub total_owing: Money,
    /// `total_owed - total_owing`.
    pub net: Money,
}

impl NetBalance {
    pub fn settled(user_id: UserId) -> Self {
        Self {
            user_id,
            total_owed: Money::ZERO,
            total_owing: Money::ZERO,
            net: Money::ZERO,
        }
    }
}

/// Summarize `user`'s position across every balance touching them.
///
/// Users without any open balance get an all-zero entry.
pub fn net_balance_for(user: UserId, balances: &PairwiseBalances) -> NetBalance {
    let mut summary = NetBalance::settled(user);

    for balance in balances.for_user(user) {
        let signed = balance.signed_for(user);
        if signed.is_positive() {
            summary.total_owed += signed;
        } else {
            summary.total_owing += -signed;
        }
    }

    summary.net = summary.total_owed - summary.total_owing;
    summary
}

/// Net balance of every user holding an open balance, ordered by identity.
pub fn net_balances(balances: &PairwiseBalances) -> Vec<NetBalance> {
    balances
        .users()
        .map(|user| net_balance_for(user, balances))
        .collect()
}
