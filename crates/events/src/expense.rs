use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{EventId, GroupId, InvalidEventReason, Money, UserId};

use crate::OwedEdge;

/// One participant's portion of an expense.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub user_id: UserId,
    pub amount: Money,
}

impl Share {
    pub fn new(user_id: UserId, amount: Money) -> Self {
        Self { user_id, amount }
    }
}

/// Event: an expense paid by one member and split among participants.
///
/// The payer may or may not hold a share; a share held by the payer is simply
/// the part of the expense they covered for themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEvent {
    pub event_id: EventId,
    pub group_id: GroupId,
    pub payer: UserId,
    /// Positive amount in smallest unit (e.g., cents).
    pub total: Money,
    pub shares: Vec<Share>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ExpenseEvent {
    /// Check the expense's own invariants.
    ///
    /// Shares must be non-empty, non-negative, name each participant once and
    /// sum to the total exactly.
    pub fn validate(&self) -> Result<(), InvalidEventReason> {
        if !self.total.is_positive() {
            return Err(InvalidEventReason::NonPositiveAmount);
        }
        if self.shares.is_empty() {
            return Err(InvalidEventReason::NoShares);
        }

        let mut seen = HashSet::with_capacity(self.shares.len());
        let mut sum: i128 = 0;

        for share in &self.shares {
            if share.amount.is_negative() {
                return Err(InvalidEventReason::NegativeShare {
                    user_id: share.user_id,
                });
            }
            if !seen.insert(share.user_id) {
                return Err(InvalidEventReason::DuplicateParticipant {
                    user_id: share.user_id,
                });
            }
            sum += share.amount.wide();
        }

        if sum != self.total.wide() {
            // A sum past the i64 range can never equal the total anyway.
            let shares = Money::from_wide(sum).unwrap_or(Money::from_minor(i64::MAX));
            return Err(InvalidEventReason::ShareSumMismatch {
                total: self.total,
                shares,
            });
        }

        Ok(())
    }

    /// Every identity the expense touches (payer first, then participants).
    pub fn participants(&self) -> impl Iterator<Item = UserId> + '_ {
        core::iter::once(self.payer).chain(self.shares.iter().map(|s| s.user_id))
    }

    /// Owed edges: each non-payer participant owes the payer their share.
    ///
    /// Zero shares and the payer's own share produce no edge.
    pub fn owed_edges(&self) -> impl Iterator<Item = OwedEdge> + '_ {
        self.shares
            .iter()
            .filter(move |s| s.user_id != self.payer && !s.amount.is_zero())
            .map(move |s| OwedEdge {
                debtor: s.user_id,
                creditor: self.payer,
                amount: s.amount,
            })
    }
}
