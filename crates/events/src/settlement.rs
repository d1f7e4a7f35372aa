use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{EventId, GroupId, InvalidEventReason, Money, UserId};

use crate::OwedEdge;

/// Event: a direct repayment from `payer` to `receiver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub event_id: EventId,
    pub group_id: GroupId,
    /// The member paying off (part of) a debt.
    pub payer: UserId,
    pub receiver: UserId,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl SettlementEvent {
    pub fn validate(&self) -> Result<(), InvalidEventReason> {
        if !self.amount.is_positive() {
            return Err(InvalidEventReason::NonPositiveAmount);
        }
        if self.payer == self.receiver {
            return Err(InvalidEventReason::SelfSettlement);
        }
        Ok(())
    }

    pub fn participants(&self) -> [UserId; 2] {
        [self.payer, self.receiver]
    }

    /// The inverse of the debt being repaid: the receiver now "owes" the payer.
    ///
    /// Netted against an existing payer→receiver debt this extinguishes it; with
    /// no such debt the payer ends up owed.
    pub fn owed_edge(&self) -> OwedEdge {
        OwedEdge {
            debtor: self.receiver,
            creditor: self.payer,
            amount: self.amount,
        }
    }
}
