//! Ledger error model.

use thiserror::Error;

use crate::id::{EventId, GroupId, UserId};
use crate::money::Money;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Why a single ledger event was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidEventReason {
    #[error("event belongs to group {found}, expected {expected}")]
    GroupMismatch { expected: GroupId, found: GroupId },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("share of {user_id} is negative")]
    NegativeShare { user_id: UserId },

    #[error("expense has no shares")]
    NoShares,

    #[error("participant {user_id} appears more than once")]
    DuplicateParticipant { user_id: UserId },

    #[error("shares sum to {shares}, expected total {total}")]
    ShareSumMismatch { total: Money, shares: Money },

    #[error("settlement payer and receiver are the same user")]
    SelfSettlement,

    #[error("split weight of {user_id} must be positive")]
    InvalidWeight { user_id: UserId },
}

/// Ledger computation failure.
///
/// A failure always rejects the whole computation for the group; the engine
/// never returns a partially aggregated ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An event violates its own invariants (or belongs to another group).
    #[error("invalid ledger event {event_id}: {reason}")]
    InvalidLedgerEvent {
        event_id: EventId,
        reason: InvalidEventReason,
    },

    /// An event references an identity outside the supplied group membership.
    #[error("unknown participant {user_id} in event {event_id}")]
    UnknownParticipant { event_id: EventId, user_id: UserId },

    /// Accumulated amounts no longer fit the minor-unit range.
    #[error("amount overflow{}", .event_id.map(|id| format!(" in event {id}")).unwrap_or_default())]
    AmountOverflow { event_id: Option<EventId> },
}

impl LedgerError {
    pub fn invalid(event_id: EventId, reason: InvalidEventReason) -> Self {
        Self::InvalidLedgerEvent { event_id, reason }
    }

    pub fn unknown_participant(event_id: EventId, user_id: UserId) -> Self {
        Self::UnknownParticipant { event_id, user_id }
    }

    /// Identifier of the offending event, when one can be named.
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Self::InvalidLedgerEvent { event_id, .. } => Some(*event_id),
            Self::UnknownParticipant { event_id, .. } => Some(*event_id),
            Self::AmountOverflow { event_id } => *event_id,
        }
    }
}
