use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{EventId, GroupId, Money, UserId};

use crate::{ExpenseEvent, SettlementEvent};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "ledger.expense.recorded").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// A single directed obligation derived from an event: `debtor` owes `creditor`.
///
/// Expenses produce one edge per non-payer share; a settlement produces the
/// inverse edge of the debt it repays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OwedEdge {
    pub debtor: UserId,
    pub creditor: UserId,
    pub amount: Money,
}

/// Any event that moves balances within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LedgerEvent {
    ExpenseRecorded(ExpenseEvent),
    SettlementRecorded(SettlementEvent),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ExpenseRecorded(_) => "ledger.expense.recorded",
            LedgerEvent::SettlementRecorded(_) => "ledger.settlement.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ExpenseRecorded(e) => e.occurred_at,
            LedgerEvent::SettlementRecorded(e) => e.occurred_at,
        }
    }
}

impl LedgerEvent {
    pub fn event_id(&self) -> EventId {
        match self {
            LedgerEvent::ExpenseRecorded(e) => e.event_id,
            LedgerEvent::SettlementRecorded(e) => e.event_id,
        }
    }

    pub fn group_id(&self) -> GroupId {
        match self {
            LedgerEvent::ExpenseRecorded(e) => e.group_id,
            LedgerEvent::SettlementRecorded(e) => e.group_id,
        }
    }

    /// Split a mixed stream into expenses and settlements, preserving order
    /// within each kind.
    pub fn partition(
        events: impl IntoIterator<Item = LedgerEvent>,
    ) -> (Vec<ExpenseEvent>, Vec<SettlementEvent>) {
        let mut expenses = Vec::new();
        let mut settlements = Vec::new();
        for event in events {
            match event {
                LedgerEvent::ExpenseRecorded(e) => expenses.push(e),
                LedgerEvent::SettlementRecorded(s) => settlements.push(s),
            }
        }
        (expenses, settlements)
    }
}

impl From<ExpenseEvent> for LedgerEvent {
    fn from(value: ExpenseEvent) -> Self {
        LedgerEvent::ExpenseRecorded(value)
    }
}

impl From<SettlementEvent> for LedgerEvent {
    fn from(value: SettlementEvent) -> Self {
        LedgerEvent::SettlementRecorded(value)
    }
}
