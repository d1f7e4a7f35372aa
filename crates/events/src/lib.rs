//! Ledger events: the read-only input shapes of the engine.
//!
//! Events are facts supplied by an external store. This crate only defines
//! their shape and their self-contained invariants; it never stores them.

pub mod event;
pub mod expense;
pub mod settlement;
pub mod split;

pub use event::{Event, LedgerEvent, OwedEdge};
pub use expense::{ExpenseEvent, Share};
pub use settlement::SettlementEvent;
pub use split::{split_by_weights, split_equally};
