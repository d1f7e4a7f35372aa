//! `splitledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, exact money and the ledger error taxonomy.

pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use error::{InvalidEventReason, LedgerError, LedgerResult};
pub use id::{EventId, GroupId, ParseIdError, UserId};
pub use money::Money;
pub use value_object::ValueObject;
