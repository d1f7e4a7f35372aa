//! Shared-expense ledger engine.
//!
//! Pure domain logic only: no IO, no persistence, no mutable shared state.
//! Every entry point is a function of the event history it is handed:
//!
//! - [`aggregate`] folds expenses and settlements into [`PairwiseBalances`];
//! - [`optimize`] turns those balances into a short repayment plan;
//! - [`net_balance_for`] summarizes one user's position.

pub mod aggregator;
pub mod config;
pub mod net_balance;
pub mod optimizer;
pub mod pair;
pub mod statement;

pub use aggregator::{Aggregator, aggregate};
pub use config::{ConfigError, LedgerConfig};
pub use net_balance::{NetBalance, net_balance_for, net_balances};
pub use optimizer::{SettlementInstruction, optimize, optimize_with};
pub use pair::{PairKey, PairwiseBalance, PairwiseBalances};
pub use statement::GroupStatement;
