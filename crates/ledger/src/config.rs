//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::Money;

/// Environment variable holding the zero tolerance, in minor units.
pub const ZERO_TOLERANCE_ENV: &str = "SPLITLEDGER_ZERO_TOLERANCE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer of minor units, got {value:?}")]
    InvalidTolerance { var: &'static str, value: String },
}

/// Tunables shared by the aggregator and the optimizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Balances and net positions with `|amount| <= zero_tolerance` count as
    /// settled. Zero (the default) means exact comparison.
    pub zero_tolerance: Money,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: Money::ZERO,
        }
    }
}

impl LedgerConfig {
    pub fn with_zero_tolerance(mut self, tolerance: Money) -> Self {
        self.zero_tolerance = tolerance.abs();
        self
    }

    /// Read configuration from the process environment.
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(std::env::var(ZERO_TOLERANCE_ENV).ok().as_deref())
    }

    fn from_values(zero_tolerance: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = zero_tolerance {
            let minor = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 0)
                .ok_or_else(|| ConfigError::InvalidTolerance {
                    var: ZERO_TOLERANCE_ENV,
                    value: raw.to_string(),
                })?;
            config.zero_tolerance = Money::from_minor(minor);
        }

        Ok(config)
    }

    /// Whether `amount` is indistinguishable from zero under this config.
    pub fn is_negligible(&self, amount: Money) -> bool {
        amount.is_within(self.zero_tolerance)
    }
}
