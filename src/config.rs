//! Typed throttle configuration.
//!
//! These structs carry the values a node reads from network-wide
//! configuration. Loading them is the caller's job; turning them into
//! throttles, and rejecting impossible ones, happens here.

use serde::{Deserialize, Serialize};

use crate::throttles::bucket_throttle::{MTPS_PER_TPS, ONE_SECOND_IN_MS};
use crate::throttles::{DeterministicThrottle, GasLimitDeterministicThrottle};
use crate::{ConfigError, Uint};

/// Configuration for one transaction-count throttle.
///
/// The rate is `milli_ops_per_sec` if set, otherwise `ops_per_sec * 1000`.
/// The burst period is `burst_period_ms` if set, otherwise
/// `burst_period * 1000`, otherwise one second.
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::config::ThrottleConfig;
/// use ledger_throttle_core::throttles::DeterministicThrottle;
///
/// let config = ThrottleConfig {
///     name: Some("ThroughputLimits".to_string()),
///     ops_per_sec: 10_000,
///     ..ThrottleConfig::default()
/// };
/// let throttle = DeterministicThrottle::try_from(config).unwrap();
/// assert_eq!(throttle.mtps(), 10_000_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThrottleConfig {
    pub name: Option<String>,
    pub ops_per_sec: Uint,
    pub milli_ops_per_sec: Uint,
    /// Burst period in whole seconds.
    pub burst_period: Uint,
    pub burst_period_ms: Uint,
}

impl ThrottleConfig {
    /// Creates a configuration from a rate in milli-ops per second and a
    /// burst period in milliseconds.
    pub fn new(name: Option<String>, milli_ops_per_sec: Uint, burst_period_ms: Uint) -> Self {
        Self {
            name,
            milli_ops_per_sec,
            burst_period_ms,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// * [`ConfigError::MissingRate`] - neither rate field is set
    /// * [`ConfigError::CalculationOutOfRange`] - `ops_per_sec * 1000` overflows
    pub fn implied_mtps(&self) -> Result<Uint, ConfigError> {
        if self.milli_ops_per_sec > 0 {
            return Ok(self.milli_ops_per_sec);
        }
        if self.ops_per_sec == 0 {
            return Err(ConfigError::MissingRate(self.name.clone()));
        }
        self.ops_per_sec
            .checked_mul(MTPS_PER_TPS)
            .ok_or(ConfigError::CalculationOutOfRange {
                what: "milli-ops per second",
                lhs: self.ops_per_sec,
                rhs: MTPS_PER_TPS,
            })
    }

    /// # Errors
    ///
    /// [`ConfigError::CalculationOutOfRange`] if `burst_period * 1000` overflows.
    pub fn implied_burst_period_ms(&self) -> Result<Uint, ConfigError> {
        if self.burst_period_ms > 0 {
            return Ok(self.burst_period_ms);
        }
        if self.burst_period == 0 {
            return Ok(ONE_SECOND_IN_MS);
        }
        self.burst_period
            .checked_mul(ONE_SECOND_IN_MS)
            .ok_or(ConfigError::CalculationOutOfRange {
                what: "burst period in milliseconds",
                lhs: self.burst_period,
                rhs: ONE_SECOND_IN_MS,
            })
    }
}

impl TryFrom<ThrottleConfig> for DeterministicThrottle {
    type Error = ConfigError;

    /// Builds the throttle, rejecting configurations that could never admit
    /// a transaction.
    fn try_from(config: ThrottleConfig) -> Result<Self, Self::Error> {
        let mtps = config.implied_mtps()?;
        let burst_period_ms = config.implied_burst_period_ms()?;
        let throttle = DeterministicThrottle::with_mtps_and_burst_period_ms(mtps, burst_period_ms)?;
        Ok(match config.name {
            Some(name) => throttle.with_name(name),
            None => throttle,
        })
    }
}

/// Configuration for the gas throttle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasThrottleConfig {
    pub name: Option<String>,
    /// Gas admitted per second.
    pub capacity: Uint,
}

impl GasThrottleConfig {
    pub fn new(capacity: Uint) -> Self {
        Self { name: None, capacity }
    }
}

impl TryFrom<GasThrottleConfig> for GasLimitDeterministicThrottle {
    type Error = ConfigError;

    fn try_from(config: GasThrottleConfig) -> Result<Self, Self::Error> {
        let throttle = GasLimitDeterministicThrottle::with_capacity(config.capacity)?;
        Ok(match config.name {
            Some(name) => throttle.with_name(name),
            None => throttle,
        })
    }
}
