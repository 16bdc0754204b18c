use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::throttle_core::LeakyThrottle;
use crate::throttles::{BucketThrottle, GasLimitBucketThrottle};
use crate::timeline::{clamped_elapsed_nanos, elapsed_nanos};
use crate::{BucketError, ConfigError, TimelineError, Timestamp, Uint};

/// A transaction-count throttle driven by consensus time.
pub type DeterministicThrottle = TimelineThrottle<BucketThrottle>;

/// A gas throttle driven by consensus time.
pub type GasLimitDeterministicThrottle = TimelineThrottle<GasLimitBucketThrottle>;

/// The externally durable state of one throttle.
///
/// Capacity and rate come from configuration and are not part of the
/// snapshot. Restoring a snapshot reproduces the exact future behavior of the
/// throttle that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleUsageSnapshot {
    pub used: Uint,
    pub last_decision_time: Option<Timestamp>,
}

impl ThrottleUsageSnapshot {
    /// The snapshot of a throttle that has never made a decision.
    pub const NEVER_USED: ThrottleUsageSnapshot = ThrottleUsageSnapshot {
        used: 0,
        last_decision_time: None,
    };

    pub fn new(used: Uint, last_decision_time: Option<Timestamp>) -> Self {
        ThrottleUsageSnapshot { used, last_decision_time }
    }
}

/// Ties a [`LeakyThrottle`] to a forward-only consensus timeline.
///
/// The wrapper remembers when it last decided, turns each new decision time
/// into elapsed nanoseconds for its delegate, and refuses decision times that
/// move backwards. It starts *fresh* (no decision yet) and becomes *active*
/// after the first [`allow`](Self::allow).
///
/// Equality compares configuration only (capacity and rate), never usage.
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::throttles::DeterministicThrottle;
/// use ledger_throttle_core::Timestamp;
///
/// let mut throttle = DeterministicThrottle::with_tps(100).unwrap().with_name("CryptoTransfer");
/// let t0 = Timestamp::new(1_234_567, 0);
///
/// assert_eq!(throttle.allow(100, t0), Ok(true));
/// assert_eq!(throttle.allow(1, t0), Ok(false));
/// assert_eq!(throttle.allow(1, t0.plus_nanos(10_000_000).unwrap()), Ok(true));
///
/// // Time cannot go backwards
/// assert!(throttle.allow(1, t0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TimelineThrottle<T> {
    name: Option<String>,
    last_decision_time: Option<Timestamp>,
    delegate: T,
}

impl<T: LeakyThrottle> TimelineThrottle<T> {
    /// Wraps a delegate in the fresh state.
    pub fn new(delegate: T) -> Self {
        debug!(
            capacity = delegate.bucket().total_capacity(),
            mtps = delegate.mtps(),
            "created deterministic throttle"
        );
        TimelineThrottle {
            name: None,
            last_decision_time: None,
            delegate,
        }
    }

    /// Sets the diagnostic name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Decides whether `quantity` is admitted at consensus time `now`.
    ///
    /// The decision time is recorded whether or not the delegate admits the
    /// quantity.
    ///
    /// # Errors
    ///
    /// * [`TimelineError::Regressed`] - `now` precedes the last decision time
    /// * [`TimelineError::Overflow`] - the elapsed time is out of range
    ///
    /// Neither error changes the throttle.
    pub fn allow(&mut self, quantity: Uint, now: Timestamp) -> Result<bool, TimelineError> {
        let elapsed = elapsed_nanos(self.last_decision_time, now).map_err(|err| {
            warn!(throttle = self.name(), error = %err, "throttle timeline violated");
            err
        })?;
        self.last_decision_time = Some(now);
        Ok(self.delegate.allow(quantity, elapsed))
    }

    /// Projected percent of capacity in use at `now`, without mutating.
    ///
    /// Never fails: a `now` before the last decision counts as no time
    /// passed. Returns `0.0` before the first decision.
    pub fn percent_used(&self, now: Timestamp) -> f64 {
        match self.last_decision_time {
            None => 0.0,
            last @ Some(_) => self.delegate.percent_used(clamped_elapsed_nanos(last, now)),
        }
    }

    pub fn instantaneous_percent_used(&self) -> f64 {
        self.delegate.instantaneous_percent_used()
    }

    /// Leaks an explicit number of bucket units.
    pub fn leak_capacity(&mut self, units: Uint) {
        self.delegate.leak_capacity(units);
    }

    pub fn reclaim_last_allowed_use(&mut self) {
        self.delegate.reclaim_last_allowed_use();
    }

    pub fn reset_last_allowed_use(&mut self) {
        self.delegate.reset_last_allowed_use();
    }

    pub fn usage_snapshot(&self) -> ThrottleUsageSnapshot {
        ThrottleUsageSnapshot {
            used: self.delegate.bucket().capacity_used(),
            last_decision_time: self.last_decision_time,
        }
    }

    /// Restores used capacity and decision time from a snapshot.
    ///
    /// Grants recorded before the restore are forgotten, so a later
    /// [`reclaim_last_allowed_use`](Self::reclaim_last_allowed_use) refunds
    /// nothing from them.
    ///
    /// # Errors
    ///
    /// [`BucketError::UsedOutOfRange`] if the snapshot's used amount exceeds
    /// this throttle's capacity; the throttle is left unchanged.
    pub fn reset_usage_to(&mut self, snapshot: &ThrottleUsageSnapshot) -> Result<(), BucketError> {
        self.delegate.bucket_mut().reset_used(snapshot.used)?;
        self.delegate.reset_last_allowed_use();
        self.last_decision_time = snapshot.last_decision_time;
        debug!(
            throttle = self.name(),
            used = snapshot.used,
            last_decision_time = ?snapshot.last_decision_time,
            "restored throttle usage"
        );
        Ok(())
    }

    /// Returns to the fresh state.
    pub fn reset_usage(&mut self) {
        self.delegate.reset_last_allowed_use();
        self.delegate.bucket_mut().leak(Uint::MAX);
        self.last_decision_time = None;
    }

    /// The diagnostic name, or `""` if unnamed.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn used(&self) -> Uint {
        self.delegate.bucket().capacity_used()
    }

    pub fn capacity(&self) -> Uint {
        self.delegate.bucket().total_capacity()
    }

    pub fn mtps(&self) -> Uint {
        self.delegate.mtps()
    }

    pub fn last_decision_time(&self) -> Option<Timestamp> {
        self.last_decision_time
    }

    pub fn delegate(&self) -> &T {
        &self.delegate
    }
}

impl<T: LeakyThrottle> PartialEq for TimelineThrottle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.mtps() == other.mtps()
    }
}

impl DeterministicThrottle {
    pub fn with_tps(tps: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_tps(tps).map(Self::new)
    }

    pub fn with_mtps(mtps: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_mtps(mtps).map(Self::new)
    }

    pub fn with_tps_and_burst_period(tps: Uint, burst_period_secs: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_tps_and_burst_period(tps, burst_period_secs).map(Self::new)
    }

    pub fn with_tps_and_burst_period_ms(tps: Uint, burst_period_ms: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_tps_and_burst_period_ms(tps, burst_period_ms).map(Self::new)
    }

    pub fn with_mtps_and_burst_period(mtps: Uint, burst_period_secs: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_mtps_and_burst_period(mtps, burst_period_secs).map(Self::new)
    }

    pub fn with_mtps_and_burst_period_ms(mtps: Uint, burst_period_ms: Uint) -> Result<Self, ConfigError> {
        BucketThrottle::with_mtps_and_burst_period_ms(mtps, burst_period_ms).map(Self::new)
    }
}

impl GasLimitDeterministicThrottle {
    /// Gas throttle with the given capacity in gas units.
    pub fn with_capacity(capacity: Uint) -> Result<Self, ConfigError> {
        GasLimitBucketThrottle::new(capacity).map(Self::new)
    }

    /// Returns gas reserved by an earlier admission that execution did not use.
    pub fn leak_unused_gas_previously_reserved(&mut self, unused_gas: Uint) {
        self.leak_capacity(unused_gas);
    }

    pub fn instantaneous_free_to_used_ratio(&self) -> Uint {
        self.delegate.free_to_used_ratio()
    }
}
