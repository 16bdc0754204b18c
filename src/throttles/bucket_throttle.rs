use crate::throttle_core::{projected_percent_used, LeakyThrottle};
use crate::throttles::DiscreteLeakyBucket;
use crate::{ConfigError, Uint};
use tracing::trace;

/// Milli-transactions per second in one transaction per second.
pub const MTPS_PER_TPS: Uint = 1_000;
/// Nano-transactions per second in one milli-transaction per second.
pub const NTPS_PER_MTPS: Uint = 1_000_000;
/// Capacity units consumed by one transaction.
pub const CAPACITY_UNITS_PER_TXN: Uint = 1_000_000_000_000;
/// Capacity units consumed by one nano-transaction.
pub const CAPACITY_UNITS_PER_NANO_TXN: Uint = 1_000;
/// Default burst period, in milliseconds.
pub const ONE_SECOND_IN_MS: Uint = 1_000;

/// A transaction-count throttle with milli-TPS resolution.
///
/// One transaction is [`CAPACITY_UNITS_PER_TXN`] bucket units, and the bucket
/// drains `mtps` units per elapsed nanosecond. The bucket holds a full burst
/// period's worth of transactions.
///
/// All arithmetic is integer and overflow-checked. Invalid rate and burst
/// combinations are rejected when the throttle is built.
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::throttles::BucketThrottle;
/// use ledger_throttle_core::LeakyThrottle;
///
/// // 100 TPS with the default one-second burst
/// let mut throttle = BucketThrottle::with_tps(100).unwrap();
///
/// assert!(throttle.allow(100, 0));
/// assert!(!throttle.allow(1, 0));
///
/// // 10ms at 100 TPS drains exactly one transaction
/// assert!(throttle.allow(1, 10_000_000));
/// ```
#[derive(Debug, Clone)]
pub struct BucketThrottle {
    /// Configured rate in milli-transactions per second.
    mtps: Uint,
    bucket: DiscreteLeakyBucket,
    /// Units granted since the last reset or reclaim.
    last_allowed_units: Uint,
}

impl BucketThrottle {
    /// Whole transactions per second, one-second burst.
    pub fn with_tps(tps: Uint) -> Result<Self, ConfigError> {
        Self::new(tps_to_mtps(tps)?, ONE_SECOND_IN_MS)
    }

    /// Milli-transactions per second, one-second burst.
    pub fn with_mtps(mtps: Uint) -> Result<Self, ConfigError> {
        Self::new(mtps, ONE_SECOND_IN_MS)
    }

    /// Whole transactions per second, burst period in whole seconds.
    pub fn with_tps_and_burst_period(tps: Uint, burst_period_secs: Uint) -> Result<Self, ConfigError> {
        Self::new(tps_to_mtps(tps)?, secs_to_ms(burst_period_secs)?)
    }

    /// Whole transactions per second, burst period in milliseconds.
    pub fn with_tps_and_burst_period_ms(tps: Uint, burst_period_ms: Uint) -> Result<Self, ConfigError> {
        Self::new(tps_to_mtps(tps)?, burst_period_ms)
    }

    /// Milli-transactions per second, burst period in whole seconds.
    pub fn with_mtps_and_burst_period(mtps: Uint, burst_period_secs: Uint) -> Result<Self, ConfigError> {
        Self::new(mtps, secs_to_ms(burst_period_secs)?)
    }

    /// Milli-transactions per second, burst period in milliseconds.
    pub fn with_mtps_and_burst_period_ms(mtps: Uint, burst_period_ms: Uint) -> Result<Self, ConfigError> {
        Self::new(mtps, burst_period_ms)
    }

    /// Creates a throttle from a rate and burst period.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::CalculationOutOfRange`] - if the per-millisecond
    ///   capacity or its scaling by the burst period overflows
    /// * [`ConfigError::CannotAdmitOneTransaction`] - if the bucket could not
    ///   hold a single transaction
    pub fn new(mtps: Uint, burst_period_ms: Uint) -> Result<Self, ConfigError> {
        let capacity = capacity_for(mtps, burst_period_ms)?;
        if capacity < CAPACITY_UNITS_PER_TXN {
            return Err(ConfigError::CannotAdmitOneTransaction { mtps, burst_period_ms });
        }
        Ok(BucketThrottle {
            mtps,
            bucket: DiscreteLeakyBucket::new(capacity),
            last_allowed_units: 0,
        })
    }

    /// Leaks the units drained in `elapsed_nanos`, clamped to a full drain.
    fn effective_leak(&self, elapsed_nanos: Uint) -> Uint {
        elapsed_nanos
            .checked_mul(self.mtps)
            .unwrap_or_else(|| self.bucket.total_capacity())
    }
}

impl LeakyThrottle for BucketThrottle {
    #[inline]
    fn leak_for(&mut self, elapsed_nanos: Uint) {
        let leaked = self.effective_leak(elapsed_nanos);
        self.bucket.leak(leaked);
    }

    fn allow_instantaneous(&mut self, num_reqs: Uint) -> bool {
        // An absurd request can never be legitimate
        let required = match num_reqs.checked_mul(CAPACITY_UNITS_PER_TXN) {
            Some(units) => units,
            None => return false,
        };
        if required > self.bucket.capacity_free() || self.bucket.use_capacity(required).is_err() {
            trace!(num_reqs, free = self.bucket.capacity_free(), "transaction throttle rejected");
            return false;
        }
        self.last_allowed_units = self.last_allowed_units.saturating_add(required);
        true
    }

    fn percent_used(&self, elapsed_nanos: Uint) -> f64 {
        projected_percent_used(&self.bucket, self.effective_leak(elapsed_nanos))
    }

    fn reset_last_allowed_use(&mut self) {
        self.last_allowed_units = 0;
    }

    fn reclaim_last_allowed_use(&mut self) {
        self.bucket.leak(self.last_allowed_units);
        self.last_allowed_units = 0;
    }

    fn last_allowed_units(&self) -> Uint {
        self.last_allowed_units
    }

    fn mtps(&self) -> Uint {
        self.mtps
    }

    fn bucket(&self) -> &DiscreteLeakyBucket {
        &self.bucket
    }

    fn bucket_mut(&mut self) -> &mut DiscreteLeakyBucket {
        &mut self.bucket
    }
}

/// `mtps * NTPS_PER_MTPS * CAPACITY_UNITS_PER_NANO_TXN / 1000` per millisecond,
/// times the burst period.
fn capacity_for(mtps: Uint, burst_period_ms: Uint) -> Result<Uint, ConfigError> {
    const UNITS_PER_MTPS_PER_MS: Uint = NTPS_PER_MTPS * CAPACITY_UNITS_PER_NANO_TXN / ONE_SECOND_IN_MS;

    let unscaled = mtps
        .checked_mul(UNITS_PER_MTPS_PER_MS)
        .ok_or(ConfigError::CalculationOutOfRange {
            what: "capacity units per millisecond",
            lhs: mtps,
            rhs: UNITS_PER_MTPS_PER_MS,
        })?;
    unscaled
        .checked_mul(burst_period_ms)
        .ok_or(ConfigError::CalculationOutOfRange {
            what: "capacity for burst period",
            lhs: unscaled,
            rhs: burst_period_ms,
        })
}

fn tps_to_mtps(tps: Uint) -> Result<Uint, ConfigError> {
    tps.checked_mul(MTPS_PER_TPS).ok_or(ConfigError::CalculationOutOfRange {
        what: "milli-transactions per second",
        lhs: tps,
        rhs: MTPS_PER_TPS,
    })
}

fn secs_to_ms(secs: Uint) -> Result<Uint, ConfigError> {
    secs.checked_mul(ONE_SECOND_IN_MS).ok_or(ConfigError::CalculationOutOfRange {
        what: "burst period in milliseconds",
        lhs: secs,
        rhs: ONE_SECOND_IN_MS,
    })
}
