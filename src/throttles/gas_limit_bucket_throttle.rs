use crate::throttle_core::{projected_percent_used, LeakyThrottle};
use crate::throttles::DiscreteLeakyBucket;
use crate::{ConfigError, Uint};
use tracing::trace;

/// Nanoseconds for a full bucket to drain completely.
pub const TIME_TO_EMPTY_NANOS: Uint = 1_000_000_000;

/// A gas throttle: the bucket holds gas units directly and drains its whole
/// capacity every [`TIME_TO_EMPTY_NANOS`].
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::throttles::GasLimitBucketThrottle;
/// use ledger_throttle_core::LeakyThrottle;
///
/// let mut throttle = GasLimitBucketThrottle::new(15_000_000).unwrap();
/// assert!(throttle.allow(15_000_000, 0));
/// assert!(!throttle.allow(1, 0));
///
/// // Half a second drains half the bucket
/// assert!(throttle.allow(7_500_000, 500_000_000));
/// ```
#[derive(Debug, Clone)]
pub struct GasLimitBucketThrottle {
    bucket: DiscreteLeakyBucket,
    /// Gas granted since the last reset or reclaim.
    last_allowed_units: Uint,
}

impl GasLimitBucketThrottle {
    /// Creates a gas throttle with the given capacity in gas units.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: Uint) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(GasLimitBucketThrottle {
            bucket: DiscreteLeakyBucket::new(capacity),
            last_allowed_units: 0,
        })
    }

    /// Free gas per unit of used gas; [`Uint::MAX`] when nothing is used.
    pub fn free_to_used_ratio(&self) -> Uint {
        match self.bucket.capacity_used() {
            0 => Uint::MAX,
            used => self.bucket.capacity_free() / used,
        }
    }

    fn effective_leak(&self, elapsed_nanos: Uint) -> Uint {
        let capacity = self.bucket.total_capacity();
        if elapsed_nanos >= TIME_TO_EMPTY_NANOS {
            return capacity;
        }
        match elapsed_nanos.checked_mul(capacity) {
            Some(product) => product / TIME_TO_EMPTY_NANOS,
            None => Uint::MAX / TIME_TO_EMPTY_NANOS,
        }
    }
}

impl LeakyThrottle for GasLimitBucketThrottle {
    #[inline]
    fn leak_for(&mut self, elapsed_nanos: Uint) {
        let leaked = self.effective_leak(elapsed_nanos);
        self.bucket.leak(leaked);
    }

    fn allow_instantaneous(&mut self, gas_limit: Uint) -> bool {
        if self.bucket.capacity_free() < gas_limit || self.bucket.use_capacity(gas_limit).is_err() {
            trace!(gas_limit, free = self.bucket.capacity_free(), "gas throttle rejected");
            return false;
        }
        self.last_allowed_units = self.last_allowed_units.saturating_add(gas_limit);
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

    /// Not a real rate: gas throttles report `capacity * 1000` by convention.
    fn mtps(&self) -> Uint {
        self.bucket.total_capacity().saturating_mul(1_000)
    }

    fn bucket(&self) -> &DiscreteLeakyBucket {
        &self.bucket
    }

    fn bucket_mut(&mut self) -> &mut DiscreteLeakyBucket {
        &mut self.bucket
    }
}
