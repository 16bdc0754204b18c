//! Core trait for leaky-bucket throttles.
//!
//! This module defines the seam shared by the transaction-count throttle and
//! the gas throttle. Both leak a [`DiscreteLeakyBucket`] for a caller-supplied
//! number of elapsed nanoseconds and then test whether a quantity fits, so the
//! deterministic timeline wrapper can drive either one.

use crate::throttles::DiscreteLeakyBucket;
pub use crate::types::Uint;

/// The core trait implemented by the rate throttles.
///
/// Implementors never look at a clock. Time only enters through the
/// `elapsed_nanos` argument, which keeps every decision reproducible.
pub trait LeakyThrottle {
    /// Leaks the capacity that drains in `elapsed_nanos`.
    fn leak_for(&mut self, elapsed_nanos: Uint);

    /// Tests whether `quantity` fits right now, reserving it if so.
    ///
    /// # Returns
    /// * `true` if the quantity was admitted and reserved
    /// * `false` if it does not fit; nothing is reserved
    fn allow_instantaneous(&mut self, quantity: Uint) -> bool;

    /// Leaks for `elapsed_nanos`, then tests `quantity`.
    ///
    /// The leak happens whether or not the quantity is admitted.
    fn allow(&mut self, quantity: Uint, elapsed_nanos: Uint) -> bool {
        self.leak_for(elapsed_nanos);
        self.allow_instantaneous(quantity)
    }

    /// Leaks an explicit number of bucket units, e.g. to refund unused gas.
    fn leak_capacity(&mut self, units: Uint) {
        self.bucket_mut().leak(units);
    }

    /// Projects the percent of capacity in use if `elapsed_nanos` had passed.
    ///
    /// Does not mutate the bucket.
    fn percent_used(&self, elapsed_nanos: Uint) -> f64;

    fn instantaneous_percent_used(&self) -> f64 {
        self.percent_used(0)
    }

    /// Forgets the grants accumulated since the last reset or reclaim.
    fn reset_last_allowed_use(&mut self);

    /// Returns the grants accumulated since the last reset back to the bucket.
    fn reclaim_last_allowed_use(&mut self);

    /// Capacity units granted since the last reset or reclaim.
    fn last_allowed_units(&self) -> Uint;

    /// Milli-transactions per second, or the conventional equivalent.
    fn mtps(&self) -> Uint;

    fn bucket(&self) -> &DiscreteLeakyBucket;

    fn bucket_mut(&mut self) -> &mut DiscreteLeakyBucket;
}

/// `100 * (used - min(used, leak)) / capacity`, shared by both throttles.
#[inline]
pub(crate) fn projected_percent_used(bucket: &DiscreteLeakyBucket, leak: Uint) -> f64 {
    let used = bucket.capacity_used();
    let remaining = used - used.min(leak);
    100.0 * remaining as f64 / bucket.total_capacity() as f64
}
