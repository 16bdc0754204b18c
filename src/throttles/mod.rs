//! Leaky-bucket throttle implementations.
//!
//! Each layer owns the one below it:
//!
//! - **[`DiscreteLeakyBucket`]** - a capacity ledger with no notion of time
//! - **[`BucketThrottle`]** - transaction counts at milli-TPS resolution
//! - **[`GasLimitBucketThrottle`]** - gas units, fully drained every second
//! - **[`TimelineThrottle`]** - ties either throttle to consensus time
//!
//! | Throttle | Capacity unit | Leak per nanosecond | Quantity |
//! |----------|---------------|---------------------|----------|
//! | Bucket | 10^-12 txn | `mtps` units | transactions |
//! | Gas limit | 1 gas | `capacity / 10^9` gas | gas limit |
//!
//! # Thread Safety
//!
//! None of these types synchronize. Each instance belongs to the single
//! consensus-processing path that feeds it decisions in timeline order.

pub mod discrete_leaky_bucket;
pub use discrete_leaky_bucket::DiscreteLeakyBucket;

pub mod bucket_throttle;
pub use bucket_throttle::BucketThrottle;
pub use bucket_throttle::CAPACITY_UNITS_PER_TXN;

pub mod gas_limit_bucket_throttle;
pub use gas_limit_bucket_throttle::GasLimitBucketThrottle;
pub use gas_limit_bucket_throttle::TIME_TO_EMPTY_NANOS;

pub mod deterministic_throttle;
pub use deterministic_throttle::DeterministicThrottle;
pub use deterministic_throttle::GasLimitDeterministicThrottle;
pub use deterministic_throttle::ThrottleUsageSnapshot;
pub use deterministic_throttle::TimelineThrottle;
