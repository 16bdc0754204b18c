//! error.rs
//! Error taxonomy for throttle construction, bucket bookkeeping and the
//! consensus timeline.
//!
//! Capacity exhaustion is deliberately absent: a full bucket is an ordinary
//! `false` from `allow`, never an error.

use crate::types::{Timestamp, Uint};
use thiserror::Error;

/// A mutation would break the `0 <= used <= capacity` ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// Not enough free capacity for the requested units.
    #[error("cannot use {requested} units, only {free} free")]
    InsufficientCapacity { requested: Uint, free: Uint },
    /// An explicit used amount lies outside `[0, capacity]`.
    #[error("used amount {used} is outside the bucket capacity {capacity}")]
    UsedOutOfRange { used: Uint, capacity: Uint },
}

/// A throttle configuration that can never be valid.
///
/// Always raised at construction time, never while deciding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An intermediate scaling product does not fit the integer domain.
    #[error("calculation out of range: {what} ({lhs} * {rhs})")]
    CalculationOutOfRange {
        what: &'static str,
        lhs: Uint,
        rhs: Uint,
    },
    /// The bucket would be too small to hold even one transaction.
    #[error("a throttle with {mtps} MTPS and {burst_period_ms}ms burst period can never allow a transaction")]
    CannotAdmitOneTransaction { mtps: Uint, burst_period_ms: Uint },
    /// A gas throttle needs a positive capacity.
    #[error("gas throttle capacity must be greater than 0")]
    ZeroCapacity,
    /// Neither ops-per-second nor milli-ops-per-second was set.
    #[error("throttle {0:?} has no rate configured")]
    MissingRate(Option<String>),
    /// A scale factor string was not of the form `numerator:denominator`
    /// with both terms positive.
    #[error("invalid scale factor {0:?}")]
    InvalidScaleFactor(String),
}

/// The caller fed a decision time that breaks the monotonic timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// `now` precedes the last recorded decision time.
    #[error("decision time {now} precedes the last decision time {last}")]
    Regressed { last: Timestamp, now: Timestamp },
    /// The distance between the two instants does not fit in signed 64-bit nanos.
    #[error("nanoseconds between {last} and {now} are out of range")]
    Overflow { last: Timestamp, now: Timestamp },
}

/// Saved usage could not be applied to the active throttles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The number of saved snapshots differs from the number of throttles.
    #[error("there are {expected} active throttles, but {actual} usage snapshots")]
    CountMismatch { expected: usize, actual: usize },
    /// A saved used amount does not fit the current bucket.
    #[error(transparent)]
    Bucket(#[from] BucketError),
}

/// Umbrella error for callers that mix construction, decision and restore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Bucket(#[from] BucketError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
