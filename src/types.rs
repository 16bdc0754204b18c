//! Integer and time types shared by every throttle.
//!
//! `Uint` is the integer used for capacities, capacity units and elapsed
//! nanoseconds. Unlike a general-purpose limiter it is not switchable by
//! feature flag: every node must compute the same values bit-for-bit, so the
//! width is fixed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias for the unsigned integer type used for capacities and elapsed time.
pub type Uint = u64;

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A consensus timestamp, split into whole seconds and nanoseconds.
///
/// Values compare lexicographically by `(seconds, nanos)`, which matches
/// chronological order as long as `nanos` is in `0..1_000_000_000`.
/// [`Timestamp::new`] normalizes out-of-range nanos, and so does
/// deserialization.
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::Timestamp;
///
/// let t0 = Timestamp::new(1_234_567, 999_999_999);
/// let t1 = t0.plus_nanos(2).unwrap();
/// assert_eq!(t1, Timestamp::new(1_234_568, 1));
/// assert!(t0 < t1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct Timestamp {
    /// Whole seconds since the epoch.
    pub seconds: i64,
    /// Nanosecond adjustment, in `0..1_000_000_000` once normalized.
    pub nanos: i32,
}

impl Timestamp {
    /// The epoch, `(0, 0)`.
    pub const EPOCH: Timestamp = Timestamp { seconds: 0, nanos: 0 };

    /// Creates a timestamp, carrying any nanos outside `0..1_000_000_000`
    /// into the seconds field.
    ///
    /// Saturates the seconds field rather than wrapping if the carry would
    /// overflow it.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        let nanos = i64::from(nanos);
        let carry = nanos.div_euclid(NANOS_PER_SECOND);
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND);
        Timestamp {
            seconds: seconds.saturating_add(carry),
            // rem_euclid keeps this in 0..1e9, which fits an i32
            nanos: nanos as i32,
        }
    }

    /// Creates a timestamp from whole seconds.
    pub const fn from_seconds(seconds: i64) -> Self {
        Timestamp { seconds, nanos: 0 }
    }

    /// Returns this timestamp advanced by `nanos`, or `None` on overflow.
    pub fn plus_nanos(&self, nanos: Uint) -> Option<Timestamp> {
        let whole = i64::try_from(nanos / NANOS_PER_SECOND as Uint).ok()?;
        let frac = (nanos % NANOS_PER_SECOND as Uint) as i64;
        let total_nanos = i64::from(self.nanos) + frac;
        let seconds = self
            .seconds
            .checked_add(whole)?
            .checked_add(total_nanos / NANOS_PER_SECOND)?;
        Some(Timestamp {
            seconds,
            nanos: (total_nanos % NANOS_PER_SECOND) as i32,
        })
    }
}

/// Persisted form, which may carry nanos outside `0..1_000_000_000`.
#[derive(Deserialize)]
struct RawTimestamp {
    seconds: i64,
    nanos: i32,
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        Timestamp::new(raw.seconds, raw.nanos)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}
