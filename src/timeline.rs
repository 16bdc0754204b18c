//! Elapsed time between consensus decisions.
//!
//! Both deterministic throttles measure time with these two functions, so the
//! transaction and gas paths see identical elapsed nanoseconds.

use crate::types::{Timestamp, Uint, NANOS_PER_SECOND};
use crate::TimelineError;

/// Signed nanoseconds from `last` to `now`, or `0` with no previous decision.
///
/// # Errors
///
/// [`TimelineError::Overflow`] if the difference does not fit an `i64`.
pub fn nanos_between(last: Option<Timestamp>, now: Timestamp) -> Result<i64, TimelineError> {
    let last = match last {
        Some(last) => last,
        None => return Ok(0),
    };
    now.seconds
        .checked_sub(last.seconds)
        .and_then(|secs| secs.checked_mul(NANOS_PER_SECOND))
        .and_then(|nanos| nanos.checked_add(i64::from(now.nanos) - i64::from(last.nanos)))
        .ok_or(TimelineError::Overflow { last, now })
}

/// Elapsed nanoseconds for a decision at `now`.
///
/// # Errors
///
/// * [`TimelineError::Regressed`] - `now` precedes `last`
/// * [`TimelineError::Overflow`] - the difference is out of range
pub fn elapsed_nanos(last: Option<Timestamp>, now: Timestamp) -> Result<Uint, TimelineError> {
    let nanos = nanos_between(last, now)?;
    match (last, Uint::try_from(nanos)) {
        (_, Ok(elapsed)) => Ok(elapsed),
        (Some(last), Err(_)) => Err(TimelineError::Regressed { last, now }),
        // nanos_between is 0 without a previous decision
        (None, Err(_)) => Ok(0),
    }
}

/// Elapsed nanoseconds for a read-only projection at `now`.
///
/// Never fails: a `now` before `last` counts as no time passed, and a
/// difference too large for `i64` saturates.
pub fn clamped_elapsed_nanos(last: Option<Timestamp>, now: Timestamp) -> Uint {
    match nanos_between(last, now) {
        Ok(nanos) => Uint::try_from(nanos).unwrap_or(0),
        Err(_) if last.map_or(false, |last| now > last) => Uint::MAX,
        Err(_) => 0,
    }
}
