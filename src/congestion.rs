//! Read-only view consumed by congestion pricing.

use crate::throttle_core::LeakyThrottle;
use crate::throttles::TimelineThrottle;
use crate::Uint;

/// What a congestion-pricing component may read from a throttle.
///
/// For gas throttles [`mtps`](Self::mtps) is `capacity * 1000` by convention,
/// not a real rate.
pub trait CongestibleThrottle {
    fn name(&self) -> &str;

    fn used(&self) -> Uint;

    fn capacity(&self) -> Uint;

    fn mtps(&self) -> Uint;

    fn instantaneous_percent_used(&self) -> f64;
}

impl<T: LeakyThrottle> CongestibleThrottle for TimelineThrottle<T> {
    fn name(&self) -> &str {
        TimelineThrottle::name(self)
    }

    fn used(&self) -> Uint {
        TimelineThrottle::used(self)
    }

    fn capacity(&self) -> Uint {
        TimelineThrottle::capacity(self)
    }

    fn mtps(&self) -> Uint {
        TimelineThrottle::mtps(self)
    }

    fn instantaneous_percent_used(&self) -> f64 {
        TimelineThrottle::instantaneous_percent_used(self)
    }
}

/// The highest instantaneous utilization among `throttles`, or `0.0` if empty.
pub fn max_instantaneous_percent_used<'a, I>(throttles: I) -> f64
where
    I: IntoIterator<Item = &'a dyn CongestibleThrottle>,
{
    throttles
        .into_iter()
        .map(|throttle| throttle.instantaneous_percent_used())
        .fold(0.0, f64::max)
}
