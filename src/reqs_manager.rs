//! All-or-nothing admission across several throttles.
//!
//! One category of operation may be limited by more than one throttle at
//! once. The manager asks every throttle, and if any of them says no it hands
//! back whatever the others granted, so a rejected operation leaves no usage
//! behind.

use tracing::{debug, warn};

use crate::throttles::{DeterministicThrottle, ThrottleUsageSnapshot};
use crate::timeline::elapsed_nanos;
use crate::{BucketError, ScaleFactor, SnapshotError, TimelineError, Timestamp, Uint};

/// One throttle and the operations it charges per transaction.
#[derive(Debug, Clone)]
pub struct ThrottleReq {
    pub throttle: DeterministicThrottle,
    pub ops_per_txn: Uint,
}

#[derive(Debug, Clone, Default)]
pub struct ThrottleReqsManager {
    reqs: Vec<ThrottleReq>,
}

impl ThrottleReqsManager {
    pub fn new(reqs: Vec<ThrottleReq>) -> Self {
        ThrottleReqsManager { reqs }
    }

    pub fn push(&mut self, throttle: DeterministicThrottle, ops_per_txn: Uint) {
        self.reqs.push(ThrottleReq { throttle, ops_per_txn });
    }

    /// Whether `n_txns` transactions pass every throttle at `now`.
    ///
    /// # Errors
    ///
    /// Any [`TimelineError`] from a throttle. The check is made against every
    /// throttle before any of them is charged, so an error leaves all usage
    /// untouched.
    pub fn all_reqs_met_at(&mut self, n_txns: Uint, now: Timestamp) -> Result<bool, TimelineError> {
        self.reqs_met_at(n_txns, now, None)
    }

    /// Like [`all_reqs_met_at`](Self::all_reqs_met_at), with each throttle's
    /// required ops scaled by `scale_factor`.
    pub fn all_reqs_met_at_scaled(
        &mut self,
        n_txns: Uint,
        now: Timestamp,
        scale_factor: ScaleFactor,
    ) -> Result<bool, TimelineError> {
        self.reqs_met_at(n_txns, now, Some(scale_factor))
    }

    fn reqs_met_at(
        &mut self,
        n_txns: Uint,
        now: Timestamp,
        scale_factor: Option<ScaleFactor>,
    ) -> Result<bool, TimelineError> {
        for req in &self.reqs {
            if let Err(err) = elapsed_nanos(req.throttle.last_decision_time(), now) {
                warn!(throttle = req.throttle.name(), error = %err, "throttle timeline violated");
                return Err(err);
            }
        }

        let mut all_met = true;
        for req in &mut self.reqs {
            req.throttle.reset_last_allowed_use();
            let ops = match n_txns.checked_mul(req.ops_per_txn) {
                Some(ops) => scale_factor.map_or(ops, |factor| factor.scaling(ops)),
                None => Uint::MAX,
            };
            all_met &= req.throttle.allow(ops, now)?;
        }
        if !all_met {
            for req in &mut self.reqs {
                req.throttle.reclaim_last_allowed_use();
            }
        }
        Ok(all_met)
    }

    pub fn usage_snapshots(&self) -> Vec<ThrottleUsageSnapshot> {
        self.reqs.iter().map(|req| req.throttle.usage_snapshot()).collect()
    }

    /// Restores every throttle from saved snapshots, in order.
    ///
    /// # Errors
    ///
    /// * [`SnapshotError::CountMismatch`] - the number of snapshots differs
    ///   from the number of throttles
    /// * [`SnapshotError::Bucket`] - a saved used amount does not fit
    ///
    /// On error no throttle is changed.
    pub fn reset_usages_to(&mut self, snapshots: &[ThrottleUsageSnapshot]) -> Result<(), SnapshotError> {
        if snapshots.len() != self.reqs.len() {
            warn!(
                expected = self.reqs.len(),
                actual = snapshots.len(),
                "usage snapshots do not match active throttles"
            );
            return Err(SnapshotError::CountMismatch {
                expected: self.reqs.len(),
                actual: snapshots.len(),
            });
        }

        for (req, snapshot) in self.reqs.iter().zip(snapshots) {
            if snapshot.used > req.throttle.capacity() {
                return Err(BucketError::UsedOutOfRange {
                    used: snapshot.used,
                    capacity: req.throttle.capacity(),
                }
                .into());
            }
        }
        for (req, snapshot) in self.reqs.iter_mut().zip(snapshots) {
            req.throttle.reset_usage_to(snapshot)?;
        }
        debug!(count = snapshots.len(), "restored throttle usage snapshots");
        Ok(())
    }

    pub fn reset_usage(&mut self) {
        for req in &mut self.reqs {
            req.throttle.reset_usage();
        }
    }

    pub fn throttles(&self) -> impl Iterator<Item = &DeterministicThrottle> {
        self.reqs.iter().map(|req| &req.throttle)
    }

    pub fn len(&self) -> usize {
        self.reqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reqs.is_empty()
    }
}
