//! Deterministic leaky-bucket throttles for consensus-ordered admission.
//!
//! Every node in a Byzantine-fault-tolerant network evaluates these throttles
//! against the same consensus timeline, in the same order, and must reach the
//! same admit/reject decisions. All arithmetic is integer, overflow-checked and
//! platform independent, and time only enters as caller-supplied consensus
//! timestamps.
//!
//! # Quick Start
//!
//! ```rust
//! use ledger_throttle_core::throttles::DeterministicThrottle;
//! use ledger_throttle_core::Timestamp;
//!
//! // 100 transactions per second with a one-second burst
//! let mut throttle = DeterministicThrottle::with_tps(100).unwrap();
//! let t0 = Timestamp::new(1_700_000_000, 0);
//!
//! match throttle.allow(1, t0) {
//!     Ok(true) => println!("Transaction admitted"),
//!     Ok(false) => println!("Transaction throttled"),
//!     Err(e) => println!("Timeline violated: {}", e),
//! }
//! ```
//!
//! # Available Throttles
//!
//! ## [Transaction throttle](throttles::DeterministicThrottle)
//! Counts transactions at milli-TPS resolution:
//! ```rust
//! # use ledger_throttle_core::throttles::DeterministicThrottle;
//! let throttle = DeterministicThrottle::with_mtps_and_burst_period_ms(500, 4_000).unwrap(); // 0.5 TPS, 4s burst
//! ```
//!
//! ## [Gas throttle](throttles::GasLimitDeterministicThrottle)
//! Counts gas, draining the full capacity every second:
//! ```rust
//! # use ledger_throttle_core::throttles::GasLimitDeterministicThrottle;
//! let throttle = GasLimitDeterministicThrottle::with_capacity(15_000_000).unwrap();
//! ```
//!
//! # Core Concepts
//!
//! ## Time Representation
//! Decisions are stamped with a consensus [`Timestamp`]. A throttle remembers
//! the time of its last decision and leaks capacity for the nanoseconds since.
//! A decision time earlier than the last one is a caller bug and fails with
//! [`TimelineError`].
//!
//! ## Error Handling
//! - **`Ok(true)` / `Ok(false)`** - admitted or throttled; throttling is not an error
//! - **[`ConfigError`]** - a throttle that could never work, at construction only
//! - **[`TimelineError`]** - the decision time moved backwards
//! - **[`BucketError`]** - a restored snapshot does not fit the bucket
//!
//! ## Refunds
//! A caller that admitted work which later fails can hand the grant back with
//! `reclaim_last_allowed_use`, or return an explicit amount (such as unused
//! gas) with `leak_capacity`.
//!
//! ## Snapshots
//! [`ThrottleUsageSnapshot`](throttles::ThrottleUsageSnapshot) is the whole
//! durable state of a throttle. Restoring it reproduces the exact future
//! decisions of the throttle it was taken from.
//!
//! ## Thread Safety
//! Throttles are plain owned values mutated through `&mut self`. They are
//! meant to be driven by a single consensus-processing thread.

pub mod config;
pub mod congestion;
pub mod error;
pub mod reqs_manager;
pub mod scale_factor;
pub mod throttle_core;
pub mod throttles;
pub mod timeline;
pub mod types;

pub use congestion::CongestibleThrottle;
pub use error::{BucketError, ConfigError, SnapshotError, ThrottleError, TimelineError};
pub use reqs_manager::{ThrottleReq, ThrottleReqsManager};
pub use scale_factor::ScaleFactor;
pub use throttle_core::LeakyThrottle;
pub use types::{Timestamp, Uint};
