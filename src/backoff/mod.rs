//! Adaptive backoff: grow the delay on failure, ease it off after a run of successes.
//!
//! Plain exponential backoff only ever grows. A client that was throttled once
//! keeps waiting at its last failure-driven delay long after the pressure is
//! gone. [`AdaptiveBackoff`] also shrinks the delay after every
//! `down_multiplier_threshold` successes, and drops back to idle (no delay at
//! all) once the delay falls below `initial_interval`.
//!
//! - **Pure Core**: [`AdaptiveBackoff::record_failure`] and
//!   [`AdaptiveBackoff::record_success`] compute the next delay and update the
//!   metrics without waiting
//! - **Imperative Shell**: [`AdaptiveBackoff::on_failure`] and
//!   [`AdaptiveBackoff::on_success`] also block for that delay
//!
//! # Quick Start
//!
//! ```rust
//! use slackwater::{AdaptiveBackoff, BackoffConfig};
//! use std::time::Duration;
//!
//! let config = BackoffConfig::default()
//!     .with_initial_interval(Duration::from_micros(50))
//!     .with_max_interval(Duration::from_millis(5));
//! let mut backoff = AdaptiveBackoff::from_config(config).unwrap();
//!
//! for attempt in 0..6 {
//!     let throttled = attempt < 3;
//!     if throttled {
//!         backoff.on_failure();
//!     } else {
//!         backoff.on_success();
//!     }
//! }
//!
//! let metrics = backoff.metrics();
//! assert_eq!(metrics.total_invocation, 6);
//! assert_eq!(metrics.total_went_up, 3);
//! ```
//!
//! # The interval
//!
//! - Idle → failure: exactly `initial_interval`
//! - Active → failure: `interval * up_multiplier`, jittered, capped at `max_interval`
//! - Active → threshold-th success: `interval * down_multiplier`, jittered, and
//!   idle if that lands below `initial_interval`
//!
//! # Jitter
//!
//! Jitter spreads each computed delay uniformly over
//! `interval ± min(randomization_factor * interval, max_randomization)`. The
//! `jitter` feature (on by default) draws from `rand`. Without it, jitter is a
//! no-op unless a [`RandomSource`] is injected.

mod config;
mod controller;
mod error;
mod random;
mod metrics;
mod sleep;

pub use config::{
    BackoffConfig, DEFAULT_DOWN_MULTIPLIER, DEFAULT_DOWN_MULTIPLIER_THRESHOLD,
    DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_INTERVAL, DEFAULT_MAX_RANDOMIZATION,
    DEFAULT_RANDOMIZATION_FACTOR, DEFAULT_UP_MULTIPLIER,
};
pub use controller::{AdaptiveBackoff, Interval};
pub use error::ConfigError;
#[cfg(feature = "jitter")]
pub use random::RngSource;
pub use random::{jitter, DefaultRandom, Midpoint, RandomSource};
pub use metrics::BackoffMetrics;
pub use sleep::{Sleeper, ThreadSleeper};
