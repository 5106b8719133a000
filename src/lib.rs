//! # Slackwater
//!
//! > *"Slack water: the still moment when the tide turns"*
//!
//! An adaptive backoff controller for Rust.
//!
//! ## Philosophy
//!
//! Fixed exponential backoff only knows how to slow down. **Slackwater** also
//! knows how to speed back up:
//! - **Failure** grows the delay, up to a ceiling
//! - **A run of successes** shrinks it again, until it falls below the initial
//!   delay and backoff switches off entirely
//!
//! One [`AdaptiveBackoff`] instance tracks one retried operation. The caller
//! performs the operation and reports the outcome; the controller decides how
//! long to wait and waits.
//!
//! ## Quick Example
//!
//! ```rust
//! use slackwater::{AdaptiveBackoff, BackoffConfig};
//! use std::time::Duration;
//!
//! # fn call_rate_limited_api(n: u32) -> Result<(), &'static str> {
//! #     if n % 4 == 0 { Err("429 Too Many Requests") } else { Ok(()) }
//! # }
//! let config = BackoffConfig::default()
//!     .with_initial_interval(Duration::from_micros(100))
//!     .with_max_interval(Duration::from_millis(10));
//! let mut backoff = AdaptiveBackoff::from_config(config).unwrap();
//!
//! for n in 0..8 {
//!     match call_rate_limited_api(n) {
//!         Ok(()) => backoff.on_success(),
//!         Err(_) => backoff.on_failure(),
//!     }
//! }
//!
//! let metrics = backoff.metrics();
//! assert_eq!(metrics.total_invocation, 8);
//! assert_eq!(metrics.total_went_up, 2);
//! ```
//!
//! For more examples, see the [demos](https://github.com/iepathos/slackwater/tree/master/demos) directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod testing;

// Re-exports
pub use backoff::{
    jitter, AdaptiveBackoff, BackoffConfig, BackoffMetrics, ConfigError, DefaultRandom, Interval,
    Midpoint, RandomSource, Sleeper, ThreadSleeper,
};
#[cfg(feature = "jitter")]
pub use backoff::RngSource;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{
        AdaptiveBackoff, BackoffConfig, BackoffMetrics, ConfigError, RandomSource, Sleeper,
    };
}
