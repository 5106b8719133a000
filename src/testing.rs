//! Testing utilities for code that drives an [`AdaptiveBackoff`](crate::AdaptiveBackoff).
//!
//! Real backoff sleeps for real. These helpers replace the two side-effecting
//! capabilities of the controller so tests run instantly and deterministically:
//!
//! - [`RecordingSleeper`] records requested waits instead of blocking
//! - [`FixedRandom`] and [`ScriptedRandom`] make jitter reproducible
//! - [`assert_metrics!`](crate::assert_metrics) compares all counters at once
//!
//! # Examples
//!
//! ```rust
//! use slackwater::testing::{RecordingSleeper, ScriptedRandom};
//! use slackwater::{assert_metrics, AdaptiveBackoff, BackoffConfig};
//! use std::time::Duration;
//!
//! let config = BackoffConfig::default()
//!     .with_initial_interval(Duration::from_millis(100))
//!     .with_up_multiplier(2.0)
//!     .with_randomization_factor(0.1);
//!
//! let mut backoff = AdaptiveBackoff::from_config(config)
//!     .unwrap()
//!     .with_sleeper(RecordingSleeper::new())
//!     .with_random(ScriptedRandom::new(vec![0.0]));
//!
//! backoff.on_failure(); // 100ms, no jitter when leaving idle
//! backoff.on_failure(); // 200ms - 20ms at the low edge of the window
//!
//! assert_eq!(backoff.current_interval(), Some(Duration::from_millis(180)));
//! assert_metrics!(
//!     backoff,
//!     invocation: 2,
//!     went_up: 2,
//!     went_down: 0,
//!     slept: 2,
//!     sleep_time: Duration::from_millis(280),
//! );
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::backoff::{RandomSource, Sleeper};

/// A [`Sleeper`] that records every requested wait and returns immediately.
///
/// Zero-length waits are recorded too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSleeper {
    recorded: Vec<Duration>,
}

impl RecordingSleeper {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    pub fn recorded(&self) -> &[Duration] {
        &self.recorded
    }

    /// Sum of the recorded waits.
    pub fn total(&self) -> Duration {
        self.recorded.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.recorded.push(duration);
    }
}

/// A [`RandomSource`] that always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(f64);

impl FixedRandom {
    /// Create a source yielding `value`, which should lie in `[0, 1)`.
    pub fn new(value: f64) -> Self {
        Self(value)
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// A [`RandomSource`] that replays a script of values.
///
/// After the script runs out, the last value repeats. An empty script yields
/// `0.5`, the center of the jitter window.
///
/// # Example
///
/// ```rust
/// use slackwater::testing::ScriptedRandom;
/// use slackwater::RandomSource;
///
/// let mut random = ScriptedRandom::new(vec![0.1, 0.9]);
/// assert_eq!(random.next_unit(), 0.1);
/// assert_eq!(random.next_unit(), 0.9);
/// assert_eq!(random.next_unit(), 0.9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    last: f64,
}

impl ScriptedRandom {
    /// Create a source replaying `script` in order.
    pub fn new(script: Vec<f64>) -> Self {
        Self {
            script: script.into(),
            last: 0.5,
        }
    }

    /// Values left before the last one starts repeating.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Assert every counter of a controller's metrics at once.
///
/// # Example
///
/// ```rust
/// use slackwater::{assert_metrics, AdaptiveBackoff};
/// use std::time::Duration;
///
/// let mut backoff = AdaptiveBackoff::new();
/// backoff.on_success();
///
/// assert_metrics!(
///     backoff,
///     invocation: 1,
///     went_up: 0,
///     went_down: 0,
///     slept: 0,
///     sleep_time: Duration::ZERO,
/// );
/// ```
#[macro_export]
macro_rules! assert_metrics {
    (
        $backoff:expr,
        invocation: $invocation:expr,
        went_up: $went_up:expr,
        went_down: $went_down:expr,
        slept: $slept:expr,
        sleep_time: $sleep_time:expr $(,)?
    ) => {
        assert_eq!(
            $backoff.metrics(),
            $crate::BackoffMetrics {
                total_invocation: $invocation,
                total_went_up: $went_up,
                total_went_down: $went_down,
                total_slept: $slept,
                total_sleep_time: $sleep_time,
            }
        )
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

/// Generates configurations that pass [`BackoffConfig::validate`](crate::BackoffConfig::validate),
/// with intervals kept under a second.
#[cfg(feature = "proptest")]
impl Arbitrary for crate::BackoffConfig {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            1u64..1_000_000,
            1u64..1_000,
            1.0f64..4.0,
            0.05f64..=1.0,
            1u32..20,
            prop_oneof![Just(0.0), 0.0f64..=1.0],
            0u64..1_000_000,
        )
            .prop_map(
                |(initial, ceiling_factor, up, down, threshold, factor, max_rand)| {
                    crate::BackoffConfig {
                        initial_interval: Duration::from_nanos(initial),
                        max_interval: Duration::from_nanos(initial * ceiling_factor),
                        up_multiplier: up,
                        down_multiplier: down,
                        down_multiplier_threshold: threshold,
                        randomization_factor: factor,
                        max_randomization: Duration::from_nanos(max_rand),
                    }
                },
            )
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdaptiveBackoff;

    #[test]
    fn recording_sleeper_records_in_order() {
        let mut sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_millis(3));
        sleeper.sleep(Duration::ZERO);
        sleeper.sleep(Duration::from_millis(4));

        assert_eq!(
            sleeper.recorded(),
            &[
                Duration::from_millis(3),
                Duration::ZERO,
                Duration::from_millis(4)
            ]
        );
        assert_eq!(sleeper.total(), Duration::from_millis(7));
    }

    #[test]
    fn scripted_random_repeats_last_value() {
        let mut random = ScriptedRandom::new(vec![0.25]);
        assert_eq!(random.remaining(), 1);
        assert_eq!(random.next_unit(), 0.25);
        assert_eq!(random.remaining(), 0);
        assert_eq!(random.next_unit(), 0.25);
    }

    #[test]
    fn scripted_random_empty_yields_center() {
        let mut random = ScriptedRandom::new(vec![]);
        assert_eq!(random.next_unit(), 0.5);
    }

    #[test]
    fn fixed_random_is_constant() {
        let mut random = FixedRandom::new(0.75);
        assert_eq!(random.next_unit(), 0.75);
        assert_eq!(random.next_unit(), 0.75);
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn assert_metrics_panics_on_mismatch() {
        let mut backoff = AdaptiveBackoff::new().with_sleeper(RecordingSleeper::new());
        backoff.on_failure();
        assert_metrics!(
            backoff,
            invocation: 1,
            went_up: 0,
            went_down: 0,
            slept: 1,
            sleep_time: Duration::from_millis(500),
        );
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use crate::BackoffConfig;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn config_arbitrary_generates_valid_instances(config in any::<BackoffConfig>()) {
                prop_assert!(config.validate().is_ok());
            }
        }
    }
}
