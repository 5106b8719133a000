//! The adaptive backoff state machine.

use std::time::Duration;

use super::random::{jitter, DefaultRandom, RandomSource};
use super::sleep::{Sleeper, ThreadSleeper};
use super::{BackoffConfig, BackoffMetrics, ConfigError};

/// Whether a backoff is currently in effect.
///
/// `Idle` is distinct from a zero-length `Active` interval: an idle controller
/// ignores successes entirely, while an active one counts them toward the next
/// shrink step. The controller never stores `Active(Duration::ZERO)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// No backoff in effect.
    #[default]
    Idle,
    /// Backoff in effect with the given delay.
    Active(Duration),
}

impl Interval {
    /// The delay to wait, zero when idle.
    pub fn duration(&self) -> Duration {
        match self {
            Interval::Idle => Duration::ZERO,
            Interval::Active(d) => *d,
        }
    }

    /// Returns true if no backoff is in effect.
    pub fn is_idle(&self) -> bool {
        matches!(self, Interval::Idle)
    }

    fn from_nanos(nanos: f64) -> Self {
        // `as` saturates: negatives and NaN become zero
        Self::from_duration(Duration::from_nanos(nanos as u64))
    }

    fn from_duration(d: Duration) -> Self {
        if d.is_zero() {
            Interval::Idle
        } else {
            Interval::Active(d)
        }
    }
}

/// An adaptive backoff controller for a single retried operation.
///
/// Call [`on_failure`](Self::on_failure) after each failed attempt and
/// [`on_success`](Self::on_success) after each successful one. Failures grow
/// the interval (up to `max_interval`); every `down_multiplier_threshold`
/// successes shrink it, until it drops below `initial_interval` and the
/// controller goes idle again. Both calls block for the resulting interval.
///
/// The controller is not synchronized. Each retry loop owns its own instance.
///
/// # Examples
///
/// ```rust
/// use slackwater::{AdaptiveBackoff, BackoffConfig};
/// use std::time::Duration;
///
/// let config = BackoffConfig::default()
///     .with_initial_interval(Duration::from_micros(10))
///     .with_randomization_factor(0.0)
///     .with_up_multiplier(2.0);
/// let mut backoff = AdaptiveBackoff::from_config(config).unwrap();
///
/// backoff.on_success(); // idle: returns immediately
/// backoff.on_failure(); // sleeps 10µs
/// backoff.on_failure(); // sleeps 20µs
///
/// assert_eq!(backoff.current_interval(), Some(Duration::from_micros(20)));
/// let metrics = backoff.metrics();
/// assert_eq!(metrics.total_invocation, 3);
/// assert_eq!(metrics.total_slept, 2);
/// assert_eq!(metrics.total_sleep_time, Duration::from_micros(30));
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveBackoff<R = DefaultRandom, S = ThreadSleeper> {
    config: BackoffConfig,
    interval: Interval,
    success_streak: u32,
    metrics: BackoffMetrics,
    random: R,
    sleeper: S,
}

impl AdaptiveBackoff {
    /// Create an idle controller with the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::AdaptiveBackoff;
    /// use std::time::Duration;
    ///
    /// let backoff = AdaptiveBackoff::new();
    /// assert!(backoff.is_idle());
    /// assert_eq!(backoff.config().initial_interval, Duration::from_millis(500));
    /// ```
    pub fn new() -> Self {
        Self::with_parts(
            BackoffConfig::default(),
            DefaultRandom::default(),
            ThreadSleeper,
        )
    }

    /// Create an idle controller after validating `config`.
    pub fn from_config(config: BackoffConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_parts(config, DefaultRandom::default(), ThreadSleeper))
    }
}

impl Default for AdaptiveBackoff {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, S> AdaptiveBackoff<R, S> {
    /// Assemble an idle controller from explicit parts.
    ///
    /// The configuration is not validated.
    pub fn with_parts(config: BackoffConfig, random: R, sleeper: S) -> Self {
        Self {
            config,
            interval: Interval::Idle,
            success_streak: 0,
            metrics: BackoffMetrics::default(),
            random,
            sleeper,
        }
    }

    /// Replace the random source.
    pub fn with_random<R2>(self, random: R2) -> AdaptiveBackoff<R2, S> {
        AdaptiveBackoff {
            config: self.config,
            interval: self.interval,
            success_streak: self.success_streak,
            metrics: self.metrics,
            random,
            sleeper: self.sleeper,
        }
    }

    /// Replace the sleeper.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::AdaptiveBackoff;
    /// use slackwater::testing::RecordingSleeper;
    /// use std::time::Duration;
    ///
    /// let mut backoff = AdaptiveBackoff::new().with_sleeper(RecordingSleeper::new());
    /// backoff.on_failure();
    ///
    /// // The default first interval, recorded instead of slept
    /// assert_eq!(backoff.sleeper().recorded(), &[Duration::from_millis(500)]);
    /// ```
    pub fn with_sleeper<S2>(self, sleeper: S2) -> AdaptiveBackoff<R, S2> {
        AdaptiveBackoff {
            config: self.config,
            interval: self.interval,
            success_streak: self.success_streak,
            metrics: self.metrics,
            random: self.random,
            sleeper,
        }
    }

    /// Replace the configuration without validating it.
    pub fn with_config(mut self, config: BackoffConfig) -> Self {
        self.config = config;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Changes apply to the next growth or shrink step and are not validated.
    pub fn config_mut(&mut self) -> &mut BackoffConfig {
        &mut self.config
    }

    /// A snapshot of the counters.
    pub fn metrics(&self) -> BackoffMetrics {
        self.metrics
    }

    /// The current interval state.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The current delay, or `None` when idle.
    pub fn current_interval(&self) -> Option<Duration> {
        match self.interval {
            Interval::Idle => None,
            Interval::Active(d) => Some(d),
        }
    }

    /// Returns true if no backoff is in effect.
    pub fn is_idle(&self) -> bool {
        self.interval.is_idle()
    }

    /// Successes counted toward the next shrink step.
    pub fn success_streak(&self) -> u32 {
        self.success_streak
    }

    /// The injected sleeper.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Return to idle and clear the success streak. Metrics are kept.
    pub fn reset(&mut self) {
        self.interval = Interval::Idle;
        self.success_streak = 0;
    }
}

impl<R: RandomSource, S> AdaptiveBackoff<R, S> {
    /// Register a failure and return the delay to wait, without waiting.
    ///
    /// The wait is charged to the metrics as if it had been performed.
    /// [`on_failure`](Self::on_failure) is this followed by a sleep.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::{AdaptiveBackoff, BackoffConfig};
    /// use std::time::Duration;
    ///
    /// let config = BackoffConfig::default()
    ///     .with_randomization_factor(0.0)
    ///     .with_initial_interval(Duration::from_secs(1))
    ///     .with_max_interval(Duration::from_secs(3))
    ///     .with_up_multiplier(2.0);
    /// let mut backoff = AdaptiveBackoff::from_config(config).unwrap();
    ///
    /// assert_eq!(backoff.record_failure(), Duration::from_secs(1));
    /// assert_eq!(backoff.record_failure(), Duration::from_secs(2));
    /// assert_eq!(backoff.record_failure(), Duration::from_secs(3)); // clamped
    /// ```
    pub fn record_failure(&mut self) -> Duration {
        self.metrics.total_invocation += 1;
        self.grow();
        self.charge_sleep()
    }

    /// Register a success and return the delay to wait, without waiting.
    ///
    /// Returns `None` when the controller is idle: the success is counted as an
    /// invocation and nothing else happens.
    pub fn record_success(&mut self) -> Option<Duration> {
        self.metrics.total_invocation += 1;
        let current = match self.interval {
            Interval::Idle => return None,
            Interval::Active(d) => d,
        };

        self.success_streak += 1;
        if self.success_streak >= self.config.down_multiplier_threshold {
            self.shrink(current);
            self.success_streak = 0;
        }
        Some(self.charge_sleep())
    }

    fn grow(&mut self) {
        self.metrics.total_went_up += 1;
        let current = match self.interval {
            Interval::Idle => {
                self.interval = Interval::from_duration(self.config.initial_interval);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    interval = ?self.config.initial_interval,
                    "backoff started"
                );
                return;
            }
            Interval::Active(d) => d,
        };

        let raw = nanos(current) * self.config.up_multiplier;
        let candidate = self.jittered(raw);
        let clamped = candidate > nanos(self.config.max_interval);
        self.interval = if clamped {
            Interval::from_duration(self.config.max_interval)
        } else {
            Interval::from_nanos(candidate)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = ?current,
            to = ?self.interval.duration(),
            clamped,
            "backoff interval grew"
        );
    }

    fn shrink(&mut self, current: Duration) {
        self.metrics.total_went_down += 1;
        let raw = nanos(current) * self.config.down_multiplier;
        let candidate = self.jittered(raw);

        if candidate < nanos(self.config.initial_interval) {
            self.interval = Interval::Idle;
            #[cfg(feature = "tracing")]
            tracing::debug!(from = ?current, "backoff recovered, now idle");
            return;
        }

        self.interval = Interval::from_nanos(candidate);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = ?current,
            to = ?self.interval.duration(),
            "backoff interval shrank"
        );
    }

    fn jittered(&mut self, raw: f64) -> f64 {
        jitter(
            raw,
            self.config.randomization_factor,
            nanos(self.config.max_randomization),
            &mut self.random,
        )
    }

    fn charge_sleep(&mut self) -> Duration {
        let duration = self.interval.duration();
        self.metrics.record_sleep(duration);
        duration
    }
}

impl<R: RandomSource, S: Sleeper> AdaptiveBackoff<R, S> {
    /// Register a failed attempt, grow the interval and block for it.
    pub fn on_failure(&mut self) {
        let duration = self.record_failure();
        self.sleep(duration);
    }

    /// Register a successful attempt and block for the current interval.
    ///
    /// Returns immediately when idle. Every `down_multiplier_threshold`-th
    /// success while active shrinks the interval first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::{AdaptiveBackoff, BackoffConfig};
    /// use slackwater::testing::RecordingSleeper;
    /// use std::time::Duration;
    ///
    /// let config = BackoffConfig::default()
    ///     .with_randomization_factor(0.0)
    ///     .with_initial_interval(Duration::from_millis(100))
    ///     .with_down_multiplier(0.5)
    ///     .with_down_multiplier_threshold(2);
    /// let mut backoff = AdaptiveBackoff::from_config(config)
    ///     .unwrap()
    ///     .with_sleeper(RecordingSleeper::new());
    ///
    /// backoff.on_failure();
    /// backoff.on_success();
    /// backoff.on_success(); // 50ms is below the initial interval: idle again
    /// backoff.on_success(); // idle, no sleep
    ///
    /// assert!(backoff.is_idle());
    /// assert_eq!(
    ///     backoff.sleeper().recorded(),
    ///     &[Duration::from_millis(100), Duration::from_millis(100), Duration::ZERO]
    /// );
    /// ```
    pub fn on_success(&mut self) {
        if let Some(duration) = self.record_success() {
            self.sleep(duration);
        }
    }

    fn sleep(&mut self, duration: Duration) {
        #[cfg(feature = "tracing")]
        tracing::trace!(?duration, "backoff sleeping");
        self.sleeper.sleep(duration);
    }
}

#[cfg(feature = "async")]
impl<R: RandomSource, S> AdaptiveBackoff<R, S> {
    /// Like [`on_failure`](Self::on_failure), waiting with `tokio::time::sleep`.
    ///
    /// **Note**: Requires the `async` feature.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::{AdaptiveBackoff, BackoffConfig};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let config = BackoffConfig::default()
    ///     .with_initial_interval(Duration::from_millis(1))
    ///     .with_randomization_factor(0.0);
    /// let mut backoff = AdaptiveBackoff::from_config(config).unwrap();
    ///
    /// backoff.on_failure_async().await;
    /// assert_eq!(backoff.metrics().total_sleep_time, Duration::from_millis(1));
    /// # });
    /// ```
    pub async fn on_failure_async(&mut self) {
        let duration = self.record_failure();
        tokio::time::sleep(duration).await;
    }

    /// Like [`on_success`](Self::on_success), waiting with `tokio::time::sleep`.
    ///
    /// **Note**: Requires the `async` feature.
    pub async fn on_success_async(&mut self) {
        if let Some(duration) = self.record_success() {
            tokio::time::sleep(duration).await;
        }
    }
}

fn nanos(d: Duration) -> f64 {
    d.as_nanos() as f64
}
