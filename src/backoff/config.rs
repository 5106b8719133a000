//! Backoff configuration and its documented defaults.

use std::time::Duration;

use super::ConfigError;

/// Default ceiling on the backoff interval.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(15 * 60);
/// Default first interval after leaving idle.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
/// Default jitter half-width as a fraction of the computed interval.
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.3;
/// Default absolute cap on the jitter half-width.
pub const DEFAULT_MAX_RANDOMIZATION: Duration = Duration::from_secs(2 * 60);
/// Default growth factor applied on failure.
pub const DEFAULT_UP_MULTIPLIER: f64 = 1.5;
/// Default shrink factor applied after a success streak.
pub const DEFAULT_DOWN_MULTIPLIER: f64 = 0.9;
/// Default number of consecutive successes per shrink step.
pub const DEFAULT_DOWN_MULTIPLIER_THRESHOLD: u32 = 10;

/// Tunable parameters of an [`AdaptiveBackoff`](super::AdaptiveBackoff).
///
/// Configuration is plain data with public fields. Changing a field between
/// calls takes effect on the next growth or shrink computation.
///
/// # Examples
///
/// ```rust
/// use slackwater::BackoffConfig;
/// use std::time::Duration;
///
/// let config = BackoffConfig::default()
///     .with_initial_interval(Duration::from_millis(50))
///     .with_max_interval(Duration::from_secs(10))
///     .with_up_multiplier(2.0);
///
/// assert_eq!(config.initial_interval, Duration::from_millis(50));
/// assert_eq!(config.down_multiplier, 0.9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackoffConfig {
    /// Smallest nonzero delay, also the resume point when growing from idle.
    pub initial_interval: Duration,
    /// Hard ceiling on the delay after growth.
    pub max_interval: Duration,
    /// Growth factor applied to the interval on failure.
    pub up_multiplier: f64,
    /// Shrink factor applied to the interval after a success streak.
    pub down_multiplier: f64,
    /// Consecutive successes required to trigger one shrink step.
    pub down_multiplier_threshold: u32,
    /// Fraction of the computed interval used as jitter half-width. Zero disables jitter.
    pub randomization_factor: f64,
    /// Absolute cap on the jitter half-width.
    pub max_randomization: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            up_multiplier: DEFAULT_UP_MULTIPLIER,
            down_multiplier: DEFAULT_DOWN_MULTIPLIER,
            down_multiplier_threshold: DEFAULT_DOWN_MULTIPLIER_THRESHOLD,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            max_randomization: DEFAULT_MAX_RANDOMIZATION,
        }
    }
}

impl BackoffConfig {
    /// Set the interval used when leaving idle.
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Set the ceiling on the interval.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Set the growth factor applied on failure.
    pub fn with_up_multiplier(mut self, multiplier: f64) -> Self {
        self.up_multiplier = multiplier;
        self
    }

    /// Set the shrink factor applied after a success streak.
    pub fn with_down_multiplier(mut self, multiplier: f64) -> Self {
        self.down_multiplier = multiplier;
        self
    }

    /// Set how many consecutive successes trigger one shrink step.
    pub fn with_down_multiplier_threshold(mut self, threshold: u32) -> Self {
        self.down_multiplier_threshold = threshold;
        self
    }

    /// Set the jitter half-width as a fraction of the computed interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::BackoffConfig;
    ///
    /// // Deterministic intervals, handy in tests
    /// let config = BackoffConfig::default().with_randomization_factor(0.0);
    /// assert_eq!(config.randomization_factor, 0.0);
    /// ```
    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Set the absolute cap on the jitter half-width.
    pub fn with_max_randomization(mut self, cap: Duration) -> Self {
        self.max_randomization = cap;
        self
    }

    /// Check the configuration for values the algorithm cannot work with.
    ///
    /// Returns the first problem found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slackwater::{BackoffConfig, ConfigError};
    ///
    /// assert!(BackoffConfig::default().validate().is_ok());
    ///
    /// let config = BackoffConfig::default().with_down_multiplier_threshold(0);
    /// assert_eq!(config.validate(), Err(ConfigError::ZeroThreshold));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_interval.is_zero() {
            return Err(ConfigError::ZeroInitialInterval);
        }
        if self.max_interval < self.initial_interval {
            return Err(ConfigError::MaxBelowInitial {
                initial: self.initial_interval,
                max: self.max_interval,
            });
        }
        if !self.up_multiplier.is_finite() || self.up_multiplier < 1.0 {
            return Err(ConfigError::InvalidUpMultiplier(self.up_multiplier));
        }
        if !self.down_multiplier.is_finite()
            || self.down_multiplier <= 0.0
            || self.down_multiplier > 1.0
        {
            return Err(ConfigError::InvalidDownMultiplier(self.down_multiplier));
        }
        if self.down_multiplier_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(ConfigError::InvalidRandomizationFactor(
                self.randomization_factor,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = BackoffConfig::default();
        assert_eq!(config.initial_interval, Duration::from_millis(500));
        assert_eq!(config.max_interval, Duration::from_secs(900));
        assert_eq!(config.randomization_factor, 0.3);
        assert_eq!(config.max_randomization, Duration::from_secs(120));
        assert_eq!(config.up_multiplier, 1.5);
        assert_eq!(config.down_multiplier, 0.9);
        assert_eq!(config.down_multiplier_threshold, 10);
    }

    #[test]
    fn test_builder_sets_every_field() {
        let config = BackoffConfig::default()
            .with_initial_interval(Duration::from_millis(1))
            .with_max_interval(Duration::from_millis(10))
            .with_up_multiplier(2.0)
            .with_down_multiplier(0.5)
            .with_down_multiplier_threshold(3)
            .with_randomization_factor(0.1)
            .with_max_randomization(Duration::from_millis(2));

        assert_eq!(
            config,
            BackoffConfig {
                initial_interval: Duration::from_millis(1),
                max_interval: Duration::from_millis(10),
                up_multiplier: 2.0,
                down_multiplier: 0.5,
                down_multiplier_threshold: 3,
                randomization_factor: 0.1,
                max_randomization: Duration::from_millis(2),
            }
        );
    }

    #[test]
    fn test_validate_rejects_max_below_initial() {
        let config = BackoffConfig::default()
            .with_initial_interval(Duration::from_secs(2))
            .with_max_interval(Duration::from_secs(1));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxBelowInitial { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_multipliers() {
        let shrinking_up = BackoffConfig::default().with_up_multiplier(0.5);
        assert_eq!(
            shrinking_up.validate(),
            Err(ConfigError::InvalidUpMultiplier(0.5))
        );

        let nan_up = BackoffConfig::default().with_up_multiplier(f64::NAN);
        assert!(matches!(
            nan_up.validate(),
            Err(ConfigError::InvalidUpMultiplier(_))
        ));

        let growing_down = BackoffConfig::default().with_down_multiplier(1.5);
        assert_eq!(
            growing_down.validate(),
            Err(ConfigError::InvalidDownMultiplier(1.5))
        );

        let zero_down = BackoffConfig::default().with_down_multiplier(0.0);
        assert_eq!(
            zero_down.validate(),
            Err(ConfigError::InvalidDownMultiplier(0.0))
        );
    }

    #[test]
    fn test_validate_rejects_bad_randomization_factor() {
        let config = BackoffConfig::default().with_randomization_factor(-0.1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRandomizationFactor(-0.1))
        );
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        let config = BackoffConfig::default()
            .with_initial_interval(Duration::from_nanos(1))
            .with_max_interval(Duration::from_nanos(1))
            .with_up_multiplier(1.0)
            .with_down_multiplier(1.0)
            .with_down_multiplier_threshold(1)
            .with_randomization_factor(1.0);
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_fills_missing_fields_with_defaults() {
        let json = r#"{"up_multiplier": 2.0, "down_multiplier_threshold": 4}"#;
        let config: BackoffConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.up_multiplier, 2.0);
        assert_eq!(config.down_multiplier_threshold, 4);
        assert_eq!(config.initial_interval, DEFAULT_INITIAL_INTERVAL);
        assert_eq!(config.max_interval, DEFAULT_MAX_INTERVAL);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = BackoffConfig::default().with_randomization_factor(0.0);
        let json = serde_json::to_string(&config).unwrap();
        let restored: BackoffConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
