//! Error types for backoff configuration.

use std::time::Duration;

/// Error returned when a [`BackoffConfig`](super::BackoffConfig) fails validation.
///
/// The controller itself never fails: misconfiguration is only caught when the
/// caller opts in through [`BackoffConfig::validate`](super::BackoffConfig::validate)
/// or [`AdaptiveBackoff::from_config`](super::AdaptiveBackoff::from_config).
///
/// # Examples
///
/// ```rust
/// use slackwater::{BackoffConfig, ConfigError};
/// use std::time::Duration;
///
/// let config = BackoffConfig::default().with_initial_interval(Duration::ZERO);
///
/// assert_eq!(config.validate(), Err(ConfigError::ZeroInitialInterval));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `initial_interval` is zero, which is indistinguishable from idle.
    ZeroInitialInterval,
    /// `max_interval` is smaller than `initial_interval`.
    MaxBelowInitial {
        /// The configured initial interval.
        initial: Duration,
        /// The configured ceiling.
        max: Duration,
    },
    /// `up_multiplier` is not finite or is below 1.
    InvalidUpMultiplier(f64),
    /// `down_multiplier` is not finite or lies outside `(0, 1]`.
    InvalidDownMultiplier(f64),
    /// `down_multiplier_threshold` is zero, so the interval could never shrink.
    ZeroThreshold,
    /// `randomization_factor` is not finite or lies outside `[0, 1]`.
    InvalidRandomizationFactor(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroInitialInterval => write!(f, "initial interval must be greater than zero"),
            Self::MaxBelowInitial { initial, max } => write!(
                f,
                "max interval ({:?}) must not be below initial interval ({:?})",
                max, initial
            ),
            Self::InvalidUpMultiplier(m) => {
                write!(f, "up multiplier must be finite and at least 1, got {}", m)
            }
            Self::InvalidDownMultiplier(m) => {
                write!(f, "down multiplier must be finite and in (0, 1], got {}", m)
            }
            Self::ZeroThreshold => write!(f, "down multiplier threshold must be at least 1"),
            Self::InvalidRandomizationFactor(r) => {
                write!(f, "randomization factor must be finite and in [0, 1], got {}", r)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_max_below_initial_display() {
        let err = ConfigError::MaxBelowInitial {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(1),
        };
        let display = format!("{}", err);
        assert!(display.contains("max interval (1s)"));
        assert!(display.contains("initial interval (2s)"));
    }

    #[test]
    fn test_multiplier_display_includes_value() {
        let err = ConfigError::InvalidUpMultiplier(0.5);
        assert!(format!("{}", err).contains("0.5"));

        let err = ConfigError::InvalidDownMultiplier(1.5);
        assert!(format!("{}", err).contains("1.5"));
    }

    #[test]
    fn test_config_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ConfigError::ZeroThreshold);
        assert_eq!(err.to_string(), "down multiplier threshold must be at least 1");
        assert!(err.source().is_none());
    }
}
