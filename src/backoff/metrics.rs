//! Aggregate counters kept by the controller.

use std::time::Duration;

/// A snapshot of the controller's monotonic counters.
///
/// Metrics are for observability only; the controller never reads them back to
/// make a decision.
///
/// # Examples
///
/// ```rust
/// use slackwater::BackoffMetrics;
/// use std::time::Duration;
///
/// let metrics = BackoffMetrics::default();
/// assert_eq!(metrics.total_invocation, 0);
/// assert_eq!(metrics.total_sleep_time, Duration::ZERO);
/// assert_eq!(metrics.average_sleep(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackoffMetrics {
    /// Number of `on_failure` and `on_success` calls.
    pub total_invocation: u64,
    /// Number of growth steps.
    pub total_went_up: u64,
    /// Number of shrink steps.
    pub total_went_down: u64,
    /// Number of sleeps performed, zero-length ones included.
    pub total_slept: u64,
    /// Cumulative time spent sleeping.
    pub total_sleep_time: Duration,
}

impl BackoffMetrics {
    /// Mean duration of the sleeps performed so far.
    ///
    /// Returns `None` before the first sleep.
    pub fn average_sleep(&self) -> Option<Duration> {
        if self.total_slept == 0 {
            return None;
        }
        let nanos = self.total_sleep_time.as_nanos() / u128::from(self.total_slept);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    pub(crate) fn record_sleep(&mut self, duration: Duration) {
        self.total_slept += 1;
        self.total_sleep_time = self.total_sleep_time.saturating_add(duration);
    }
}

#[cfg(test)]
mod metrics_tests {
    use super::*;

    #[test]
    fn test_record_sleep_counts_zero_length() {
        let mut metrics = BackoffMetrics::default();
        metrics.record_sleep(Duration::ZERO);
        metrics.record_sleep(Duration::from_micros(10));

        assert_eq!(metrics.total_slept, 2);
        assert_eq!(metrics.total_sleep_time, Duration::from_micros(10));
    }

    #[test]
    fn test_average_sleep() {
        let mut metrics = BackoffMetrics::default();
        metrics.record_sleep(Duration::from_millis(100));
        metrics.record_sleep(Duration::from_millis(300));

        assert_eq!(metrics.average_sleep(), Some(Duration::from_millis(200)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_metrics_serialize() {
        let metrics = BackoffMetrics {
            total_invocation: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["total_invocation"], 3);
        assert_eq!(json["total_slept"], 0);
    }
}
