//! Blocking wait used by the synchronous operations.

use std::time::Duration;

/// Something that can block the current thread for a duration.
///
/// [`ThreadSleeper`] is the default. Tests inject
/// [`RecordingSleeper`](crate::testing::RecordingSleeper) to observe the
/// requested waits without paying for them.
pub trait Sleeper {
    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Box<S> {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Sleeps with [`std::thread::sleep`]. Zero durations return immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod sleep_tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_thread_sleeper_blocks_at_least_duration() {
        let start = Instant::now();
        ThreadSleeper.sleep(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_thread_sleeper_zero_is_noop() {
        let start = Instant::now();
        ThreadSleeper.sleep(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
