//! Jittered randomization of computed intervals.

/// A source of uniformly distributed values in `[0, 1)`.
///
/// The controller draws from this when jitter is enabled. Inject a
/// deterministic source (see [`crate::testing`]) to make jittered runs
/// reproducible.
pub trait RandomSource {
    /// Draw the next value, uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapter exposing any [`rand::Rng`] as a [`RandomSource`].
///
/// **Note**: Requires the `jitter` feature.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use slackwater::{RandomSource, RngSource};
///
/// let mut source = RngSource::new(StdRng::seed_from_u64(7));
/// let u = source.next_unit();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[cfg(feature = "jitter")]
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

#[cfg(feature = "jitter")]
impl<R: rand::Rng> RngSource<R> {
    /// Wrap a generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    /// Unwrap the generator.
    pub fn into_inner(self) -> R {
        self.0
    }
}

#[cfg(feature = "jitter")]
impl RngSource<rand::rngs::StdRng> {
    /// A standard generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }
}

#[cfg(feature = "jitter")]
impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

#[cfg(feature = "jitter")]
impl Default for RngSource<rand::rngs::StdRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

/// A source that always yields `0.5`, the center of the jitter window.
///
/// With this source, [`jitter`] returns its input unchanged (up to float
/// rounding). It is the default source when the `jitter` feature is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Midpoint;

impl RandomSource for Midpoint {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

/// The random source used by [`AdaptiveBackoff::new`](super::AdaptiveBackoff::new).
#[cfg(feature = "jitter")]
pub type DefaultRandom = RngSource<rand::rngs::StdRng>;

/// The random source used by [`AdaptiveBackoff::new`](super::AdaptiveBackoff::new).
#[cfg(not(feature = "jitter"))]
pub type DefaultRandom = Midpoint;

/// Perturb `interval` uniformly within `interval ± delta`.
///
/// `delta` is `factor * interval`, capped at `max_randomization`. A `factor` of
/// zero returns `interval` untouched without drawing from `random`. All three
/// quantities share one unit (the controller uses nanoseconds).
///
/// No clamping is applied to the result besides the cap on `delta`: it may fall
/// below zero or below any configured floor, and callers apply their own bounds.
///
/// # Examples
///
/// ```rust
/// use slackwater::{jitter, Midpoint};
/// use slackwater::testing::FixedRandom;
///
/// // No jitter
/// assert_eq!(jitter(100.0, 0.0, 50.0, &mut Midpoint), 100.0);
///
/// // delta = 0.2 * 100 = 20, u = 0 gives the low edge
/// assert_eq!(jitter(100.0, 0.2, 50.0, &mut FixedRandom::new(0.0)), 80.0);
///
/// // delta capped at 5
/// assert_eq!(jitter(100.0, 0.2, 5.0, &mut FixedRandom::new(0.0)), 95.0);
/// ```
pub fn jitter<R>(interval: f64, factor: f64, max_randomization: f64, random: &mut R) -> f64
where
    R: RandomSource + ?Sized,
{
    if factor == 0.0 {
        return interval;
    }
    let delta = (factor * interval).min(max_randomization);
    let low = interval - delta;
    low + 2.0 * delta * random.next_unit()
}

#[cfg(test)]
mod random_tests {
    use super::*;
    use crate::testing::{FixedRandom, ScriptedRandom};

    #[test]
    fn test_zero_factor_skips_random_draw() {
        let mut random = ScriptedRandom::new(vec![0.9]);
        assert_eq!(jitter(1_000.0, 0.0, 10.0, &mut random), 1_000.0);
        assert_eq!(random.remaining(), 1);
    }

    #[test]
    fn test_window_edges() {
        assert_eq!(jitter(1_000.0, 0.1, 500.0, &mut FixedRandom::new(0.0)), 900.0);
        assert_eq!(jitter(1_000.0, 0.1, 500.0, &mut FixedRandom::new(0.5)), 1_000.0);
        let high = jitter(1_000.0, 0.1, 500.0, &mut FixedRandom::new(0.999_999));
        assert!(high < 1_100.0 && high > 1_099.0);
    }

    #[test]
    fn test_max_randomization_caps_delta() {
        let low = jitter(1_000.0, 0.5, 10.0, &mut FixedRandom::new(0.0));
        assert_eq!(low, 990.0);
    }

    #[test]
    fn test_jitter_can_go_negative() {
        // Factor above one is a misconfiguration but jitter does not guard it
        let value = jitter(100.0, 2.0, 1_000.0, &mut FixedRandom::new(0.0));
        assert_eq!(value, -100.0);
    }

    #[test]
    fn test_midpoint_is_center() {
        assert_eq!(jitter(200.0, 0.25, 1_000.0, &mut Midpoint), 200.0);
    }

    #[test]
    fn test_random_source_through_references() {
        let mut fixed = FixedRandom::new(0.25);
        let by_ref: &mut dyn RandomSource = &mut fixed;
        assert_eq!(by_ref.next_unit(), 0.25);

        let mut boxed: Box<dyn RandomSource> = Box::new(Midpoint);
        assert_eq!(boxed.next_unit(), 0.5);
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_rng_source_stays_in_unit_interval() {
        use rand::SeedableRng;

        let mut source = RngSource::new(rand::rngs::StdRng::seed_from_u64(42));
        for _ in 0..1_000 {
            let u = source.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
