//! Pseudo-random number generator wrapper for Monte Carlo simulations.
//!
//! [`PricerRng`] wraps a seeded `StdRng` and exposes exactly the two
//! distributions the Heston schemes consume: standard normals and open
//! uniforms.

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Monte Carlo simulation random number generator.
///
/// The same seed always reproduces the same sequence. Each trial owns its
/// generators, so no state is shared between worker threads.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::PricerRng;
///
/// let mut rng = PricerRng::from_seed(42);
///
/// let u: f64 = rng.gen_uniform();
/// assert!(u > 0.0 && u < 1.0);
/// let _z: f64 = rng.gen_normal();
/// ```
#[derive(Clone, Debug)]
pub struct PricerRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation (stored for reproducibility tracking).
    seed: u64,
}

impl PricerRng {
    /// Creates a new RNG instance initialised with the given seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::rng::PricerRng;
    ///
    /// let mut rng1 = PricerRng::from_seed(12345);
    /// let mut rng2 = PricerRng::from_seed(12345);
    ///
    /// // Same seed produces identical sequences
    /// assert_eq!(rng1.gen_normal(), rng2.gen_normal());
    /// ```
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a uniform value on the open interval (0, 1).
    ///
    /// Neither endpoint is ever returned, so `ln(u)` and `ln(1 - u)` are
    /// always finite.
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.sample(Open01)
    }

    /// Generates a single standard normal variate (mean=0, std=1).
    ///
    /// Uses the Ziggurat algorithm via `rand_distr::StandardNormal`.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}

/// Draws a fresh base seed from the thread-local entropy-seeded generator.
///
/// Used when a run is not given an explicit seed; the returned value is
/// logged so the run can be replayed.
pub fn entropy_seed() -> u64 {
    rand::thread_rng().gen()
}
