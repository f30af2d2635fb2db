//! Per-trial random streams.
//!
//! Every trial draws from two generators of its own:
//!
//! - the *variance* stream yields `Z_v` and `U_v`
//! - the *independent* stream yields `Z_perp`
//!
//! Both are seeded from the run's base seed and the trial index, so a trial
//! produces the same path whichever worker thread runs it.

use pricer_models::models::schemes::StepDraws;

use super::prng::PricerRng;

/// Odd 64-bit constant (2^64 / golden ratio) spreading consecutive stream
/// indices across the seed space.
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser. Bijective, so distinct base seeds stay distinct.
#[inline]
fn mix_base(mut x: u64) -> u64 {
    x = x.wrapping_add(STREAM_STRIDE);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Derives the seed of stream `index` from `base`.
///
/// The base is scrambled before the stream offset is added, so runs whose
/// base seeds differ by a multiple of the stride do not share streams.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::stream_seed;
///
/// assert_eq!(stream_seed(42, 3), stream_seed(42, 3));
/// assert_ne!(stream_seed(42, 3), stream_seed(42, 4));
/// ```
#[inline]
pub fn stream_seed(base: u64, index: u64) -> u64 {
    mix_base(base).wrapping_add(index.wrapping_add(1).wrapping_mul(STREAM_STRIDE))
}

/// Source of per-step random variates.
///
/// The path simulator is generic over this trait so tests can drive a path
/// with scripted draws.
pub trait VariateSource {
    /// Draws the variates for one step.
    fn next_draws(&mut self) -> StepDraws;
}

/// The two generators owned by one trial.
#[derive(Clone, Debug)]
pub struct TrialStreams {
    variance: PricerRng,
    independent: PricerRng,
}

impl TrialStreams {
    /// Streams of trial `trial` in a run seeded with `base_seed`.
    #[inline]
    pub fn for_trial(base_seed: u64, trial: usize) -> Self {
        let idx = (trial as u64).wrapping_mul(2);
        Self {
            variance: PricerRng::from_seed(stream_seed(base_seed, idx)),
            independent: PricerRng::from_seed(stream_seed(base_seed, idx.wrapping_add(1))),
        }
    }

    /// Builds streams from two explicit generators.
    pub fn from_rngs(variance: PricerRng, independent: PricerRng) -> Self {
        Self {
            variance,
            independent,
        }
    }
}

impl VariateSource for TrialStreams {
    #[inline]
    fn next_draws(&mut self) -> StepDraws {
        let z_v = self.variance.gen_normal();
        let u_v = self.variance.gen_uniform();
        let z_perp = self.independent.gen_normal();
        StepDraws { z_v, z_perp, u_v }
    }
}
