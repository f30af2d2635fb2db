//! Path simulation for Monte Carlo trials.
//!
//! A trial starts at `(S0, V0)`, applies the stepper `N = floor(T / dt)`
//! times and keeps only the current pair of scalars. No path history is
//! stored.

use pricer_models::models::heston::HestonParams;
use pricer_models::models::schemes::{PathState, PathStepper};

use crate::rng::VariateSource;

/// Relative slack when dividing the horizon by the increment, so that
/// `2.0 / 1e-5` counts 200,000 steps rather than 199,999.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Number of whole time steps of length `dt` that fit in `maturity`.
///
/// Returns 0 when `maturity < dt`: the terminal price is then the initial
/// spot.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::step_count;
///
/// assert_eq!(step_count(2.0, 0.00001), 200_000);
/// assert_eq!(step_count(1.0, 0.3), 3);
/// assert_eq!(step_count(1e-6, 1e-5), 0);
/// ```
#[inline]
pub fn step_count(maturity: f64, dt: f64) -> usize {
    if maturity < dt {
        return 0;
    }
    (maturity / dt * (1.0 + STEP_COUNT_TOLERANCE)).floor() as usize
}

/// Simulates one trial and returns its terminal asset price.
///
/// Each step draws a fresh set of variates from `source`.
pub fn simulate_terminal<S, R>(
    params: &HestonParams,
    stepper: &S,
    n_steps: usize,
    source: &mut R,
) -> f64
where
    S: PathStepper + ?Sized,
    R: VariateSource + ?Sized,
{
    let mut state = PathState::initial(params);
    for _ in 0..n_steps {
        let draws = source.next_draws();
        state = stepper.step(state, &draws);
    }
    state.price
}
