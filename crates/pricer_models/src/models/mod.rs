//! Stochastic-volatility model and its discretisation schemes.
//!
//! - [`heston`]: parameters of the Heston model
//! - [`schemes`]: one-step path steppers (Milstein, quadratic-exponential)

pub mod heston;
pub mod schemes;

pub use heston::{HestonError, HestonParams};
pub use schemes::{HestonStepper, PathState, PathStepper, SchemeKind, StepDraws};
