//! Discretisation schemes for the Heston path stepper.
//!
//! A scheme advances the two-factor state `(S, V)` by one fixed increment
//! `dt` given a set of pre-drawn random variates. Schemes are pure functions
//! of `(state, draws)`; all randomness is produced upstream by the variate
//! source in `pricer_pricing`, which keeps the schemes deterministic and unit
//! testable.
//!
//! ## Available schemes
//!
//! | Scheme | Variance update | Price update |
//! |--------|-----------------|--------------|
//! | [`MilsteinScheme`] | Milstein with truncated square roots | Milstein in price space |
//! | [`QeScheme`] | Andersen QE (quadratic / exponential switch) | log-price, trapezoidal in V |
//!
//! ## Static dispatch
//!
//! The aggregator stores a [`HestonStepper`] enum rather than a trait object.
//! Selecting a scheme is a single [`SchemeKind`] value in the Monte Carlo
//! configuration.
//!
//! ```
//! use pricer_models::models::heston::HestonParams;
//! use pricer_models::models::schemes::{
//!     HestonStepper, PathState, PathStepper, QeParams, SchemeKind, StepDraws,
//! };
//!
//! let params = HestonParams::default();
//! let stepper = HestonStepper::new(SchemeKind::QuadraticExponential, &params, 1e-3, QeParams::default());
//!
//! let state = PathState::initial(&params);
//! let draws = StepDraws { z_v: 0.1, z_perp: -0.3, u_v: 0.42 };
//! let next = stepper.step(state, &draws);
//! assert!(next.variance >= 0.0);
//! assert!(next.price > 0.0);
//! ```

mod milstein;
mod qe;

pub use milstein::MilsteinScheme;
pub use qe::{QeBranch, QeParams, QeScheme, DETERMINISTIC_PSI};

use std::fmt;
use std::str::FromStr;

use super::heston::HestonParams;

/// Simulation state of one in-flight path.
///
/// Two scalar registers, updated in place by the path simulator; no history
/// is retained.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathState {
    /// Current asset price S.
    pub price: f64,
    /// Current variance V.
    pub variance: f64,
}

impl PathState {
    /// Creates a state from explicit values.
    #[inline]
    pub fn new(price: f64, variance: f64) -> Self {
        Self { price, variance }
    }

    /// Starting state `(S0, V0)` of a path.
    #[inline]
    pub fn initial(params: &HestonParams) -> Self {
        Self {
            price: params.spot,
            variance: params.v0,
        }
    }
}

/// Random variates consumed by a single step.
///
/// * `z_v` - standard normal driving the variance
/// * `z_perp` - standard normal independent of `z_v`
/// * `u_v` - uniform on the open interval (0, 1), drawn alongside `z_v`
///
/// The asset driver correlated with the variance is obtained through
/// [`StepDraws::correlated`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepDraws {
    /// Variance driver Z_v ~ N(0, 1).
    pub z_v: f64,
    /// Independent normal Z_perp ~ N(0, 1).
    pub z_perp: f64,
    /// Uniform U_v ~ U(0, 1).
    pub u_v: f64,
}

impl StepDraws {
    /// Asset driver `Z_s = rho * Z_v + sqrt(1 - rho^2) * Z_perp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::models::schemes::StepDraws;
    ///
    /// let d = StepDraws { z_v: 1.0, z_perp: 2.0, u_v: 0.5 };
    /// assert_eq!(d.correlated(1.0), 1.0);
    /// assert_eq!(d.correlated(0.0), 2.0);
    /// ```
    #[inline]
    pub fn correlated(&self, rho: f64) -> f64 {
        rho * self.z_v + (1.0 - rho * rho).max(0.0).sqrt() * self.z_perp
    }
}

/// A one-step discretisation of the Heston dynamics.
///
/// Implementations hold everything that is constant across steps (model
/// parameters, `dt`, precomputed coefficients) so `step` is a pure function
/// of the current state and fresh draws.
pub trait PathStepper {
    /// Advances `state` by one time increment using `draws`.
    fn step(&self, state: PathState, draws: &StepDraws) -> PathState;

    /// The time increment this stepper was built for.
    fn dt(&self) -> f64;
}

/// Selection of the discretisation scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SchemeKind {
    /// Milstein-style scheme in price space.
    Milstein,
    /// Andersen quadratic-exponential scheme.
    #[default]
    QuadraticExponential,
}

impl SchemeKind {
    /// Short identifier used in logs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::Milstein => "milstein",
            SchemeKind::QuadraticExponential => "qe",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown scheme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown discretisation scheme: {0}. Supported: qe, milstein")]
pub struct UnknownSchemeError(pub String);

impl FromStr for SchemeKind {
    type Err = UnknownSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milstein" => Ok(SchemeKind::Milstein),
            "qe" | "quadratic-exponential" | "quadratic_exponential" => {
                Ok(SchemeKind::QuadraticExponential)
            }
            _ => Err(UnknownSchemeError(s.to_string())),
        }
    }
}

/// Enum dispatch over the available schemes.
#[derive(Clone, Debug, PartialEq)]
pub enum HestonStepper {
    /// Milstein-style scheme.
    Milstein(MilsteinScheme),
    /// Quadratic-exponential scheme.
    QuadraticExponential(QeScheme),
}

impl HestonStepper {
    /// Builds the stepper selected by `kind`.
    ///
    /// `qe` is ignored for [`SchemeKind::Milstein`].
    pub fn new(kind: SchemeKind, params: &HestonParams, dt: f64, qe: QeParams) -> Self {
        match kind {
            SchemeKind::Milstein => HestonStepper::Milstein(MilsteinScheme::new(params, dt)),
            SchemeKind::QuadraticExponential => {
                HestonStepper::QuadraticExponential(QeScheme::new(params, dt, qe))
            }
        }
    }

    /// The scheme this stepper implements.
    pub fn kind(&self) -> SchemeKind {
        match self {
            HestonStepper::Milstein(_) => SchemeKind::Milstein,
            HestonStepper::QuadraticExponential(_) => SchemeKind::QuadraticExponential,
        }
    }
}

impl PathStepper for HestonStepper {
    #[inline]
    fn step(&self, state: PathState, draws: &StepDraws) -> PathState {
        match self {
            HestonStepper::Milstein(s) => s.step(state, draws),
            HestonStepper::QuadraticExponential(s) => s.step(state, draws),
        }
    }

    #[inline]
    fn dt(&self) -> f64 {
        match self {
            HestonStepper::Milstein(s) => s.dt(),
            HestonStepper::QuadraticExponential(s) => s.dt(),
        }
    }
}
