//! Andersen (2008) quadratic-exponential scheme.
//!
//! ## Variance
//!
//! The conditional law of `V(t+dt) | V(t)` is non-central chi-squared with
//! ```text
//! m  = theta + (V - theta) e^{-kappa dt}
//! s2 = V xi^2 e^{-kappa dt} (1 - e^{-kappa dt}) / kappa
//!    + theta xi^2 (1 - e^{-kappa dt})^2 / (2 kappa)
//! psi = s2 / m^2
//! ```
//! For `psi <= psi_c` the next variance is the squared Gaussian
//! `a (b + Z_v)^2` with
//! ```text
//! b^2 = 2/psi - 1 + sqrt(2/psi) sqrt(2/psi - 1),   a = m / (1 + b^2)
//! ```
//! Otherwise an exponential with a point mass at zero is used:
//! ```text
//! p = (psi - 1) / (psi + 1),   beta = (1 - p) / m
//! V' = 0                              if U_v <= p
//! V' = ln((1 - p) / (1 - U_v)) / beta otherwise
//! ```
//! Both branches match `m` and `s2` exactly.
//!
//! Degenerate moments: `m <= 0` (only when `V = theta = 0`) yields `V' = 0`.
//! When `psi <= DETERMINISTIC_PSI` (always when `xi = 0`) the variance is
//! taken as deterministic, `V' = m`.
//!
//! ## Price
//!
//! ```text
//! ln S' = ln S + mu dt + K0 + K1 V + K2 V' + sqrt(K3 V + K4 V') Z_perp
//! K0 = -rho kappa theta dt / xi
//! K1 = gamma_1 dt (kappa rho / xi - 1/2) - rho / xi
//! K2 = gamma_2 dt (kappa rho / xi - 1/2) + rho / xi
//! K3 = gamma_1 dt (1 - rho^2)
//! K4 = gamma_2 dt (1 - rho^2)
//! ```
//! The correlation is carried by the `rho / xi` terms, so the price is driven
//! by the independent normal.
//!
//! On a deterministic-variance step the `rho / xi` terms tend to
//! `rho sqrt(I) Z_v` with `I = (gamma_1 V + gamma_2 V') dt`, and the update
//! becomes
//! ```text
//! ln S' = ln S + mu dt - I / 2 + sqrt(I) Z_s,   Z_s = rho Z_v + sqrt(1 - rho^2) Z_perp
//! ```
//! The same update is used for tiny positive `xi`, where `rho / xi` would
//! blow up the O(dt^3) trapezoid residual and round-off in `V' - V`.

use super::{PathState, PathStepper, StepDraws};
use crate::models::heston::HestonParams;

/// Default QE switching threshold.
pub const DEFAULT_PSI_C: f64 = 1.5;

/// Default trapezoidal weight on the pre-step variance.
pub const DEFAULT_GAMMA_1: f64 = 0.5;

/// Default trapezoidal weight on the post-step variance.
pub const DEFAULT_GAMMA_2: f64 = 0.5;

/// Largest `psi = s2 / m^2` treated as a deterministic-variance step.
///
/// At this ratio the per-step standard deviation of `V'` is `1e-6 m`.
pub const DETERMINISTIC_PSI: f64 = 1e-12;

/// Tunable constants of the QE scheme.
///
/// * `psi_c` - branch threshold; Andersen recommends a value in [1, 2]
/// * `gamma_1`, `gamma_2` - weights of `V` and `V'` in the integrated variance
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QeParams {
    /// Branch switching threshold psi_c.
    pub psi_c: f64,
    /// Weight gamma_1 on the pre-step variance.
    pub gamma_1: f64,
    /// Weight gamma_2 on the post-step variance.
    pub gamma_2: f64,
}

impl Default for QeParams {
    fn default() -> Self {
        Self {
            psi_c: DEFAULT_PSI_C,
            gamma_1: DEFAULT_GAMMA_1,
            gamma_2: DEFAULT_GAMMA_2,
        }
    }
}

/// Which QE variance branch a step took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QeBranch {
    /// `m <= 0`: the variance is absorbed at zero.
    Degenerate,
    /// `psi <= DETERMINISTIC_PSI`: `V' = m` and the price uses the limiting update.
    Deterministic,
    /// Squared-Gaussian branch (`psi <= psi_c`).
    Quadratic,
    /// Exponential branch with point mass at zero (`psi > psi_c`).
    Exponential,
}

/// Quadratic-exponential Heston stepper.
#[derive(Clone, Debug, PartialEq)]
pub struct QeScheme {
    mu: f64,
    theta: f64,
    rho: f64,
    gamma_1: f64,
    gamma_2: f64,
    dt: f64,
    psi_c: f64,
    /// e^{-kappa dt}
    decay: f64,
    /// Coefficient of V in s2.
    s2_v: f64,
    /// Constant term of s2.
    s2_c: f64,
    /// mu dt + K0
    drift: f64,
    k1: f64,
    k2: f64,
    k3: f64,
    k4: f64,
}

impl QeScheme {
    /// Creates a stepper for `params` with increment `dt` and scheme constants `qe`.
    ///
    /// Every quantity that does not depend on the state is precomputed here.
    pub fn new(params: &HestonParams, dt: f64, qe: QeParams) -> Self {
        let HestonParams {
            mu,
            kappa,
            theta,
            xi,
            rho,
            ..
        } = *params;

        let decay = (-kappa * dt).exp();
        let one_minus_decay = 1.0 - decay;
        let xi2 = xi * xi;

        // Unused on deterministic steps, which every step is when xi = 0.
        let rho_over_xi = if xi > 0.0 { rho / xi } else { 0.0 };
        let k0 = -rho_over_xi * kappa * theta * dt;
        let slope = kappa * rho_over_xi - 0.5;
        let k1 = qe.gamma_1 * dt * slope - rho_over_xi;
        let k2 = qe.gamma_2 * dt * slope + rho_over_xi;
        let k3 = qe.gamma_1 * dt * (1.0 - rho * rho);
        let k4 = qe.gamma_2 * dt * (1.0 - rho * rho);

        Self {
            mu,
            theta,
            rho,
            gamma_1: qe.gamma_1,
            gamma_2: qe.gamma_2,
            dt,
            psi_c: qe.psi_c,
            decay,
            s2_v: xi2 * decay * one_minus_decay / kappa,
            s2_c: theta * xi2 * one_minus_decay * one_minus_decay / (2.0 * kappa),
            drift: mu * dt + k0,
            k1,
            k2,
            k3,
            k4,
        }
    }

    /// Conditional moments `(m, s2, psi)` of the next variance given `v`.
    ///
    /// `psi` is infinite when `m` is zero.
    #[inline]
    pub fn moments(&self, v: f64) -> (f64, f64, f64) {
        let v = v.max(0.0);
        let m = self.theta + (v - self.theta) * self.decay;
        let s2 = v * self.s2_v + self.s2_c;
        let psi = if m > 0.0 { s2 / (m * m) } else { f64::INFINITY };
        (m, s2, psi)
    }

    /// Branch the variance update takes from `v`.
    pub fn branch(&self, v: f64) -> QeBranch {
        let (m, _, psi) = self.moments(v);
        self.classify(m, psi)
    }

    #[inline]
    fn classify(&self, m: f64, psi: f64) -> QeBranch {
        if m <= 0.0 {
            QeBranch::Degenerate
        } else if psi <= DETERMINISTIC_PSI {
            QeBranch::Deterministic
        } else if psi <= self.psi_c {
            QeBranch::Quadratic
        } else {
            QeBranch::Exponential
        }
    }

    /// Quadratic-branch coefficients `(a, b)` for mean `m` and ratio `psi`.
    #[inline]
    pub fn quadratic_coefficients(m: f64, psi: f64) -> (f64, f64) {
        let two_over_psi = 2.0 / psi;
        let b2 = two_over_psi - 1.0 + two_over_psi.sqrt() * (two_over_psi - 1.0).max(0.0).sqrt();
        let a = m / (1.0 + b2);
        (a, b2.sqrt())
    }

    /// Exponential-branch parameters `(p, beta)` for mean `m` and ratio `psi`.
    #[inline]
    pub fn exponential_coefficients(m: f64, psi: f64) -> (f64, f64) {
        let p = ((psi - 1.0) / (psi + 1.0)).max(0.0);
        let beta = (1.0 - p) / m;
        (p, beta)
    }

    /// Variance update from `v` using draws `z_v` and `u_v`.
    #[inline]
    pub fn variance_step(&self, v: f64, z_v: f64, u_v: f64) -> f64 {
        let (m, _, psi) = self.moments(v);
        Self::sample_variance(self.classify(m, psi), m, psi, z_v, u_v)
    }

    #[inline]
    fn sample_variance(branch: QeBranch, m: f64, psi: f64, z_v: f64, u_v: f64) -> f64 {
        match branch {
            QeBranch::Degenerate => 0.0,
            QeBranch::Deterministic => m,
            QeBranch::Quadratic => {
                let (a, b) = Self::quadratic_coefficients(m, psi);
                let b_plus_z = b + z_v;
                a * b_plus_z * b_plus_z
            }
            QeBranch::Exponential => {
                let (p, beta) = Self::exponential_coefficients(m, psi);
                if u_v <= p {
                    0.0
                } else {
                    ((1.0 - p) / (1.0 - u_v)).ln() / beta
                }
            }
        }
    }

    /// Log-price update across a step from variance `v` to `v_next`.
    #[inline]
    pub fn price_step(&self, s: f64, v: f64, v_next: f64, z_perp: f64) -> f64 {
        let integrated = (self.k3 * v + self.k4 * v_next).max(0.0);
        let log_increment = self.drift + self.k1 * v + self.k2 * v_next + integrated.sqrt() * z_perp;
        s * log_increment.exp()
    }

    /// Log-price update for a deterministic-variance step, driven by the
    /// correlated normal `z_s`.
    #[inline]
    pub fn deterministic_price_step(&self, s: f64, v: f64, v_next: f64, z_s: f64) -> f64 {
        let integrated = ((self.gamma_1 * v + self.gamma_2 * v_next) * self.dt).max(0.0);
        s * (self.mu * self.dt - 0.5 * integrated + integrated.sqrt() * z_s).exp()
    }
}

impl PathStepper for QeScheme {
    #[inline]
    fn step(&self, state: PathState, draws: &StepDraws) -> PathState {
        let (m, _, psi) = self.moments(state.variance);
        let branch = self.classify(m, psi);
        let v_next = Self::sample_variance(branch, m, psi, draws.z_v, draws.u_v);
        let price = if branch == QeBranch::Deterministic {
            let v = state.variance.max(0.0);
            self.deterministic_price_step(state.price, v, v_next, draws.correlated(self.rho))
        } else {
            self.price_step(state.price, state.variance, v_next, draws.z_perp)
        };
        PathState {
            price,
            variance: v_next,
        }
    }

    #[inline]
    fn dt(&self) -> f64 {
        self.dt
    }
}
