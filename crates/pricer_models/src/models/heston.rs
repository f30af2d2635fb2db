//! Heston stochastic volatility model parameters.
//!
//! The model is described by the SDEs:
//! ```text
//! dS = mu * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//! where:
//! - S = asset price
//! - V = instantaneous variance
//! - mu = drift (no separate risk-free rate is modelled)
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - xi = volatility of volatility
//! - rho = correlation between asset and variance drivers
//!
//! ## Feller condition
//!
//! The variance process stays strictly positive when
//! ```text
//! 2 * kappa * theta > xi^2
//! ```
//! Violating it is legal; both discretisation schemes handle a variance that
//! touches zero, but a warning is logged because discretisation bias grows.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::heston::HestonParams;
//!
//! let params = HestonParams::new(
//!     1.0,   // spot
//!     0.08,  // initial variance
//!     0.03,  // drift
//!     2.0,   // mean-reversion speed
//!     0.1,   // long-run variance
//!     0.2,   // vol-of-vol
//!     0.5,   // correlation
//!     2.0,   // maturity
//! ).unwrap();
//!
//! assert!(params.satisfies_feller());
//! ```

use thiserror::Error;

/// Heston model parameter errors.
///
/// Every variant carries the rejected value so callers can report it
/// verbatim. Parameters are validated once, at construction, so the path
/// stepper never sees a value that would make its square roots undefined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Spot price must be positive
    #[error("Invalid spot price: S0 = {0} (must be positive)")]
    InvalidSpot(f64),

    /// Initial variance must be non-negative
    #[error("Invalid initial variance: v0 = {0} (must be non-negative)")]
    InvalidV0(f64),

    /// Drift must be finite
    #[error("Invalid drift: mu = {0} (must be finite)")]
    InvalidDrift(f64),

    /// Mean-reversion speed must be positive
    #[error("Invalid mean-reversion speed: kappa = {0} (must be positive)")]
    InvalidKappa(f64),

    /// Long-run variance must be non-negative
    #[error("Invalid long-run variance: theta = {0} (must be non-negative)")]
    InvalidTheta(f64),

    /// Vol-of-vol must be non-negative
    #[error("Invalid vol-of-vol: xi = {0} (must be non-negative)")]
    InvalidXi(f64),

    /// Correlation must lie in [-1, 1]
    #[error("Invalid correlation: rho = {0} (must be in [-1, 1])")]
    InvalidRho(f64),

    /// Maturity must be positive
    #[error("Invalid maturity: T = {0} (must be positive)")]
    InvalidMaturity(f64),
}

/// Heston model parameters.
///
/// Immutable value type. Construct through [`HestonParams::new`], which
/// rejects any combination that would produce undefined numerics.
///
/// # Fields
///
/// * `spot` - initial asset price (S0 > 0)
/// * `v0` - initial variance (v0 >= 0)
/// * `mu` - drift (any finite real)
/// * `kappa` - mean-reversion speed (kappa > 0)
/// * `theta` - long-run variance (theta >= 0)
/// * `xi` - volatility of variance (xi >= 0)
/// * `rho` - correlation (-1 <= rho <= 1)
/// * `maturity` - horizon in years (T > 0)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Initial asset price (S0)
    pub spot: f64,
    /// Initial variance (v0)
    pub v0: f64,
    /// Drift (mu)
    pub mu: f64,
    /// Mean-reversion speed (kappa)
    pub kappa: f64,
    /// Long-run variance (theta)
    pub theta: f64,
    /// Volatility of variance (xi)
    pub xi: f64,
    /// Correlation between asset and variance drivers (rho)
    pub rho: f64,
    /// Time horizon in years (T)
    pub maturity: f64,
}

impl HestonParams {
    /// Creates validated Heston parameters.
    ///
    /// # Errors
    ///
    /// Returns the first [`HestonError`] found, checking parameters in
    /// declaration order. NaN fails every check.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::models::heston::{HestonError, HestonParams};
    ///
    /// let ok = HestonParams::new(1.0, 0.08, 0.03, 2.0, 0.1, 0.2, 0.5, 2.0);
    /// assert!(ok.is_ok());
    ///
    /// let bad = HestonParams::new(1.0, 0.08, 0.03, 2.0, 0.1, 0.2, 1.5, 2.0);
    /// assert_eq!(bad, Err(HestonError::InvalidRho(1.5)));
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: f64,
        v0: f64,
        mu: f64,
        kappa: f64,
        theta: f64,
        xi: f64,
        rho: f64,
        maturity: f64,
    ) -> Result<Self, HestonError> {
        let params = Self {
            spot,
            v0,
            mu,
            kappa,
            theta,
            xi,
            rho,
            maturity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameters.
    ///
    /// Exposed separately because the fields are public and a deserialised
    /// value bypasses [`HestonParams::new`].
    pub fn validate(&self) -> Result<(), HestonError> {
        // Comparisons are written so that NaN falls into the error branch.
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(HestonError::InvalidSpot(self.spot));
        }
        if !(self.v0 >= 0.0 && self.v0.is_finite()) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        if !self.mu.is_finite() {
            return Err(HestonError::InvalidDrift(self.mu));
        }
        if !(self.kappa > 0.0 && self.kappa.is_finite()) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !(self.theta >= 0.0 && self.theta.is_finite()) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !(self.xi >= 0.0 && self.xi.is_finite()) {
            return Err(HestonError::InvalidXi(self.xi));
        }
        if !((-1.0..=1.0).contains(&self.rho)) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        if !(self.maturity > 0.0 && self.maturity.is_finite()) {
            return Err(HestonError::InvalidMaturity(self.maturity));
        }
        Ok(())
    }

    /// Checks the Feller condition `2 * kappa * theta > xi^2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // 2 * 2.0 * 0.1 = 0.4 > 0.2^2 = 0.04
    /// let p = HestonParams::new(1.0, 0.08, 0.03, 2.0, 0.1, 0.2, 0.5, 2.0).unwrap();
    /// assert!(p.satisfies_feller());
    ///
    /// // 2 * 0.5 * 0.04 = 0.04 < 0.5^2 = 0.25
    /// let q = HestonParams::new(1.0, 0.04, 0.0, 0.5, 0.04, 0.5, -0.7, 1.0).unwrap();
    /// assert!(!q.satisfies_feller());
    /// ```
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.xi * self.xi
    }

    /// Feller ratio `2 * kappa * theta / xi^2`.
    ///
    /// Values above 1.0 satisfy the Feller condition. Returns infinity when
    /// `xi` is zero (the variance is deterministic).
    pub fn feller_ratio(&self) -> f64 {
        let denominator = self.xi * self.xi;
        if denominator > 0.0 {
            2.0 * self.kappa * self.theta / denominator
        } else {
            f64::INFINITY
        }
    }

    /// Deterministic forward `S0 * exp(mu * T)`.
    ///
    /// The expected terminal price under the drift `mu`; used by put-call
    /// parity checks.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.spot * (self.mu * self.maturity).exp()
    }
}

impl Default for HestonParams {
    /// Reference parameter set:
    /// - spot = 1.0
    /// - v0 = 0.08
    /// - mu = 0.03
    /// - kappa = 2.0
    /// - theta = 0.1
    /// - xi = 0.2
    /// - rho = 0.5
    /// - maturity = 2.0
    fn default() -> Self {
        Self {
            spot: 1.0,
            v0: 0.08,
            mu: 0.03,
            kappa: 2.0,
            theta: 0.1,
            xi: 0.2,
            rho: 0.5,
            maturity: 2.0,
        }
    }
}
