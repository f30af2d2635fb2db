//! Milstein-style scheme in price space.
//!
//! ```text
//! V' = V + kappa (theta - V) dt + xi sqrt(V+ dt) Z_v + 0.25 xi^2 dt (Z_v^2 - 1)
//! S' = S (1 + mu dt + sqrt(V+ dt) Z_s + 0.25 S dt (Z_s^2 - 1))
//! ```
//!
//! `V+ = max(V, 0)` is used inside every square root. The stored variance is
//! not floored: it may dip below zero, in which case the diffusion terms
//! vanish and the mean-reversion drift pulls it back. This keeps the scheme
//! free of NaN without altering its drift.

use super::{PathState, PathStepper, StepDraws};
use crate::models::heston::HestonParams;

/// Milstein-style Heston stepper.
#[derive(Clone, Debug, PartialEq)]
pub struct MilsteinScheme {
    mu: f64,
    kappa: f64,
    theta: f64,
    xi: f64,
    rho: f64,
    dt: f64,
}

impl MilsteinScheme {
    /// Creates a stepper for `params` with increment `dt`.
    pub fn new(params: &HestonParams, dt: f64) -> Self {
        Self {
            mu: params.mu,
            kappa: params.kappa,
            theta: params.theta,
            xi: params.xi,
            rho: params.rho,
            dt,
        }
    }

    /// Variance update. `v` may be negative.
    #[inline]
    pub fn variance_step(&self, v: f64, z_v: f64) -> f64 {
        let dt = self.dt;
        let sqrt_vdt = (v.max(0.0) * dt).sqrt();
        v + self.kappa * (self.theta - v) * dt
            + self.xi * sqrt_vdt * z_v
            + 0.25 * self.xi * self.xi * dt * (z_v * z_v - 1.0)
    }

    /// Price update using the current (pre-step) variance.
    #[inline]
    pub fn price_step(&self, s: f64, v: f64, z_s: f64) -> f64 {
        let dt = self.dt;
        let sqrt_vdt = (v.max(0.0) * dt).sqrt();
        s * (1.0 + self.mu * dt + sqrt_vdt * z_s + 0.25 * s * dt * (z_s * z_s - 1.0))
    }
}

impl PathStepper for MilsteinScheme {
    #[inline]
    fn step(&self, state: PathState, draws: &StepDraws) -> PathState {
        let z_s = draws.correlated(self.rho);
        PathState {
            price: self.price_step(state.price, state.variance, z_s),
            variance: self.variance_step(state.variance, draws.z_v),
        }
    }

    #[inline]
    fn dt(&self) -> f64 {
        self.dt
    }
}
