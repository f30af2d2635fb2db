//! Monte Carlo pricing engine.
//!
//! # Overview
//!
//! The [`MonteCarloPricer`] coordinates:
//! 1. Per-trial random streams (via [`TrialStreams`])
//! 2. Path simulation (via [`simulate_terminal`])
//! 3. Payoff evaluation (via [`PriceableContract`])
//! 4. Aggregation and optional discounting
//!
//! Trials are independent. With `parallel` enabled they are mapped over the
//! rayon pool; payoffs are collected in trial order and summed sequentially,
//! so a seeded run gives the same bits in either mode.

use std::sync::atomic::{AtomicUsize, Ordering};

use pricer_core::math::statistics::{SampleStatistics, Z_95, Z_99};
use pricer_core::traits::PriceableContract;
use pricer_core::types::PricingError;
use pricer_models::instruments::OptionContract;
use pricer_models::models::heston::HestonParams;
use pricer_models::models::schemes::{HestonStepper, SchemeKind};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::cancel::CancellationToken;
use super::config::MonteCarloConfig;
use super::error::ConfigError;
use super::paths::{simulate_terminal, step_count};
use crate::rng::{entropy_seed, TrialStreams};

/// Pricing result of a Monte Carlo run.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::PricingResult;
///
/// let result = PricingResult {
///     price: 0.25,
///     std_error: 0.01,
///     ..PricingResult::default()
/// };
///
/// assert!((result.confidence_95() - 0.0196).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Mean payoff, multiplied by the discount factor.
    pub price: f64,
    /// Standard error of the price estimate.
    pub std_error: f64,
    /// Number of trials simulated (0 when nothing was simulated).
    pub n_trials: usize,
    /// Number of time steps per trial.
    pub n_steps: usize,
    /// Base seed of the run, if one was used.
    pub seed: Option<u64>,
    /// Discretisation scheme.
    pub scheme: SchemeKind,
    /// Discount factor applied to the mean payoff.
    pub discount_factor: f64,
}

impl PricingResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        Z_95 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        Z_99 * self.std_error
    }
}

/// Monte Carlo pricing engine for Heston-driven European options.
///
/// # Examples
///
/// ```rust
/// use pricer_models::instruments::OptionContract;
/// use pricer_models::models::heston::HestonParams;
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
///
/// let config = MonteCarloConfig::builder()
///     .n_trials(2_000)
///     .time_step(1e-2)
///     .seed(42)
///     .build()
///     .unwrap();
/// let pricer = MonteCarloPricer::new(config).unwrap();
///
/// let call = OptionContract::call(HestonParams::default(), 1.0).unwrap();
/// let result = pricer.price(&call).unwrap();
/// assert!(result.price > 0.0);
/// assert_eq!(result.n_steps, 200);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: MonteCarloConfig,
    cancel: Option<CancellationToken>,
}

impl MonteCarloPricer {
    /// Creates a new pricer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Attaches a cancellation token checked before every trial.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Prices `contract`.
    ///
    /// A contract without a payoff prices to exactly zero and simulates
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Cancelled`] if the token fires mid-run
    /// - [`PricingError::NumericalInstability`] if a trial ends on a
    ///   non-finite price
    pub fn price(&self, contract: &OptionContract) -> Result<PricingResult, PricingError> {
        let params = contract.params();
        let scheme = self.config.scheme();
        let n_steps = step_count(params.maturity, self.config.time_step());

        if !contract.has_payoff() {
            debug!(scheme = %scheme, "contract has no payoff, price is zero");
            return Ok(PricingResult {
                price: 0.0,
                std_error: 0.0,
                n_trials: 0,
                n_steps,
                seed: None,
                scheme,
                discount_factor: 1.0,
            });
        }

        let seed = self.resolve_seed();
        info!(
            scheme = %scheme,
            trials = self.config.n_trials(),
            steps = n_steps,
            seed,
            "starting Heston Monte Carlo run"
        );

        let payoffs = self.run_trials(params, seed, n_steps, |s_t| contract.evaluate_at(s_t))?;

        let discounting = self.config.discounting();
        let discount_factor = discounting.factor(params.maturity);
        if discounting.is_enabled() {
            warn!(
                discount_factor,
                "discounting enabled, price is no longer the raw mean payoff"
            );
        }
        let stats = SampleStatistics::from_samples(&payoffs).scaled(discount_factor);

        info!(
            price = stats.mean,
            std_error = stats.std_error,
            "Heston Monte Carlo run finished"
        );

        Ok(PricingResult {
            price: stats.mean,
            std_error: stats.std_error,
            n_trials: stats.count,
            n_steps,
            seed: Some(seed),
            scheme,
            discount_factor,
        })
    }

    /// Simulates every trial and returns the terminal asset prices in trial
    /// order.
    ///
    /// Uses the same streams as [`price`](Self::price), so with a fixed seed
    /// the payoff of trial `i` is the payoff of `prices[i]`.
    ///
    /// # Errors
    ///
    /// Same as [`price`](Self::price).
    pub fn simulate_terminal_prices(
        &self,
        params: &HestonParams,
    ) -> Result<Vec<f64>, PricingError> {
        let n_steps = step_count(params.maturity, self.config.time_step());
        let seed = self.resolve_seed();
        debug!(seed, steps = n_steps, "sampling terminal prices");
        self.run_trials(params, seed, n_steps, |s_t| s_t)
    }

    fn resolve_seed(&self) -> u64 {
        match self.config.seed() {
            Some(seed) => seed,
            None => {
                let seed = entropy_seed();
                debug!(seed, "no seed configured, drew one from entropy");
                seed
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Runs every trial, mapping each terminal price through `map`.
    fn run_trials<F>(
        &self,
        params: &HestonParams,
        base_seed: u64,
        n_steps: usize,
        map: F,
    ) -> Result<Vec<f64>, PricingError>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if n_steps == 0 {
            warn!(
                maturity = params.maturity,
                time_step = self.config.time_step(),
                "maturity shorter than one time step, terminal price equals spot"
            );
        }
        if !params.satisfies_feller() {
            warn!(
                feller_ratio = params.feller_ratio(),
                "Feller condition 2*kappa*theta > xi^2 violated, variance can reach zero"
            );
        }

        let stepper = HestonStepper::new(
            self.config.scheme(),
            params,
            self.config.time_step(),
            self.config.qe_params(),
        );
        let requested = self.config.n_trials();
        let completed = AtomicUsize::new(0);

        let trial = |idx: usize| -> Result<f64, PricingError> {
            if self.is_cancelled() {
                return Err(PricingError::Cancelled {
                    completed: completed.load(Ordering::Relaxed),
                    requested,
                });
            }
            let mut streams = TrialStreams::for_trial(base_seed, idx);
            let s_t = simulate_terminal(params, &stepper, n_steps, &mut streams);
            if !s_t.is_finite() {
                return Err(PricingError::NumericalInstability {
                    trial: idx,
                    detail: format!("terminal price {s_t}"),
                });
            }
            completed.fetch_add(1, Ordering::Relaxed);
            Ok(map(s_t))
        };

        if self.config.parallel() {
            (0..requested).into_par_iter().map(trial).collect()
        } else {
            (0..requested).map(trial).collect()
        }
    }
}

/// Prices `contract` with `trial_count` trials of `scheme` and default
/// settings otherwise.
///
/// Unseeded: repeated calls give independent estimates.
///
/// # Errors
///
/// [`PricingError::InvalidConfiguration`] for a zero trial count, plus the
/// errors of [`MonteCarloPricer::price`].
pub fn price(
    contract: &OptionContract,
    scheme: SchemeKind,
    trial_count: usize,
) -> Result<f64, PricingError> {
    let config = MonteCarloConfig::builder()
        .n_trials(trial_count)
        .scheme(scheme)
        .build()?;
    let pricer = MonteCarloPricer::new(config)?;
    Ok(pricer.price(contract)?.price)
}
