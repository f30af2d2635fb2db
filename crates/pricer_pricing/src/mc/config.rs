//! Monte Carlo simulation configuration.
//!
//! This module provides configuration types and builders for Heston Monte
//! Carlo pricing runs.

use pricer_models::models::schemes::{QeParams, SchemeKind};

use super::error::ConfigError;

/// Maximum number of trials allowed.
pub const MAX_TRIALS: usize = 10_000_000;

/// Default number of trials per pricing call.
pub const DEFAULT_TRIALS: usize = 1000;

/// Default time increment in years.
pub const DEFAULT_TIME_STEP: f64 = 0.00001;

/// Treatment of the simulated mean payoff.
///
/// The estimator is undiscounted unless a rate is supplied.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::Discounting;
///
/// assert_eq!(Discounting::None.factor(2.0), 1.0);
/// let df = Discounting::Continuous { rate: 0.03 }.factor(2.0);
/// assert!((df - (-0.06_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum Discounting {
    /// Report the raw mean payoff.
    #[default]
    None,
    /// Multiply the mean by `exp(-rate * T)`.
    Continuous {
        /// Continuously compounded rate.
        rate: f64,
    },
}

impl Discounting {
    /// Discount factor applied at maturity `t`.
    #[inline]
    pub fn factor(&self, t: f64) -> f64 {
        match *self {
            Discounting::None => 1.0,
            Discounting::Continuous { rate } => (-rate * t).exp(),
        }
    }

    /// Whether a discount factor other than one may be applied.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Discounting::Continuous { .. })
    }
}

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
/// use pricer_models::models::SchemeKind;
///
/// let config = MonteCarloConfig::builder()
///     .n_trials(10_000)
///     .time_step(1e-3)
///     .scheme(SchemeKind::Milstein)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_trials(), 10_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    /// Number of independent trials.
    n_trials: usize,
    /// Time increment in years.
    time_step: f64,
    /// Discretisation scheme.
    scheme: SchemeKind,
    /// QE scheme constants.
    qe: QeParams,
    /// Base seed; drawn from entropy per call when absent.
    seed: Option<u64>,
    /// Run trials on the rayon pool.
    parallel: bool,
    /// Treatment of the mean payoff.
    discounting: Discounting,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_trials: DEFAULT_TRIALS,
            time_step: DEFAULT_TIME_STEP,
            scheme: SchemeKind::default(),
            qe: QeParams::default(),
            seed: None,
            parallel: true,
            discounting: Discounting::None,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of trials.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the time increment.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Returns the discretisation scheme.
    #[inline]
    pub fn scheme(&self) -> SchemeKind {
        self.scheme
    }

    /// Returns the QE scheme constants.
    #[inline]
    pub fn qe_params(&self) -> QeParams {
        self.qe
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns whether trials run in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the discounting mode.
    #[inline]
    pub fn discounting(&self) -> Discounting {
        self.discounting
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_trials` is 0 or greater than 10,000,000
    /// - `time_step` is not positive and finite
    /// - `psi_c` lies outside [1, 2]
    /// - `gamma_1` or `gamma_2` lies outside [0, 1]
    /// - the discount rate is not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trials == 0 || self.n_trials > MAX_TRIALS {
            return Err(ConfigError::InvalidTrialCount(self.n_trials));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }

        let QeParams {
            psi_c,
            gamma_1,
            gamma_2,
        } = self.qe;
        if !(1.0..=2.0).contains(&psi_c) {
            return Err(ConfigError::InvalidParameter {
                name: "psi_c",
                value: format!("{psi_c} must lie in [1, 2]"),
            });
        }
        for (name, gamma) in [("gamma_1", gamma_1), ("gamma_2", gamma_2)] {
            if !(0.0..=1.0).contains(&gamma) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value: format!("{gamma} must lie in [0, 1]"),
                });
            }
        }

        if let Discounting::Continuous { rate } = self.discounting {
            if !rate.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name: "discount_rate",
                    value: format!("{rate} is not finite"),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Unset knobs fall back to the defaults: 1000 trials, `dt = 1e-5`, QE,
/// `psi_c = 1.5`, `gamma_1 = gamma_2 = 0.5`, entropy seeding, parallel,
/// undiscounted.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{Discounting, MonteCarloConfig};
///
/// let config = MonteCarloConfig::builder()
///     .n_trials(50_000)
///     .discounting(Discounting::Continuous { rate: 0.03 })
///     .sequential()
///     .build()
///     .expect("valid config");
/// assert!(!config.parallel());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_trials: Option<usize>,
    time_step: Option<f64>,
    scheme: SchemeKind,
    qe: Option<QeParams>,
    seed: Option<u64>,
    sequential: bool,
    discounting: Discounting,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of trials.
    ///
    /// # Arguments
    ///
    /// * `n_trials` - Number of trials in [1, 10_000_000]
    #[inline]
    pub fn n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = Some(n_trials);
        self
    }

    /// Sets the time increment in years.
    #[inline]
    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = Some(time_step);
        self
    }

    /// Selects the discretisation scheme.
    #[inline]
    pub fn scheme(mut self, scheme: SchemeKind) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the QE scheme constants.
    #[inline]
    pub fn qe_params(mut self, qe: QeParams) -> Self {
        self.qe = Some(qe);
        self
    }

    /// Sets the seed for reproducibility.
    ///
    /// # Arguments
    ///
    /// * `seed` - 64-bit seed value
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Runs trials on the calling thread only.
    #[inline]
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }

    /// Chooses between parallel and sequential execution.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.sequential = !parallel;
        self
    }

    /// Sets the discounting mode.
    #[inline]
    pub fn discounting(mut self, discounting: Discounting) -> Self {
        self.discounting = discounting;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any knob fails [`MonteCarloConfig::validate`].
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            n_trials: self.n_trials.unwrap_or(DEFAULT_TRIALS),
            time_step: self.time_step.unwrap_or(DEFAULT_TIME_STEP),
            scheme: self.scheme,
            qe: self.qe.unwrap_or_default(),
            seed: self.seed,
            parallel: !self.sequential,
            discounting: self.discounting,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_builder_defaults() {
        let config = MonteCarloConfig::builder().build().unwrap();
        assert_eq!(config, MonteCarloConfig::default());
        assert_eq!(config.n_trials(), 1000);
        assert_eq!(config.time_step(), 0.00001);
        assert_eq!(config.scheme(), SchemeKind::QuadraticExponential);
        assert_eq!(config.qe_params(), QeParams::default());
        assert_eq!(config.seed(), None);
        assert!(config.parallel());
        assert_eq!(config.discounting(), Discounting::None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MonteCarloConfig::builder()
            .n_trials(42)
            .time_step(0.01)
            .scheme(SchemeKind::Milstein)
            .seed(7)
            .parallel(false)
            .build()
            .unwrap();
        assert_eq!(config.n_trials(), 42);
        assert_eq!(config.time_step(), 0.01);
        assert_eq!(config.scheme(), SchemeKind::Milstein);
        assert_eq!(config.seed(), Some(7));
        assert!(!config.parallel());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let err = MonteCarloConfig::builder().n_trials(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidTrialCount(0));
    }

    #[test]
    fn test_too_many_trials_rejected() {
        let err = MonteCarloConfig::builder()
            .n_trials(MAX_TRIALS + 1)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTrialCount(MAX_TRIALS + 1));
    }

    #[test]
    fn test_invalid_time_step_rejected() {
        for dt in [0.0, -1e-3, f64::INFINITY] {
            let err = MonteCarloConfig::builder().time_step(dt).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeStep(_)));
        }
        assert!(MonteCarloConfig::builder()
            .time_step(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_qe_constants_validated() {
        let bad_psi = QeParams {
            psi_c: 2.5,
            ..QeParams::default()
        };
        let err = MonteCarloConfig::builder()
            .qe_params(bad_psi)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "psi_c", .. }));

        let bad_gamma = QeParams {
            gamma_2: -0.1,
            ..QeParams::default()
        };
        let err = MonteCarloConfig::builder()
            .qe_params(bad_gamma)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "gamma_2", .. }));

        let euler_like = QeParams {
            psi_c: 1.0,
            gamma_1: 1.0,
            gamma_2: 0.0,
        };
        assert!(MonteCarloConfig::builder().qe_params(euler_like).build().is_ok());
    }

    #[test]
    fn test_non_finite_discount_rate_rejected() {
        let err = MonteCarloConfig::builder()
            .discounting(Discounting::Continuous { rate: f64::NAN })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "discount_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_discount_factor() {
        assert_eq!(Discounting::None.factor(5.0), 1.0);
        assert!(!Discounting::None.is_enabled());
        let d = Discounting::Continuous { rate: 0.05 };
        assert!(d.is_enabled());
        assert!((d.factor(1.0) - (-0.05_f64).exp()).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn prop_valid_knobs_build(
            n in 1usize..1_000_000,
            dt in 1e-8..1.0_f64,
            psi_c in 1.0..=2.0_f64,
            g1 in 0.0..=1.0_f64,
        ) {
            let qe = QeParams { psi_c, gamma_1: g1, gamma_2: 1.0 - g1 };
            let config = MonteCarloConfig::builder()
                .n_trials(n)
                .time_step(dt)
                .qe_params(qe)
                .build();
            prop_assert!(config.is_ok());
        }
    }
}
