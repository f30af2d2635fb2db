//! Error types for the Monte Carlo engine configuration.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Configuration error for the Monte Carlo pricer.
///
/// Raised by [`MonteCarloConfigBuilder::build`](super::MonteCarloConfigBuilder::build)
/// when a knob is out of range.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Trial count outside [1, MAX_TRIALS].
    #[error("Invalid trial count {0}: must be in range [1, 10_000_000]")]
    InvalidTrialCount(usize),

    /// Time increment not positive and finite.
    #[error("Invalid time step {0}: must be positive and finite")]
    InvalidTimeStep(f64),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidConfiguration(err.to_string())
    }
}
