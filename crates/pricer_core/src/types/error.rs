//! Error types for structured error handling.
//!
//! This module provides [`PricingError`], the error vocabulary shared by every
//! layer of the pricer. Lower layers define their own narrower error enums
//! (parameter validation, configuration) and lift them into `PricingError`
//! through `From` conversions at the layer boundary.

use thiserror::Error;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidInput`: Invalid model or contract parameters
/// - `InvalidConfiguration`: Simulation settings rejected before any path is run
/// - `NumericalInstability`: A simulated trial produced a non-finite value
/// - `Cancelled`: The pricing call was stopped by its cancellation token
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Simulation configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A trial produced NaN or infinity
    #[error("Numerical instability in trial {trial}: {detail}")]
    NumericalInstability {
        /// Index of the offending trial.
        trial: usize,
        /// Description of the non-finite value.
        detail: String,
    },

    /// Pricing was cancelled before every trial completed
    #[error("Pricing cancelled after {completed} of {requested} trials")]
    Cancelled {
        /// Trials that had finished when cancellation was observed.
        completed: usize,
        /// Trials requested by the configuration.
        requested: usize,
    },
}

impl PricingError {
    /// Returns `true` if the error was raised by a cancellation request.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PricingError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = PricingError::InvalidInput("strike must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: strike must be positive");
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = PricingError::InvalidConfiguration("n_trials = 0".to_string());
        assert!(err.to_string().contains("n_trials = 0"));
    }

    #[test]
    fn test_numerical_instability_display() {
        let err = PricingError::NumericalInstability {
            trial: 17,
            detail: "terminal price is NaN".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("trial 17"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn test_cancelled_display_and_predicate() {
        let err = PricingError::Cancelled {
            completed: 10,
            requested: 1000,
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Pricing cancelled after 10 of 1000 trials");

        let other = PricingError::InvalidInput("x".to_string());
        assert!(!other.is_cancelled());
    }

    #[test]
    fn test_error_trait_object() {
        let err: Box<dyn std::error::Error> = Box::new(PricingError::InvalidInput("x".into()));
        assert!(err.to_string().starts_with("Invalid input"));
    }
}
