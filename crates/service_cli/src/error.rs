//! CLI error type.

use pricer_core::types::PricingError;
use pricer_models::instruments::ContractError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `hestonmc`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded or are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Contract inputs rejected.
    #[error("Invalid contract: {0}")]
    Contract(#[from] ContractError),

    /// Engine configuration rejected.
    #[error("Invalid engine configuration: {0}")]
    Engine(#[from] pricer_pricing::mc::ConfigError),

    /// Pricing failed.
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    /// Bad combination of arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON encoding failed.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
