//! Core error types.
//!
//! [`PricingError`] is re-exported here for convenience.

pub mod error;

pub use error::PricingError;
