//! # pricer_core: Foundation for the Heston Monte Carlo pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the 3-layer architecture, providing:
//! - The contract evaluation trait (`traits::priceable`)
//! - Sample statistics for Monte Carlo estimators (`math::statistics`)
//! - The shared error type `PricingError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::statistics::SampleStatistics;
//!
//! let stats = SampleStatistics::from_samples(&[0.0, 0.2, 0.4]);
//! assert!((stats.mean - 0.2).abs() < 1e-12);
//! assert!(stats.std_error > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `SampleStatistics`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
