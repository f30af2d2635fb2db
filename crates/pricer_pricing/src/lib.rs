//! # Pricer Pricing (Layer 3: Monte Carlo Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing turns an [`OptionContract`](pricer_models::instruments::OptionContract)
//! into a Monte Carlo estimate:
//! - Seeded per-trial random streams (`rng`)
//! - Path simulation, aggregation, cancellation and configuration (`mc`)
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::instruments::OptionContract;
//! use pricer_models::models::heston::HestonParams;
//! use pricer_models::models::SchemeKind;
//!
//! let put = OptionContract::put(HestonParams::default(), 1.0).unwrap();
//! let value = pricer_pricing::price(&put, SchemeKind::Milstein, 100).unwrap();
//! assert!(value >= 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialisation of `PricingResult` and `Discounting`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;

pub use mc::{price, MonteCarloConfig, MonteCarloPricer, PricingResult};
