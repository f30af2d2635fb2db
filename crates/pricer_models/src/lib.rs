//! # Pricer Models (L2: Business Logic)
//!
//! Option contracts, payoffs and the Heston stochastic-volatility model.
//!
//! This crate provides:
//! - Validated Heston model parameters with Feller diagnostics
//! - European call/put contracts plus an unpriced placeholder instrument
//! - One-step discretisation schemes (Milstein and quadratic-exponential)
//!
//! ## Design Principles
//!
//! - **Enum-based schemes and payoffs** for static dispatch
//! - **Pure step functions**: schemes consume pre-drawn variates and own no
//!   random state
//! - **Validated construction**: contracts cannot exist with invalid inputs

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod instruments;
pub mod models;
