//! # Random Number Generation Infrastructure
//!
//! Random variates for the Heston path simulator.
//!
//! ## Module Structure
//!
//! - [`prng`]: seeded pseudo-random number generator wrapper
//! - [`streams`]: per-trial stream derivation and the [`VariateSource`] seam
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{TrialStreams, VariateSource};
//!
//! let mut streams = TrialStreams::for_trial(12345, 0);
//! let draws = streams.next_draws();
//! assert!(draws.u_v > 0.0 && draws.u_v < 1.0);
//! ```

pub mod prng;
pub mod streams;

pub use prng::{entropy_seed, PricerRng};
pub use streams::{stream_seed, TrialStreams, VariateSource};
