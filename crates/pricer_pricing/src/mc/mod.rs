//! Monte Carlo pricing of European options under the Heston model.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloPricer
//! ├── MonteCarloConfig   (trials, dt, scheme, seed, discounting)
//! ├── CancellationToken  (checked once per trial)
//! └── per trial
//!     ├── TrialStreams        (variance + independent streams)
//!     ├── simulate_terminal() (N applications of the stepper)
//!     └── PriceableContract::evaluate_at()
//! ```
//!
//! # Examples
//!
//! ## Reference scenario
//!
//! ```rust
//! use pricer_models::instruments::{OptionContract, PayoffType};
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
//!
//! let call = OptionContract::from_scalars(
//!     1.0, 0.08, 0.03, 2.0, 0.1, 0.2, 0.5, 2.0, 1.0, PayoffType::Call,
//! ).unwrap();
//!
//! let config = MonteCarloConfig::builder()
//!     .n_trials(1000)
//!     .time_step(1e-3)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let result = MonteCarloPricer::new(config).unwrap().price(&call).unwrap();
//!
//! assert!(result.price > 0.1 && result.price < 0.3);
//! ```

mod cancel;
mod config;
mod error;
mod paths;
mod pricer;

pub use cancel::CancellationToken;
pub use config::{
    Discounting, MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_TIME_STEP, DEFAULT_TRIALS,
    MAX_TRIALS,
};
pub use error::ConfigError;
pub use paths::{simulate_terminal, step_count};
pub use pricer::{price, MonteCarloPricer, PricingResult};
