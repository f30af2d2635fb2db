//! Financial instrument definitions.
//!
//! - [`PayoffType`]: call/put intrinsic payoff
//! - [`ContractPayoff`]: payoff attached to a contract, including `Unpriced`
//! - [`OptionContract`]: Heston parameters plus a payoff
//!
//! # Examples
//!
//! ```
//! use pricer_core::traits::PriceableContract;
//! use pricer_models::instruments::{OptionContract, PayoffType};
//!
//! let put = OptionContract::from_scalars(
//!     1.0, 0.08, 0.03, 2.0, 0.1, 0.2, 0.5, 2.0, 1.1, PayoffType::Put,
//! ).unwrap();
//! assert!((put.evaluate_at(1.0) - 0.1).abs() < 1e-12);
//! ```

pub mod contract;
pub mod payoff;

pub use contract::{ContractError, ContractPayoff, OptionContract};
pub use payoff::PayoffType;
