//! Option contracts priced under the Heston model.
//!
//! An [`OptionContract`] bundles validated [`HestonParams`] with a
//! [`ContractPayoff`]. The payoff is a tagged variant: `Unpriced` names an
//! instrument that has model parameters but no payoff attached, and it
//! evaluates to exactly zero rather than failing.

use pricer_core::traits::priceable::PriceableContract;
use pricer_core::types::PricingError;
use thiserror::Error;

use super::payoff::PayoffType;
use crate::models::heston::{HestonError, HestonParams};

/// Contract construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// Model parameters rejected.
    #[error(transparent)]
    Model(#[from] HestonError),

    /// Strike must be positive and finite.
    #[error("Invalid strike: K = {0} (must be positive)")]
    InvalidStrike(f64),
}

impl From<HestonError> for PricingError {
    fn from(err: HestonError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

impl From<ContractError> for PricingError {
    fn from(err: ContractError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Payoff attached to a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum ContractPayoff {
    /// No payoff: the contract is always worth zero.
    Unpriced,
    /// European call with the given strike.
    Call {
        /// Strike price.
        strike: f64,
    },
    /// European put with the given strike.
    Put {
        /// Strike price.
        strike: f64,
    },
}

impl ContractPayoff {
    /// Builds a priced variant from a [`PayoffType`] and strike.
    pub fn vanilla(payoff_type: PayoffType, strike: f64) -> Self {
        match payoff_type {
            PayoffType::Call => ContractPayoff::Call { strike },
            PayoffType::Put => ContractPayoff::Put { strike },
        }
    }

    /// Strike, if the variant carries one.
    pub fn strike(&self) -> Option<f64> {
        match self {
            ContractPayoff::Unpriced => None,
            ContractPayoff::Call { strike } | ContractPayoff::Put { strike } => Some(*strike),
        }
    }

    /// Payoff type, if the variant carries one.
    pub fn payoff_type(&self) -> Option<PayoffType> {
        match self {
            ContractPayoff::Unpriced => None,
            ContractPayoff::Call { .. } => Some(PayoffType::Call),
            ContractPayoff::Put { .. } => Some(PayoffType::Put),
        }
    }

    fn validate(&self) -> Result<(), ContractError> {
        match self.strike() {
            Some(k) if !(k > 0.0 && k.is_finite()) => Err(ContractError::InvalidStrike(k)),
            _ => Ok(()),
        }
    }
}

impl PriceableContract<f64> for ContractPayoff {
    #[inline]
    fn evaluate_at(&self, terminal_price: f64) -> f64 {
        match *self {
            ContractPayoff::Unpriced => 0.0,
            ContractPayoff::Call { strike } => PayoffType::Call.evaluate(terminal_price, strike),
            ContractPayoff::Put { strike } => PayoffType::Put.evaluate(terminal_price, strike),
        }
    }

    #[inline]
    fn has_payoff(&self) -> bool {
        !matches!(self, ContractPayoff::Unpriced)
    }
}

/// A European option on a Heston-driven underlying.
///
/// Constructed once per pricing request and never mutated.
///
/// # Examples
///
/// ```
/// use pricer_models::instruments::OptionContract;
/// use pricer_models::models::heston::HestonParams;
///
/// let params = HestonParams::default();
/// let call = OptionContract::call(params, 1.0).unwrap();
/// assert_eq!(call.strike(), Some(1.0));
///
/// let bad = OptionContract::put(params, -1.0);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    params: HestonParams,
    payoff: ContractPayoff,
}

impl OptionContract {
    /// Creates a contract from model parameters and a payoff.
    ///
    /// # Errors
    ///
    /// [`ContractError::Model`] if `params` fail validation,
    /// [`ContractError::InvalidStrike`] for a non-positive strike.
    pub fn new(params: HestonParams, payoff: ContractPayoff) -> Result<Self, ContractError> {
        params.validate()?;
        payoff.validate()?;
        Ok(Self { params, payoff })
    }

    /// European call.
    pub fn call(params: HestonParams, strike: f64) -> Result<Self, ContractError> {
        Self::new(params, ContractPayoff::Call { strike })
    }

    /// European put.
    pub fn put(params: HestonParams, strike: f64) -> Result<Self, ContractError> {
        Self::new(params, ContractPayoff::Put { strike })
    }

    /// Instrument with model parameters but no payoff.
    pub fn unpriced(params: HestonParams) -> Result<Self, ContractError> {
        Self::new(params, ContractPayoff::Unpriced)
    }

    /// Creates a contract directly from the ten scalar inputs.
    ///
    /// Argument order: S0, V0, mu, kappa, theta, xi, rho, T, K, payoff type.
    #[allow(clippy::too_many_arguments)]
    pub fn from_scalars(
        spot: f64,
        v0: f64,
        mu: f64,
        kappa: f64,
        theta: f64,
        xi: f64,
        rho: f64,
        maturity: f64,
        strike: f64,
        payoff_type: PayoffType,
    ) -> Result<Self, ContractError> {
        let params = HestonParams::new(spot, v0, mu, kappa, theta, xi, rho, maturity)?;
        Self::new(params, ContractPayoff::vanilla(payoff_type, strike))
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Payoff variant.
    #[inline]
    pub fn payoff(&self) -> ContractPayoff {
        self.payoff
    }

    /// Strike, if priced.
    #[inline]
    pub fn strike(&self) -> Option<f64> {
        self.payoff.strike()
    }

    /// Time to maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.params.maturity
    }

    /// Returns a copy with a different payoff, keeping the model parameters.
    pub fn with_payoff(&self, payoff: ContractPayoff) -> Result<Self, ContractError> {
        Self::new(self.params, payoff)
    }
}

impl PriceableContract<f64> for OptionContract {
    #[inline]
    fn evaluate_at(&self, terminal_price: f64) -> f64 {
        self.payoff.evaluate_at(terminal_price)
    }

    #[inline]
    fn has_payoff(&self) -> bool {
        self.payoff.has_payoff()
    }
}
