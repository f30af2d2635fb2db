//! Demo command: the reference pricing run.
//!
//! Prices two instruments built on the same reference parameters
//! (S0=1, V0=0.08, mu=0.03, kappa=2, theta=0.1, xi=0.2, rho=0.5, T=2):
//!
//! - an instrument with no payoff attached, which is worth exactly 0
//! - an at-the-money call (K=1)
//!
//! # Expected Output
//!
//! ```text
//! Unpriced instrument: 0
//! Reference call (K=1): 0.19...
//! ```

use tracing::info;

use pricer_models::instruments::OptionContract;
use pricer_models::models::heston::HestonParams;

use super::price::evaluate;
use crate::config::EngineSettings;
use crate::Result;

/// Strike of the reference call.
pub const REFERENCE_STRIKE: f64 = 1.0;

/// Value of the unpriced instrument and of the reference call
pub fn reference_values(engine: &EngineSettings) -> Result<(f64, f64)> {
    let params = HestonParams::default();

    let unpriced = OptionContract::unpriced(params)?;
    let call = OptionContract::call(params, REFERENCE_STRIKE)?;

    let unpriced_value = evaluate(&unpriced, engine, false)?.result.price;
    let call_value = evaluate(&call, engine, false)?.result.price;
    Ok((unpriced_value, call_value))
}

/// Runs the reference demonstration.
pub fn run(engine: &EngineSettings) -> Result<()> {
    info!(scheme = %engine.scheme, trials = engine.trials, dt = engine.dt, "Running reference demo");
    let (unpriced, call) = reference_values(engine)?;
    println!("Unpriced instrument: {}", unpriced);
    println!("Reference call (K={}): {}", REFERENCE_STRIKE, call);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let engine = EngineSettings {
            dt: 1e-3,
            seed: Some(42),
            ..EngineSettings::default()
        };
        let (unpriced, call) = reference_values(&engine).unwrap();
        assert_eq!(unpriced, 0.0);
        assert!((0.1..=0.3).contains(&call), "call = {call}");
    }
}
