//! Price command implementation
//!
//! Prices one option contract with the pricer_pricing engine and prints the
//! estimate as a table or as JSON.

use serde::Serialize;
use tracing::info;

use pricer_core::math::statistics::SampleStatistics;
use pricer_models::instruments::{ContractPayoff, OptionContract};
use pricer_models::models::heston::HestonParams;
use pricer_pricing::mc::{MonteCarloPricer, PricingResult};
use pricer_pricing::rng::entropy_seed;

use crate::config::{EngineSettings, OutputFormat};
use crate::Result;

/// Distribution of simulated terminal prices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl TerminalStats {
    fn from_prices(prices: &[f64]) -> Self {
        let stats = SampleStatistics::from_samples(prices);
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev(),
            min,
            max,
        }
    }
}

/// Everything printed for one priced contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub params: HestonParams,
    pub payoff: ContractPayoff,
    pub result: PricingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalStats>,
}

/// Price `contract`, optionally sampling terminal-price statistics
///
/// When statistics are requested without a configured seed, one seed is
/// drawn up front so the price and the statistics come from the same paths.
pub fn evaluate(
    contract: &OptionContract,
    engine: &EngineSettings,
    with_stats: bool,
) -> Result<PriceReport> {
    let seed = match engine.seed {
        Some(seed) => Some(seed),
        None if with_stats => Some(entropy_seed()),
        None => None,
    };
    let pricer = MonteCarloPricer::new(engine.to_mc_config(seed)?)?;

    let result = pricer.price(contract)?;
    let terminal = if with_stats {
        let prices = pricer.simulate_terminal_prices(contract.params())?;
        Some(TerminalStats::from_prices(&prices))
    } else {
        None
    };

    Ok(PriceReport {
        params: *contract.params(),
        payoff: contract.payoff(),
        result,
        terminal,
    })
}

/// Render a report in the requested format
pub fn render(report: &PriceReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => Ok(render_table(report)),
    }
}

fn payoff_label(payoff: &ContractPayoff) -> String {
    match payoff {
        ContractPayoff::Unpriced => "unpriced".to_string(),
        ContractPayoff::Call { strike } => format!("call K={}", strike),
        ContractPayoff::Put { strike } => format!("put K={}", strike),
    }
}

fn render_table(report: &PriceReport) -> String {
    let r = &report.result;
    let seed = r
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut rows = vec![
        ("Contract", payoff_label(&report.payoff)),
        ("Scheme", r.scheme.to_string()),
        ("Trials", r.n_trials.to_string()),
        ("Steps", r.n_steps.to_string()),
        ("Seed", seed),
        ("Price", format!("{:.6}", r.price)),
        ("Std error", format!("{:.6}", r.std_error)),
        ("95% CI", format!("+/- {:.6}", r.confidence_95())),
    ];
    if r.discount_factor != 1.0 {
        rows.push(("Discount factor", format!("{:.6}", r.discount_factor)));
    }
    if let Some(t) = &report.terminal {
        rows.push(("S_T mean", format!("{:.6}", t.mean)));
        rows.push(("S_T std dev", format!("{:.6}", t.std_dev)));
        rows.push(("S_T min / max", format!("{:.6} / {:.6}", t.min, t.max)));
    }

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{:<16} {}\n", label, value));
    }
    out
}

/// Run the price command
pub fn run(
    contract: &OptionContract,
    engine: &EngineSettings,
    format: OutputFormat,
    with_stats: bool,
) -> Result<()> {
    info!(scheme = %engine.scheme, trials = engine.trials, "Starting pricing...");
    let report = evaluate(contract, engine, with_stats)?;
    print!("{}", render(&report, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    info!("Pricing complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fast_engine() -> EngineSettings {
        EngineSettings {
            trials: 400,
            dt: 0.02,
            seed: Some(11),
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_evaluate_call() {
        let call = OptionContract::call(HestonParams::default(), 1.0).unwrap();
        let report = evaluate(&call, &fast_engine(), false).unwrap();
        assert!(report.result.price > 0.0);
        assert_eq!(report.result.n_trials, 400);
        assert_eq!(report.result.seed, Some(11));
        assert!(report.terminal.is_none());
    }

    #[test]
    fn test_stats_share_paths_with_price() {
        let engine = EngineSettings {
            seed: None,
            ..fast_engine()
        };
        let call = OptionContract::call(HestonParams::default(), 1.0).unwrap();
        let put = OptionContract::put(HestonParams::default(), 1.0).unwrap();

        let call_report = evaluate(&call, &engine, true).unwrap();
        let seed = call_report.result.seed.unwrap();
        let pinned = EngineSettings {
            seed: Some(seed),
            ..engine
        };
        let put_report = evaluate(&put, &pinned, false).unwrap();
        let terminal = call_report.terminal.unwrap();

        assert_eq!(terminal.count, 400);
        assert!(terminal.min <= terminal.mean && terminal.mean <= terminal.max);
        assert_relative_eq!(
            call_report.result.price - put_report.result.price,
            terminal.mean - 1.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_unpriced_report() {
        let u = OptionContract::unpriced(HestonParams::default()).unwrap();
        let report = evaluate(&u, &fast_engine(), false).unwrap();
        assert_eq!(report.result.price, 0.0);
        let table = render(&report, OutputFormat::Table).unwrap();
        assert!(table.contains("unpriced"));
    }

    #[test]
    fn test_json_rendering() {
        let call = OptionContract::call(HestonParams::default(), 1.0).unwrap();
        let report = evaluate(&call, &fast_engine(), true).unwrap();
        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payoff"]["kind"], "call");
        assert_eq!(value["result"]["n_trials"], 400);
        assert_eq!(value["params"]["kappa"], 2.0);
        assert!(value["terminal"]["mean"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_table_lists_discount_factor_only_when_discounting() {
        let call = OptionContract::call(HestonParams::default(), 1.0).unwrap();
        let plain = render(&evaluate(&call, &fast_engine(), false).unwrap(), OutputFormat::Table).unwrap();
        assert!(!plain.contains("Discount factor"));

        let engine = EngineSettings {
            discount_rate: Some(0.03),
            ..fast_engine()
        };
        let discounted = render(&evaluate(&call, &engine, false).unwrap(), OutputFormat::Table).unwrap();
        assert!(discounted.contains("Discount factor"));
    }
}
