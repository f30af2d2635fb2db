//! hestonmc - Command Line Heston Monte Carlo Pricer
//!
//! # Commands
//!
//! - `hestonmc price --spot .. --strike .. --kind call` - Price one European option
//! - `hestonmc demo` - Price the reference scenario
//!
//! # Configuration
//!
//! Engine knobs come from built-in defaults, then a TOML file (`--config`),
//! then `HESTONMC_*` environment variables, then flags. Logs go to stderr;
//! `RUST_LOG`, when set, overrides `--log-level`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricer_models::instruments::{ContractPayoff, OptionContract};
use pricer_models::models::heston::HestonParams;
use pricer_models::models::schemes::SchemeKind;

mod commands;
mod config;
mod error;

use config::{build_settings, EngineOverrides, LogLevel, OutputFormat};
pub use error::{CliError, Result};

/// Heston stochastic-volatility Monte Carlo pricer
#[derive(Parser)]
#[command(name = "hestonmc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HESTONMC_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option under the Heston model
    Price(PriceArgs),

    /// Price the reference scenario (unpriced instrument and ATM call)
    Demo {
        #[command(flatten)]
        engine: EngineArgs,
    },
}

/// Payoff kind on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ContractKind {
    Call,
    Put,
    Unpriced,
}

#[derive(Args)]
struct PriceArgs {
    /// Initial asset price S0
    #[arg(long)]
    spot: f64,

    /// Initial variance V0
    #[arg(long)]
    v0: f64,

    /// Drift mu
    #[arg(long, allow_negative_numbers = true)]
    mu: f64,

    /// Mean-reversion speed kappa
    #[arg(long)]
    kappa: f64,

    /// Long-run variance theta
    #[arg(long)]
    theta: f64,

    /// Volatility of variance xi
    #[arg(long)]
    xi: f64,

    /// Correlation rho in [-1, 1]
    #[arg(long, allow_negative_numbers = true)]
    rho: f64,

    /// Time to maturity in years
    #[arg(long)]
    maturity: f64,

    /// Strike (required for call and put)
    #[arg(long)]
    strike: Option<f64>,

    /// Payoff kind
    #[arg(long, value_enum, default_value_t = ContractKind::Call)]
    kind: ContractKind,

    /// Output format (table, json)
    #[arg(short, long, env = "HESTONMC_FORMAT")]
    format: Option<OutputFormat>,

    /// Also report statistics of the simulated terminal prices
    #[arg(long)]
    stats: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct EngineArgs {
    /// Discretisation scheme (qe, milstein)
    #[arg(long, env = "HESTONMC_SCHEME")]
    scheme: Option<SchemeKind>,

    /// Number of Monte Carlo trials
    #[arg(short = 'n', long, env = "HESTONMC_TRIALS")]
    trials: Option<usize>,

    /// Time increment in years
    #[arg(long, env = "HESTONMC_DT")]
    dt: Option<f64>,

    /// QE branch switching threshold
    #[arg(long, env = "HESTONMC_PSI_C")]
    psi_c: Option<f64>,

    /// QE weight on the pre-step variance
    #[arg(long, env = "HESTONMC_GAMMA1")]
    gamma1: Option<f64>,

    /// QE weight on the post-step variance
    #[arg(long, env = "HESTONMC_GAMMA2")]
    gamma2: Option<f64>,

    /// Base seed (drawn from entropy when absent)
    #[arg(long, env = "HESTONMC_SEED")]
    seed: Option<u64>,

    /// Apply exp(-r T) discounting with this rate
    #[arg(long, env = "HESTONMC_DISCOUNT_RATE", allow_negative_numbers = true)]
    discount_rate: Option<f64>,

    /// Run trials on a single thread
    #[arg(long, env = "HESTONMC_SEQUENTIAL")]
    sequential: bool,
}

impl From<&EngineArgs> for EngineOverrides {
    fn from(args: &EngineArgs) -> Self {
        EngineOverrides {
            trials: args.trials,
            dt: args.dt,
            scheme: args.scheme,
            psi_c: args.psi_c,
            gamma1: args.gamma1,
            gamma2: args.gamma2,
            seed: args.seed,
            discount_rate: args.discount_rate,
            sequential: args.sequential,
        }
    }
}

impl PriceArgs {
    fn contract(&self) -> Result<OptionContract> {
        let params = HestonParams::new(
            self.spot,
            self.v0,
            self.mu,
            self.kappa,
            self.theta,
            self.xi,
            self.rho,
            self.maturity,
        )
        .map_err(pricer_models::instruments::ContractError::from)?;

        let payoff = match (self.kind, self.strike) {
            (ContractKind::Unpriced, _) => ContractPayoff::Unpriced,
            (ContractKind::Call, Some(strike)) => ContractPayoff::Call { strike },
            (ContractKind::Put, Some(strike)) => ContractPayoff::Put { strike },
            (kind, None) => {
                return Err(CliError::InvalidArgument(format!(
                    "--strike is required for --kind {:?}",
                    kind
                )
                .to_lowercase()))
            }
        };
        Ok(OptionContract::new(params, payoff)?)
    }
}

fn init_tracing(log_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Price(args) => {
            let settings = build_settings(
                cli.config.as_deref(),
                cli.log_level,
                args.format,
                &EngineOverrides::from(&args.engine),
            )?;
            init_tracing(settings.log_level);
            debug!(?settings, "Settings resolved");

            let contract = args.contract()?;
            commands::price::run(&contract, &settings.engine, settings.format, args.stats)
        }
        Commands::Demo { engine } => {
            let settings = build_settings(
                cli.config.as_deref(),
                cli.log_level,
                None,
                &EngineOverrides::from(&engine),
            )?;
            init_tracing(settings.log_level);
            debug!(?settings, "Settings resolved");

            commands::demo::run(&settings.engine)
        }
    }
}
