//! `pricer` - command-line front end for the pricing workspace
//!
//! # Commands
//!
//! - `pricer price` - Value a European, American, digital, range accrual
//!   or Asian contract by closed form, CRR lattice or Monte Carlo
//! - `pricer implied-vol` - Black-Scholes-Merton implied volatility
//! - `pricer calibrate` - Fit SVI or SABR to a smile CSV
//! - `pricer rates` - Short-rate tree bonds, bond options, caplets, floorlets
//! - `pricer bond` - Coupon bond price, yield and accrued interest
//! - `pricer compare` - Closed form vs lattice vs Monte Carlo
//! - `pricer vol` - Historical volatility of a close series
//!
//! Settings are layered: command-line flags, then `PRICER_*` environment
//! variables, then `pricer.toml` (or the file given with `--config`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::bond::BondCommand;
use commands::calibrate::CalibrateArgs;
use commands::compare::CompareArgs;
use commands::implied_vol::ImpliedVolArgs;
use commands::price::PriceArgs;
use commands::rates::RatesArgs;
use commands::vol::VolArgs;
use config::{build_config, CliConfig, CliOverrides, LogLevel, OutputFormat};

/// Option pricing, calibration and rate lattices
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path [default: pricer.toml if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Log level (overrides --verbose)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// CRR lattice steps
    #[arg(long, global = true)]
    binomial_steps: Option<usize>,

    /// Monte Carlo paths
    #[arg(long, global = true)]
    simulations: Option<usize>,

    /// Monte Carlo time steps per path
    #[arg(long, global = true)]
    mc_steps: Option<usize>,

    /// Monte Carlo seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an option contract
    Price(PriceArgs),

    /// Implied volatility from an option price
    ImpliedVol(ImpliedVolArgs),

    /// Calibrate a smile model to quoted volatilities
    Calibrate(CalibrateArgs),

    /// Price on a binomial short-rate tree
    Rates(RatesArgs),

    /// Coupon bond analytics
    Bond {
        #[command(subcommand)]
        command: BondCommand,
    },

    /// Compare closed form, lattice and Monte Carlo prices
    Compare(CompareArgs),

    /// Historical volatility from closing prices
    Vol(VolArgs),
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: self.log_level,
            verbose: self.verbose,
            output_format: self.format,
            binomial_steps: self.binomial_steps,
            mc_simulations: self.simulations,
            mc_steps: self.mc_steps,
            mc_seed: self.seed,
        }
    }
}

fn init_tracing(config: &CliConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn dispatch(command: &Commands, config: &CliConfig) -> Result<()> {
    match command {
        Commands::Price(args) => commands::price::run(args, config),
        Commands::ImpliedVol(args) => commands::implied_vol::run(args, config),
        Commands::Calibrate(args) => commands::calibrate::run(args, config),
        Commands::Rates(args) => commands::rates::run(args, config),
        Commands::Bond { command } => commands::bond::run(command, config),
        Commands::Compare(args) => commands::compare::run(args, config),
        Commands::Vol(args) => commands::vol::run(args, config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(
        cli.config.as_deref(),
        |key| std::env::var(key).ok(),
        &cli.overrides(),
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    debug!(?config, "configuration loaded");

    match dispatch(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
