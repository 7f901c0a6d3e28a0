//! Compare command implementation
//!
//! Prices one European vanilla with the closed form, the CRR lattice and
//! Monte Carlo side by side.

use clap::Args;
use pricer_models::instruments::{ContractSpec, PayoffKind};
use pricer_pricing::compare::{compare_models, ComparisonSettings, ModelComparison};
use serde::Serialize;

use super::implied_vol::OptionTypeArg;
use super::MarketArgs;
use crate::config::CliConfig;
use crate::output;
use crate::Result;

/// Arguments of `pricer compare`
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Call or put
    #[arg(long, value_enum)]
    pub option_type: OptionTypeArg,

    /// Strike
    #[arg(long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(long)]
    pub expiry: f64,

    #[command(flatten)]
    pub market: MarketArgs,
}

/// Output of `pricer compare`
#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub binomial_steps: usize,
    pub simulations: usize,
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub comparison: ModelComparison,
    pub monte_carlo_z_score: Option<f64>,
}

/// Run the comparison; no printing
pub fn evaluate(args: &CompareArgs, config: &CliConfig) -> Result<CompareReport> {
    let payoff = match args.option_type {
        OptionTypeArg::Call => PayoffKind::Call,
        OptionTypeArg::Put => PayoffKind::Put,
    };
    let contract = ContractSpec::new(payoff, args.strike, args.expiry)?;
    let market = args.market.resolve(config.market.as_ref())?;
    let settings = ComparisonSettings {
        binomial_steps: config.binomial_steps,
        monte_carlo: config.monte_carlo()?,
    };

    let comparison = compare_models(&contract, &market, &settings)?;
    Ok(CompareReport {
        binomial_steps: settings.binomial_steps,
        simulations: settings.monte_carlo.simulations(),
        seed: settings.monte_carlo.seed(),
        monte_carlo_z_score: comparison.monte_carlo_z_score(),
        comparison,
    })
}

fn table(report: &CompareReport) -> String {
    let mut text = report.comparison.to_string();
    if let Some(se) = report.comparison.monte_carlo.std_error {
        text.push_str(&format!("\n\nmonte-carlo std error {:.6}", se));
    }
    if let Some(z) = report.monte_carlo_z_score {
        text.push_str(&format!(" (z = {:.2})", z));
    }
    text.push_str(&format!(
        "\nbinomial steps {}, simulations {}",
        report.binomial_steps, report.simulations
    ));
    text
}

/// Run the compare command
pub fn run(args: &CompareArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args, config)?;
    output::emit(config.output_format, &report, table)
}
