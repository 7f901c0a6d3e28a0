//! Historical volatility command implementation

use std::path::PathBuf;

use clap::Args;
use pricer_core::math::statistics::historical_volatility;
use serde::Serialize;
use tracing::debug;

use super::read_closes;
use crate::config::CliConfig;
use crate::output::{self, key_values};
use crate::Result;

/// Arguments of `pricer vol`
#[derive(Args, Debug, Clone)]
pub struct VolArgs {
    /// CSV or text file of daily closes; the last column of each row is used
    #[arg(long)]
    pub closes: PathBuf,
}

/// Output of `pricer vol`
#[derive(Debug, Clone, Serialize)]
pub struct VolReport {
    pub observations: usize,
    pub annualised_vol: f64,
}

/// Annualised volatility of the closes; no printing
pub fn evaluate(args: &VolArgs) -> Result<VolReport> {
    let closes = read_closes(&args.closes)?;
    debug!(observations = closes.len(), "closes loaded");
    Ok(VolReport {
        observations: closes.len(),
        annualised_vol: historical_volatility(&closes)?,
    })
}

fn table(report: &VolReport) -> String {
    key_values(&[
        ("observations", report.observations.to_string()),
        ("annualised vol", format!("{:.6}", report.annualised_vol)),
    ])
}

/// Run the vol command
pub fn run(args: &VolArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args)?;
    output::emit(config.output_format, &report, table)
}
