//! Calibrate command implementation
//!
//! Fits SVI or SABR to a smile read from a `strike,implied_vol` CSV.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use pricer_core::market_data::VolSmile;
use pricer_core::traits::calibration::{CalibrationConfig, CalibrationResult};
use pricer_models::calibration::{fit_sabr, fit_svi};
use serde::Serialize;
use tracing::info;

use super::read_smile;
use crate::config::CliConfig;
use crate::output::{self, key_values};
use crate::Result;

/// Smile model flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    Svi,
    Sabr,
}

/// Arguments of `pricer calibrate`
#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    /// Smile model
    #[arg(long, value_enum)]
    pub model: ModelArg,

    /// Forward price of the underlying
    #[arg(long)]
    pub forward: f64,

    /// CSV with `strike,implied_vol` columns
    #[arg(long)]
    pub quotes: PathBuf,

    /// Expiry of the quotes in years
    #[arg(long, default_value_t = 1.0)]
    pub expiry: f64,

    /// Optimiser iterations per starting point
    #[arg(long, default_value_t = 500)]
    pub max_iterations: usize,

    /// Residual norm tolerance
    #[arg(long, default_value_t = 1e-10)]
    pub tolerance: f64,
}

/// One quote against the fitted model
#[derive(Debug, Clone, Serialize)]
pub struct QuoteFit {
    pub strike: f64,
    pub market_vol: f64,
    pub model_vol: f64,
}

/// Output of `pricer calibrate`
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationReport {
    pub model: &'static str,
    pub forward: f64,
    pub expiry: f64,
    pub params: Vec<(&'static str, f64)>,
    pub iterations: usize,
    pub rmse: f64,
    pub fit: Vec<QuoteFit>,
}

fn build_report<P>(
    model: &'static str,
    args: &CalibrateArgs,
    smile: &VolSmile,
    result: &CalibrationResult<P>,
    params: Vec<(&'static str, f64)>,
) -> CalibrationReport {
    let fit = smile
        .quotes()
        .iter()
        .zip(&result.residuals)
        .map(|(quote, residual)| QuoteFit {
            strike: quote.strike,
            market_vol: quote.implied_vol,
            model_vol: quote.implied_vol + residual,
        })
        .collect();
    CalibrationReport {
        model,
        forward: args.forward,
        expiry: smile.expiry(),
        params,
        iterations: result.iterations,
        rmse: result.rmse(),
        fit,
    }
}

/// Fit the smile; no printing
pub fn evaluate(args: &CalibrateArgs) -> Result<CalibrationReport> {
    let smile = read_smile(&args.quotes, args.expiry)?;
    let config = CalibrationConfig::new(args.tolerance, args.max_iterations);
    info!(model = ?args.model, quotes = smile.len(), "calibrating smile");

    let report = match args.model {
        ModelArg::Svi => {
            let result = fit_svi(args.forward, &smile, &config)?;
            let p = result.params;
            let params = vec![
                ("a", p.a),
                ("b", p.b),
                ("rho", p.rho),
                ("m", p.m),
                ("sigma", p.sigma),
            ];
            build_report("svi", args, &smile, &result, params)
        }
        ModelArg::Sabr => {
            let result = fit_sabr(args.forward, &smile, &config)?;
            let p = result.params;
            let params = vec![
                ("alpha", p.alpha),
                ("beta", p.beta),
                ("rho", p.rho),
                ("nu", p.nu),
            ];
            build_report("sabr", args, &smile, &result, params)
        }
    };
    info!(
        rmse = report.rmse,
        iterations = report.iterations,
        "calibration converged"
    );
    Ok(report)
}

fn table(report: &CalibrationReport) -> String {
    let mut rows = vec![
        ("model", report.model.to_string()),
        ("forward", format!("{:.4}", report.forward)),
        ("expiry", format!("{:.4}", report.expiry)),
    ];
    rows.extend(
        report
            .params
            .iter()
            .map(|(name, value)| (*name, format!("{:.6}", value))),
    );
    rows.push(("iterations", report.iterations.to_string()));
    rows.push(("rmse", format!("{:.3e}", report.rmse)));

    let mut text = key_values(&rows);
    text.push_str(&format!(
        "\n\n{:>10}  {:>10}  {:>10}  {:>10}",
        "strike", "market", "model", "error"
    ));
    for q in &report.fit {
        text.push_str(&format!(
            "\n{:>10.4}  {:>10.6}  {:>10.6}  {:>10.2e}",
            q.strike,
            q.market_vol,
            q.model_vol,
            q.model_vol - q.market_vol
        ));
    }
    text
}

/// Run the calibrate command
pub fn run(args: &CalibrateArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args)?;
    output::emit(config.output_format, &report, table)
}
