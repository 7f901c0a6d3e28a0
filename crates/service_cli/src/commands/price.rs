//! Price command implementation
//!
//! Values one contract with the closed form, the CRR lattice or Monte Carlo.
//! With `--smile` the volatility comes from an SVI fit to the quoted smile
//! instead of the flat market volatility.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use pricer_core::market_data::StaticMarketData;
use pricer_core::traits::calibration::CalibrationConfig;
use pricer_models::analytical::Greeks;
use pricer_models::engine::{BinomialEngine, ClosedFormEngine, PricingEngine};
use pricer_models::instruments::{ContractSpec, ExerciseStyle, PayoffKind, Position};
use pricer_models::volatility::{select_volatility, VolatilitySource};
use pricer_pricing::mc::MonteCarloEngine;
use serde::Serialize;
use tracing::info;

use super::{read_smile, MarketArgs};
use crate::config::CliConfig;
use crate::output::{self, key_values, or_na};
use crate::{CliError, Result};

const SMILE_TICKER: &str = "CLI";

/// Payoff flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Call,
    Put,
    DigitalCall,
    DigitalPut,
    RangeAccrual,
    AsianCall,
    AsianPut,
}

/// Exercise flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StyleArg {
    #[default]
    European,
    American,
}

/// Pricing method flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MethodArg {
    #[default]
    ClosedForm,
    Binomial,
    MonteCarlo,
}

/// Arguments of `pricer price`
#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// Payoff kind
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Strike (not used by range accruals)
    #[arg(long)]
    pub strike: Option<f64>,

    /// Time to expiry in years
    #[arg(long)]
    pub expiry: f64,

    /// Exercise style
    #[arg(long, value_enum, default_value_t = StyleArg::European)]
    pub style: StyleArg,

    /// Digital payout or range accrual coupon
    #[arg(long, default_value_t = 1.0)]
    pub amount: f64,

    /// Lower barrier of a range accrual
    #[arg(long)]
    pub lower: Option<f64>,

    /// Upper barrier of a range accrual
    #[arg(long)]
    pub upper: Option<f64>,

    /// Value a short position
    #[arg(long)]
    pub short: bool,

    /// Pricing method
    #[arg(long, value_enum, default_value_t = MethodArg::ClosedForm)]
    pub method: MethodArg,

    /// CSV of `strike,implied_vol` quotes at this expiry; enables SVI volatility
    #[arg(long)]
    pub smile: Option<PathBuf>,

    #[command(flatten)]
    pub market: MarketArgs,
}

/// Output of `pricer price`
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub method: &'static str,
    pub payoff: &'static str,
    pub exercise: String,
    pub position: String,
    pub strike: f64,
    pub expiry: f64,
    pub volatility: f64,
    pub volatility_source: &'static str,
    pub price: f64,
    pub std_error: Option<f64>,
    pub greeks: Option<Greeks<f64>>,
}

impl PriceArgs {
    /// Contract described by the flags
    pub fn contract(&self) -> Result<ContractSpec> {
        let contract = match self.kind {
            KindArg::RangeAccrual => {
                let (lower, upper) = self.lower.zip(self.upper).ok_or_else(|| {
                    CliError::InvalidArgument("range accruals need --lower and --upper".into())
                })?;
                ContractSpec::range_accrual(lower, upper, self.expiry, self.amount)?
            }
            kind => {
                let strike = self.strike.ok_or_else(|| {
                    CliError::InvalidArgument("--strike is required".to_string())
                })?;
                let payoff = match kind {
                    KindArg::Call => PayoffKind::Call,
                    KindArg::Put => PayoffKind::Put,
                    KindArg::DigitalCall => PayoffKind::DigitalCall,
                    KindArg::DigitalPut => PayoffKind::DigitalPut,
                    KindArg::AsianCall => PayoffKind::AsianCall,
                    _ => PayoffKind::AsianPut,
                };
                ContractSpec::new(payoff, strike, self.expiry)?.with_amount(self.amount)?
            }
        };
        let exercise = match self.style {
            StyleArg::European => ExerciseStyle::European,
            StyleArg::American => ExerciseStyle::American,
        };
        let position = if self.short {
            Position::Short
        } else {
            Position::Long
        };
        Ok(contract.with_exercise(exercise).with_position(position))
    }
}

/// Value the contract; no printing
pub fn evaluate(args: &PriceArgs, config: &CliConfig) -> Result<PriceReport> {
    let contract = args.contract()?;
    let market = args.market.resolve(config.market.as_ref())?;

    let source = match &args.smile {
        Some(path) => {
            let provider = StaticMarketData::new()
                .with_observation(SMILE_TICKER, market)
                .with_smile(SMILE_TICKER, read_smile(path, args.expiry)?);
            select_volatility(
                &provider,
                SMILE_TICKER,
                args.expiry,
                &CalibrationConfig::default(),
            )?
        }
        None => VolatilitySource::Flat(market.volatility()),
    };
    let market = source.apply(&market, contract.strike())?;

    let mut engine: Box<dyn PricingEngine> = match args.method {
        MethodArg::ClosedForm => Box::new(ClosedFormEngine),
        MethodArg::Binomial => Box::new(BinomialEngine::new(config.binomial_steps)?),
        MethodArg::MonteCarlo => Box::new(MonteCarloEngine::new(config.monte_carlo()?)?),
    };
    info!(
        method = engine.name(),
        payoff = contract.payoff().name(),
        "pricing contract"
    );
    let valuation = engine.price(&contract, &market)?;

    Ok(PriceReport {
        method: engine.name(),
        payoff: contract.payoff().name(),
        exercise: contract.exercise().to_string(),
        position: contract.position().to_string(),
        strike: contract.strike(),
        expiry: contract.expiry(),
        volatility: market.volatility(),
        volatility_source: if source.is_smile() { "svi" } else { "flat" },
        price: valuation.price,
        std_error: valuation.std_error,
        greeks: valuation.greeks,
    })
}

fn table(report: &PriceReport) -> String {
    let mut rows = vec![
        ("method", report.method.to_string()),
        ("payoff", report.payoff.to_string()),
        ("exercise", report.exercise.clone()),
        ("position", report.position.clone()),
        ("strike", format!("{:.4}", report.strike)),
        ("expiry", format!("{:.4}", report.expiry)),
        (
            "volatility",
            format!("{:.4} ({})", report.volatility, report.volatility_source),
        ),
        ("price", format!("{:.6}", report.price)),
    ];
    if report.std_error.is_some() {
        rows.push(("std error", or_na(report.std_error, 6)));
    }
    if let Some(g) = &report.greeks {
        rows.push(("delta", format!("{:.6}", g.delta)));
        rows.push(("gamma", format!("{:.6}", g.gamma)));
        rows.push(("theta/day", format!("{:.6}", g.theta)));
        rows.push(("vega/1%", format!("{:.6}", g.vega)));
        rows.push(("rho/1%", format!("{:.6}", g.rho)));
    }
    key_values(&rows)
}

/// Run the price command
pub fn run(args: &PriceArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args, config)?;
    output::emit(config.output_format, &report, table)
}
