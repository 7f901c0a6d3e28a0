//! Rates command implementation
//!
//! Prices zero-coupon bonds, bond options, caplets and floorlets on a
//! multiplicative short-rate tree.

use clap::{Args, ValueEnum};
use pricer_models::lattice::{ShortRateTree, TriangularLattice};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{self, key_values};
use crate::{CliError, Result};

/// Rate instrument flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstrumentArg {
    Zcb,
    BondOption,
    Caplet,
    Floorlet,
}

impl InstrumentArg {
    fn name(self) -> &'static str {
        match self {
            InstrumentArg::Zcb => "zero-coupon bond",
            InstrumentArg::BondOption => "bond option",
            InstrumentArg::Caplet => "caplet",
            InstrumentArg::Floorlet => "floorlet",
        }
    }
}

/// Arguments of `pricer rates`
#[derive(Args, Debug, Clone)]
pub struct RatesArgs {
    /// Instrument to price
    #[arg(long, value_enum)]
    pub instrument: InstrumentArg,

    /// Initial one-period rate
    #[arg(long)]
    pub r0: f64,

    /// Up-move multiplier
    #[arg(long)]
    pub up: f64,

    /// Down-move multiplier
    #[arg(long)]
    pub down: f64,

    /// Periods in the tree; also the bond maturity
    #[arg(long)]
    pub steps: usize,

    /// Bond face value
    #[arg(long, default_value_t = 100.0)]
    pub face: f64,

    /// Option strike (bond price or rate)
    #[arg(long)]
    pub strike: Option<f64>,

    /// Option expiry in periods
    #[arg(long)]
    pub expiry_step: Option<usize>,

    /// Caplet/floorlet notional
    #[arg(long, default_value_t = 1.0)]
    pub notional: f64,

    /// Print the rate and value lattices
    #[arg(long)]
    pub show_lattice: bool,
}

/// Output of `pricer rates`
#[derive(Debug, Clone, Serialize)]
pub struct RatesReport {
    pub instrument: &'static str,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_lattice: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_lattice: Option<Vec<Vec<f64>>>,
}

impl RatesArgs {
    fn option_terms(&self) -> Result<(f64, usize)> {
        let strike = self.strike.ok_or_else(|| {
            CliError::InvalidArgument(format!("{} needs --strike", self.instrument.name()))
        })?;
        let expiry = self.expiry_step.ok_or_else(|| {
            CliError::InvalidArgument(format!("{} needs --expiry-step", self.instrument.name()))
        })?;
        Ok((strike, expiry))
    }
}

fn layers(lattice: &TriangularLattice<f64>) -> Vec<Vec<f64>> {
    lattice.layers().map(<[f64]>::to_vec).collect()
}

/// Build the tree and price the instrument; no printing
pub fn evaluate(args: &RatesArgs) -> Result<RatesReport> {
    let tree = ShortRateTree::new(args.r0, args.up, args.down, args.steps)?;
    info!(
        instrument = args.instrument.name(),
        steps = args.steps,
        "pricing on short-rate tree"
    );

    let values = match args.instrument {
        InstrumentArg::Zcb => tree.zero_coupon_bond(args.face, args.steps)?,
        InstrumentArg::BondOption => {
            let (strike, expiry) = args.option_terms()?;
            let bond = tree.zero_coupon_bond(args.face, args.steps)?;
            tree.bond_option(&bond, strike, expiry)?
        }
        InstrumentArg::Caplet => {
            let (strike, expiry) = args.option_terms()?;
            tree.caplet(strike, expiry, args.notional)?
        }
        InstrumentArg::Floorlet => {
            let (strike, expiry) = args.option_terms()?;
            tree.floorlet(strike, expiry, args.notional)?
        }
    };

    Ok(RatesReport {
        instrument: args.instrument.name(),
        price: values.root(),
        rate_lattice: args.show_lattice.then(|| layers(tree.rates())),
        value_lattice: args.show_lattice.then(|| layers(&values)),
    })
}

fn format_lattice(title: &str, lattice: &[Vec<f64>]) -> String {
    let mut text = format!("\n\n{}", title);
    for (step, layer) in lattice.iter().enumerate() {
        let row: Vec<String> = layer.iter().map(|v| format!("{:.6}", v)).collect();
        text.push_str(&format!("\n{:>4}: {}", step, row.join("  ")));
    }
    text
}

fn table(report: &RatesReport) -> String {
    let mut text = key_values(&[
        ("instrument", report.instrument.to_string()),
        ("price", format!("{:.6}", report.price)),
    ]);
    if let Some(rates) = &report.rate_lattice {
        text.push_str(&format_lattice("short rates", rates));
    }
    if let Some(values) = &report.value_lattice {
        text.push_str(&format_lattice("values", values));
    }
    text
}

/// Run the rates command
pub fn run(args: &RatesArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args)?;
    output::emit(config.output_format, &report, table)
}
