//! Implied volatility command implementation

use clap::{Args, ValueEnum};
use pricer_models::analytical::implied_volatility;
use pricer_models::instruments::OptionType;
use serde::Serialize;
use tracing::warn;

use super::MarketArgs;
use crate::config::CliConfig;
use crate::output::{self, key_values, or_na};
use crate::Result;

/// Option type flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionTypeArg {
    Call,
    Put,
}

impl From<OptionTypeArg> for OptionType {
    fn from(arg: OptionTypeArg) -> Self {
        match arg {
            OptionTypeArg::Call => OptionType::Call,
            OptionTypeArg::Put => OptionType::Put,
        }
    }
}

/// Arguments of `pricer implied-vol`
#[derive(Args, Debug, Clone)]
pub struct ImpliedVolArgs {
    /// Observed option premium
    #[arg(long)]
    pub price: f64,

    /// Strike
    #[arg(long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(long)]
    pub expiry: f64,

    /// Call or put
    #[arg(long, value_enum)]
    pub option_type: OptionTypeArg,

    #[command(flatten)]
    pub market: MarketArgs,
}

/// Output of `pricer implied-vol`; `implied_vol` is absent when no
/// volatility reproduces the price.
#[derive(Debug, Clone, Serialize)]
pub struct ImpliedVolReport {
    pub option_type: String,
    pub price: f64,
    pub strike: f64,
    pub expiry: f64,
    pub implied_vol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Solve for the volatility; no printing
pub fn evaluate(args: &ImpliedVolArgs, config: &CliConfig) -> Result<ImpliedVolReport> {
    let (spot, dividend_yield, rate) = args.market.carry(config.market.as_ref())?;
    let option_type = OptionType::from(args.option_type);

    let (implied_vol, reason) = match implied_volatility(
        args.price,
        spot,
        args.strike,
        args.expiry,
        rate,
        dividend_yield,
        option_type,
    ) {
        Ok(vol) => (Some(vol), None),
        Err(err) if err.is_numerical_degeneracy() => {
            warn!(%err, "implied volatility unavailable");
            (None, Some(err.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ImpliedVolReport {
        option_type: option_type.to_string(),
        price: args.price,
        strike: args.strike,
        expiry: args.expiry,
        implied_vol,
        reason,
    })
}

fn table(report: &ImpliedVolReport) -> String {
    let mut rows = vec![
        ("option", report.option_type.clone()),
        ("price", format!("{:.6}", report.price)),
        ("strike", format!("{:.4}", report.strike)),
        ("expiry", format!("{:.4}", report.expiry)),
        ("implied vol", or_na(report.implied_vol, 6)),
    ];
    if let Some(reason) = &report.reason {
        rows.push(("reason", reason.clone()));
    }
    key_values(&rows)
}

/// Run the implied-vol command
pub fn run(args: &ImpliedVolArgs, config: &CliConfig) -> Result<()> {
    let report = evaluate(args, config)?;
    output::emit(config.output_format, &report, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use approx::assert_relative_eq;

    fn args(price: f64) -> ImpliedVolArgs {
        ImpliedVolArgs {
            price,
            strike: 100.0,
            expiry: 1.0,
            option_type: OptionTypeArg::Call,
            market: MarketArgs {
                spot: Some(100.0),
                vol: None,
                dividend_yield: None,
                rate: Some(0.05),
            },
        }
    }

    #[test]
    fn test_recovers_atm_volatility() {
        let report = evaluate(&args(10.450583572185565), &CliConfig::default()).unwrap();
        assert_relative_eq!(report.implied_vol.unwrap(), 0.2, epsilon = 1e-8);
        assert!(report.reason.is_none());
    }

    #[test]
    fn test_arbitrage_price_is_na() {
        let report = evaluate(&args(150.0), &CliConfig::default()).unwrap();
        assert!(report.implied_vol.is_none());
        assert!(table(&report).contains("N/A"));
    }

    #[test]
    fn test_bad_expiry_is_error() {
        let mut a = args(10.0);
        a.expiry = 0.0;
        let err = evaluate(&a, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Pricing(e) if e.is_invalid_input()));
    }
}
