//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Shared market flags and
//! input file readers live here.

pub mod bond;
pub mod calibrate;
pub mod compare;
pub mod implied_vol;
pub mod price;
pub mod rates;
pub mod vol;

use std::path::Path;

use clap::Args;
use pricer_core::market_data::{MarketObservation, VolQuote, VolSmile};
use serde::Deserialize;

use crate::config::MarketDefaults;
use crate::{CliError, Result};

/// Market inputs; any flag left out is taken from `[market]` in the
/// configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Spot price S0
    #[arg(long)]
    pub spot: Option<f64>,

    /// Annualised volatility
    #[arg(long)]
    pub vol: Option<f64>,

    /// Continuous dividend (carry) yield
    #[arg(long)]
    pub dividend_yield: Option<f64>,

    /// Continuously compounded risk-free rate
    #[arg(long)]
    pub rate: Option<f64>,
}

impl MarketArgs {
    fn field(flag: Option<f64>, default: Option<f64>, name: &str) -> Result<f64> {
        flag.or(default).ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "--{} is required (or set it under [market] in the config file)",
                name
            ))
        })
    }

    /// Spot, dividend yield and rate, without requiring a volatility.
    pub fn carry(&self, defaults: Option<&MarketDefaults>) -> Result<(f64, f64, f64)> {
        let spot = Self::field(self.spot, defaults.and_then(|d| d.spot), "spot")?;
        let rate = Self::field(self.rate, defaults.and_then(|d| d.rate), "rate")?;
        let dividend_yield = self
            .dividend_yield
            .or(defaults.map(|d| d.dividend_yield))
            .unwrap_or(0.0);
        Ok((spot, dividend_yield, rate))
    }

    /// Full validated market observation.
    pub fn resolve(&self, defaults: Option<&MarketDefaults>) -> Result<MarketObservation> {
        let (spot, dividend_yield, rate) = self.carry(defaults)?;
        let vol = Self::field(self.vol, defaults.and_then(|d| d.volatility), "vol")?;
        Ok(MarketObservation::new(spot, vol, dividend_yield, rate)?)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    strike: f64,
    implied_vol: f64,
}

fn open_csv(path: &Path, has_headers: bool) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file))
}

fn parse_error(path: &Path, message: impl ToString) -> CliError {
    CliError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Read `strike,implied_vol` quotes into a smile at `expiry`.
pub fn read_smile(path: &Path, expiry: f64) -> Result<VolSmile> {
    let mut reader = open_csv(path, true)?;
    let mut quotes = Vec::new();
    for row in reader.deserialize::<QuoteRow>() {
        let row = row.map_err(|e| parse_error(path, e))?;
        quotes.push(VolQuote::new(row.strike, row.implied_vol));
    }
    Ok(VolSmile::new(expiry, quotes)?)
}

/// Read closing prices: the last numeric field of every row. Rows whose
/// last field is not a number (headers) are skipped.
pub fn read_closes(path: &Path) -> Result<Vec<f64>> {
    let mut reader = open_csv(path, false)?;
    let mut closes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, e))?;
        if let Some(value) = record.iter().last().and_then(|f| f.parse::<f64>().ok()) {
            closes.push(value);
        }
    }
    if closes.is_empty() {
        return Err(parse_error(path, "no numeric prices found"));
    }
    Ok(closes)
}


#[cfg(test)]
mod tests {
    use super::testing::temp_file;
    use super::*;

    #[test]
    fn test_market_flags_override_defaults() {
        let defaults = MarketDefaults {
            spot: Some(90.0),
            volatility: Some(0.3),
            dividend_yield: 0.01,
            rate: Some(0.02),
        };
        let args = MarketArgs {
            spot: Some(100.0),
            ..Default::default()
        };
        let market = args.resolve(Some(&defaults)).unwrap();
        assert_eq!(market.spot(), 100.0);
        assert_eq!(market.volatility(), 0.3);
        assert_eq!(market.dividend_yield(), 0.01);
    }

    #[test]
    fn test_missing_spot_is_reported() {
        let err = MarketArgs::default().resolve(None).unwrap_err();
        assert!(err.to_string().contains("--spot"));
    }

    #[test]
    fn test_read_smile() {
        let path = temp_file(
            "smile.csv",
            "strike,implied_vol\n110, 0.21\n90,0.25\n100,0.22\n",
        );
        let smile = read_smile(&path, 0.5).unwrap();
        assert_eq!(smile.strikes(), vec![90.0, 100.0, 110.0]);
        assert_eq!(smile.expiry(), 0.5);
    }

    #[test]
    fn test_read_smile_rejects_bad_row() {
        let path = temp_file("bad-smile.csv", "strike,implied_vol\n100,abc\n");
        assert!(matches!(read_smile(&path, 1.0), Err(CliError::Parse { .. })));
    }

    #[test]
    fn test_read_closes_skips_header() {
        let path = temp_file(
            "closes.csv",
            "date,close\n2024-01-02,100\n2024-01-03,101.5\n",
        );
        assert_eq!(read_closes(&path).unwrap(), vec![100.0, 101.5]);

        let plain = temp_file("closes.txt", "100\n99\n");
        assert_eq!(read_closes(&plain).unwrap(), vec![100.0, 99.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_closes(Path::new("/nonexistent/closes.csv")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
