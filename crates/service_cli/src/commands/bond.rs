//! Bond command implementation
//!
//! `price`, `ytm` and `accrued` for fixed-coupon bullet bonds, plus the
//! whole-year zero-coupon formula.

use clap::{Args, Subcommand};
use pricer_core::types::{Date, DayCountConvention};
use pricer_models::bonds::{
    accrued_interest, dirty_price, zero_coupon_price, CouponBond, CouponFrequency,
};
use serde::Serialize;

use crate::config::CliConfig;
use crate::output::{self, key_values};
use crate::{CliError, Result};

/// Bond subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum BondCommand {
    /// Price a coupon bond at a flat yield
    Price {
        #[command(flatten)]
        terms: BondTerms,

        /// Annual yield to maturity
        #[arg(long)]
        ytm: f64,
    },

    /// Solve the yield that reproduces a price
    Ytm {
        #[command(flatten)]
        terms: BondTerms,

        /// Observed bond price
        #[arg(long)]
        price: f64,
    },

    /// Accrued interest and dirty price between coupon dates
    Accrued {
        /// Face value
        #[arg(long, default_value_t = 100.0)]
        face: f64,

        /// Annual coupon rate
        #[arg(long)]
        coupon: f64,

        /// Last coupon date (YYYY-MM-DD)
        #[arg(long)]
        last_coupon: String,

        /// Settlement date (YYYY-MM-DD)
        #[arg(long)]
        settlement: String,

        /// Day count convention (30/360, ACT/360, ACT/365, ACT/ACT)
        #[arg(long, default_value = "30/360")]
        day_count: String,

        /// Clean price; adds the dirty price to the output
        #[arg(long)]
        clean_price: Option<f64>,
    },

    /// Zero-coupon bond with annual compounding
    Zero {
        /// Face value
        #[arg(long, default_value_t = 100.0)]
        face: f64,

        /// Annual rate
        #[arg(long)]
        rate: f64,

        /// Years to maturity
        #[arg(long)]
        years: f64,
    },
}

/// Bond terms shared by `price` and `ytm`
#[derive(Args, Debug, Clone)]
pub struct BondTerms {
    /// Face value
    #[arg(long, default_value_t = 100.0)]
    pub face: f64,

    /// Annual coupon rate
    #[arg(long)]
    pub coupon: f64,

    /// Years to maturity
    #[arg(long)]
    pub years: f64,

    /// Coupon frequency (annual, semi-annual, quarterly, monthly)
    #[arg(long, default_value = "semi-annual")]
    pub frequency: String,
}

impl BondTerms {
    fn bond(&self) -> Result<CouponBond> {
        let frequency: CouponFrequency = self.frequency.parse().map_err(CliError::InvalidArgument)?;
        Ok(CouponBond::new(self.face, self.coupon, self.years, frequency)?)
    }
}

/// Output of `pricer bond`
#[derive(Debug, Clone, Default, Serialize)]
pub struct BondReport {
    pub measure: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ytm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrued: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirty_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_count: Option<String>,
}

/// Evaluate a bond subcommand; no printing
pub fn evaluate(command: &BondCommand) -> Result<BondReport> {
    let report = match command {
        BondCommand::Price { terms, ytm } => BondReport {
            measure: "price",
            price: Some(terms.bond()?.price(*ytm)),
            ytm: Some(*ytm),
            ..Default::default()
        },
        BondCommand::Ytm { terms, price } => BondReport {
            measure: "ytm",
            price: Some(*price),
            ytm: Some(terms.bond()?.yield_to_maturity(*price)?),
            ..Default::default()
        },
        BondCommand::Accrued {
            face,
            coupon,
            last_coupon,
            settlement,
            day_count,
            clean_price,
        } => {
            let day_count: DayCountConvention = day_count.parse()?;
            let accrued = accrued_interest(
                *face,
                *coupon,
                Date::parse(last_coupon)?,
                Date::parse(settlement)?,
                day_count,
            )?;
            BondReport {
                measure: "accrued",
                price: *clean_price,
                accrued: Some(accrued),
                dirty_price: clean_price.map(|clean| dirty_price(clean, accrued)),
                day_count: Some(day_count.to_string()),
                ..Default::default()
            }
        }
        BondCommand::Zero { face, rate, years } => BondReport {
            measure: "zero",
            price: Some(zero_coupon_price(*face, *rate, *years)),
            ytm: Some(*rate),
            ..Default::default()
        },
    };
    Ok(report)
}

fn table(report: &BondReport) -> String {
    let mut rows = Vec::new();
    if let Some(day_count) = &report.day_count {
        rows.push(("day count", day_count.clone()));
    }
    if let Some(price) = report.price {
        rows.push(("price", format!("{:.6}", price)));
    }
    if let Some(ytm) = report.ytm {
        rows.push(("ytm", format!("{:.6}%", ytm * 100.0)));
    }
    if let Some(accrued) = report.accrued {
        rows.push(("accrued", format!("{:.6}", accrued)));
    }
    if let Some(dirty) = report.dirty_price {
        rows.push(("dirty price", format!("{:.6}", dirty)));
    }
    key_values(&rows)
}

/// Run the bond command
pub fn run(command: &BondCommand, config: &CliConfig) -> Result<()> {
    let report = evaluate(command)?;
    output::emit(config.output_format, &report, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn terms() -> BondTerms {
        BondTerms {
            face: 1000.0,
            coupon: 0.05,
            years: 10.0,
            frequency: "semi-annual".to_string(),
        }
    }

    #[test]
    fn test_par_bond() {
        let report = evaluate(&BondCommand::Price {
            terms: terms(),
            ytm: 0.05,
        })
        .unwrap();
        assert_relative_eq!(report.price.unwrap(), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ytm_round_trips_price() {
        let report = evaluate(&BondCommand::Ytm {
            terms: terms(),
            price: 950.0,
        })
        .unwrap();
        let ytm = report.ytm.unwrap();
        assert!(ytm > 0.05);
        let repriced = terms().bond().unwrap().price(ytm);
        assert_relative_eq!(repriced, 950.0, epsilon = 1e-6);
    }

    #[test]
    fn test_accrued_with_dirty_price() {
        let report = evaluate(&BondCommand::Accrued {
            face: 1000.0,
            coupon: 0.06,
            last_coupon: "2024-01-15".to_string(),
            settlement: "2024-04-15".to_string(),
            day_count: "30/360".to_string(),
            clean_price: Some(990.0),
        })
        .unwrap();
        assert_relative_eq!(report.accrued.unwrap(), 15.0, epsilon = 1e-12);
        assert_relative_eq!(report.dirty_price.unwrap(), 1005.0, epsilon = 1e-12);
        assert_eq!(report.day_count.as_deref(), Some("30/360"));
    }

    #[test]
    fn test_bad_inputs() {
        let mut t = terms();
        t.frequency = "fortnightly".to_string();
        let err = evaluate(&BondCommand::Price {
            terms: t,
            ytm: 0.05,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));

        let err = evaluate(&BondCommand::Accrued {
            face: 100.0,
            coupon: 0.05,
            last_coupon: "2024-13-40".to_string(),
            settlement: "2024-04-15".to_string(),
            day_count: "ACT/360".to_string(),
            clean_price: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Date(_)));
    }

    #[test]
    fn test_zero_coupon() {
        let report = evaluate(&BondCommand::Zero {
            face: 100.0,
            rate: 0.05,
            years: 2.0,
        })
        .unwrap();
        assert_relative_eq!(
            report.price.unwrap(),
            100.0 / 1.05_f64.powi(2),
            epsilon = 1e-12
        );
    }
}
