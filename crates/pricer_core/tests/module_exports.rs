//! Integration tests for module exports.
//!
//! Verify that all public modules and types are reachable via absolute paths.

#[test]
fn test_types_module_exports() {
    use pricer_core::types::error::{DateError, PricingError, SolverError};
    use pricer_core::types::time::{Date, DayCountConvention};

    let date = Date::from_ymd(2024, 2, 29).unwrap();
    assert!(date.is_leap_year());
    assert_eq!(DayCountConvention::default(), DayCountConvention::Thirty360);

    let err: PricingError = SolverError::NoBracket { a: 0.0, b: 1.0 }.into();
    assert!(err.is_numerical_degeneracy());
    let err: PricingError = DateError::ParseError("x".into()).into();
    assert!(err.is_invalid_input());
}

#[test]
fn test_solver_module_exports() {
    use pricer_core::math::solvers::{
        BrentSolver, LMConfig, LevenbergMarquardtSolver, NewtonRaphsonSolver, SolverConfig,
    };

    let brent = BrentSolver::new(SolverConfig::<f64>::default());
    assert!(brent.find_root(|x| x - 0.5, 0.0, 1.0).is_ok());

    let newton = NewtonRaphsonSolver::<f64>::with_defaults();
    assert!(newton.find_root_numeric(|x| x - 0.5, 0.0).is_ok());

    let lm = LevenbergMarquardtSolver::new(LMConfig::new(1e-10, 50));
    assert!(lm.solve(|p: &[f64]| vec![p[0] - 1.0], vec![0.0]).is_ok());
}

#[test]
fn test_market_data_exports() {
    use pricer_core::market_data::{
        MarketDataProvider, MarketObservation, StaticMarketData, TreasuryTenor, VolQuote,
        VolSmile,
    };

    let smile = VolSmile::new(1.0, vec![VolQuote::new(100.0, 0.2)]).unwrap();
    let provider = StaticMarketData::new()
        .with_observation("X", MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap())
        .with_smile("X", smile)
        .with_treasury_rate(TreasuryTenor::M3, 0.05);

    assert!(provider.observation("X").is_ok());
    assert!(provider.smile("X", 1.0).is_ok());
    assert!(provider.treasury_rate(0.25).is_ok());
}

#[test]
fn test_traits_and_statistics_exports() {
    use pricer_core::math::statistics::historical_volatility;
    use pricer_core::traits::{CalibrationConfig, ParameterBounds};

    assert_eq!(CalibrationConfig::default().max_iterations, 500);
    assert!(ParameterBounds::unit_interval().contains(0.5));
    assert!(historical_volatility(&[100.0, 101.0, 100.5]).unwrap() > 0.0);
}
