//! Implied volatility via Newton-Raphson on the Black-Scholes price.
//!
//! Failure to converge is a normal market outcome (stale or crossed quotes,
//! prices outside no-arbitrage bounds), so the public entry point returns
//! `Option<f64>` rather than an error.

use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pricing::price_unchecked;
use super::types::{finite, positive_finite, BlackScholesInput, OptionType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IvFailure {
    /// Raw vega fell below the floor: the price surface is flat in volatility.
    #[error("vega {vega:.3e} below floor at volatility {volatility:.4} after {iterations} iterations")]
    FlatVega {
        iterations: u32,
        volatility: f64,
        vega: f64,
    },

    #[error("no convergence after {iterations} iterations (last error: {last_error:.6})")]
    MaxIterations { iterations: u32, last_error: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn default_initial_guess() -> f64 {
    0.3
}

fn default_max_iterations() -> u32 {
    100
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_min_vol() -> f64 {
    0.001
}

fn default_max_vol() -> f64 {
    5.0
}

fn default_min_vega() -> f64 {
    1e-5
}

fn validate_max_vol_gt_min(min_vol: &f64) -> impl FnOnce(&f64, &()) -> garde::Result + '_ {
    move |max_vol: &f64, (): &()| {
        if !max_vol.is_finite() || max_vol <= min_vol {
            return Err(garde::Error::new(format!(
                "max_vol ({max_vol}) must be greater than min_vol ({min_vol})"
            )));
        }
        Ok(())
    }
}

/// Solver settings. `tolerance` is an absolute price error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct IvSolverConfig {
    #[serde(default = "default_initial_guess")]
    #[garde(custom(positive_finite))]
    pub initial_guess: f64,
    #[serde(default = "default_max_iterations")]
    #[garde(range(min = 1))]
    pub max_iterations: u32,
    #[serde(default = "default_tolerance")]
    #[garde(custom(positive_finite))]
    pub tolerance: f64,
    #[serde(default = "default_min_vol")]
    #[garde(custom(positive_finite))]
    pub min_vol: f64,
    #[serde(default = "default_max_vol")]
    #[garde(custom(validate_max_vol_gt_min(&self.min_vol)))]
    pub max_vol: f64,
    #[serde(default = "default_min_vega")]
    #[garde(custom(positive_finite))]
    pub min_vega: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: default_initial_guess(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            min_vol: default_min_vol(),
            max_vol: default_max_vol(),
            min_vega: default_min_vega(),
        }
    }
}

/// An observed option price plus the market inputs needed to invert it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ImpliedVolInput {
    #[garde(custom(positive_finite))]
    pub market_price: f64,
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub strike: f64,
    #[garde(custom(finite))]
    pub time_to_expiry: f64,
    #[garde(custom(finite))]
    pub risk_free_rate: f64,
    #[serde(default)]
    #[garde(custom(finite))]
    pub dividend_yield: f64,
    #[serde(alias = "right")]
    #[garde(skip)]
    pub option_type: OptionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IvSolution {
    pub volatility: f64,
    pub iterations: u32,
}

/// Implied volatility for a quote, or `None` when it is undefined.
pub fn implied_volatility(input: &ImpliedVolInput, config: &IvSolverConfig) -> Option<f64> {
    match solve_implied_volatility(input, config) {
        Ok(solution) => Some(solution.volatility),
        Err(failure) => {
            tracing::debug!(
                strike = input.strike,
                market_price = input.market_price,
                "implied volatility undefined: {failure}"
            );
            None
        }
    }
}

/// Newton-Raphson with the failure reason exposed.
pub fn solve_implied_volatility(
    input: &ImpliedVolInput,
    config: &IvSolverConfig,
) -> Result<IvSolution, IvFailure> {
    input
        .validate()
        .map_err(|report| IvFailure::InvalidInput(report.to_string()))?;

    let mut bs = BlackScholesInput {
        spot: input.spot,
        strike: input.strike,
        time_to_expiry: input.time_to_expiry,
        volatility: config.initial_guess,
        risk_free_rate: input.risk_free_rate,
        dividend_yield: input.dividend_yield,
        option_type: input.option_type,
    };

    let mut last_error = f64::NAN;
    for iteration in 0..config.max_iterations {
        let result = price_unchecked(&bs);
        let diff = result.price - input.market_price;
        last_error = diff;

        if diff.abs() < config.tolerance {
            return Ok(IvSolution {
                volatility: bs.volatility,
                iterations: iteration,
            });
        }

        // Reported vega is per 1%; the Newton step needs dPrice/dSigma
        let vega_raw = result.greeks.vega * 100.0;
        if vega_raw < config.min_vega {
            return Err(IvFailure::FlatVega {
                iterations: iteration,
                volatility: bs.volatility,
                vega: vega_raw,
            });
        }

        bs.volatility = (bs.volatility - diff / vega_raw).clamp(config.min_vol, config.max_vol);
    }

    Err(IvFailure::MaxIterations {
        iterations: config.max_iterations,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pricing::price;

    fn quote(option_type: OptionType, strike: f64, vol: f64, time: f64) -> ImpliedVolInput {
        let bs = BlackScholesInput {
            spot: 100.0,
            strike,
            time_to_expiry: time,
            volatility: vol,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type,
        };
        ImpliedVolInput {
            market_price: price(&bs).unwrap().price,
            spot: 100.0,
            strike,
            time_to_expiry: time,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type,
        }
    }

    #[test]
    fn recovers_atm_call_vol() {
        let q = quote(OptionType::Call, 100.0, 0.25, 0.5);
        let iv = implied_volatility(&q, &IvSolverConfig::default()).unwrap();
        assert!((iv - 0.25).abs() < 1e-4);
    }

    #[test]
    fn recovers_otm_put_vol_with_dividend() {
        let mut q = quote(OptionType::Put, 90.0, 0.30, 0.25);
        q.dividend_yield = 0.01;
        let bs = BlackScholesInput {
            spot: 100.0,
            strike: 90.0,
            time_to_expiry: 0.25,
            volatility: 0.30,
            risk_free_rate: 0.05,
            dividend_yield: 0.01,
            option_type: OptionType::Put,
        };
        q.market_price = price(&bs).unwrap().price;
        let iv = implied_volatility(&q, &IvSolverConfig::default()).unwrap();
        assert!((iv - 0.30).abs() < 1e-3);
    }

    #[test]
    fn initial_guess_converges_immediately() {
        let q = quote(OptionType::Call, 105.0, 0.3, 1.0);
        let sol = solve_implied_volatility(&q, &IvSolverConfig::default()).unwrap();
        assert_eq!(sol.iterations, 0);
        assert!((sol.volatility - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn recovers_high_vol() {
        let q = quote(OptionType::Call, 100.0, 1.5, 0.5);
        let iv = implied_volatility(&q, &IvSolverConfig::default()).unwrap();
        assert!((iv - 1.5).abs() < 1e-3);
    }

    #[test]
    fn price_above_spot_exhausts_iterations() {
        let mut q = quote(OptionType::Call, 100.0, 0.25, 0.5);
        q.market_price = 150.0;
        let err = solve_implied_volatility(&q, &IvSolverConfig::default()).unwrap_err();
        assert!(matches!(err, IvFailure::MaxIterations { iterations: 100, .. }));
        assert!(implied_volatility(&q, &IvSolverConfig::default()).is_none());
    }

    #[test]
    fn deep_otm_short_dated_has_flat_vega() {
        let q = ImpliedVolInput {
            market_price: 5.0,
            spot: 100.0,
            strike: 300.0,
            time_to_expiry: 0.01,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type: OptionType::Call,
        };
        let err = solve_implied_volatility(&q, &IvSolverConfig::default()).unwrap_err();
        assert!(matches!(err, IvFailure::FlatVega { iterations: 0, .. }));
    }

    #[test]
    fn expired_option_has_no_implied_vol() {
        let q = ImpliedVolInput {
            market_price: 2.0,
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 0.0,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type: OptionType::Put,
        };
        assert!(implied_volatility(&q, &IvSolverConfig::default()).is_none());
    }

    #[test]
    fn invalid_quote_is_reported() {
        let mut q = quote(OptionType::Call, 100.0, 0.25, 0.5);
        q.spot = -1.0;
        let err = solve_implied_volatility(&q, &IvSolverConfig::default()).unwrap_err();
        assert!(matches!(err, IvFailure::InvalidInput(_)));
    }

    #[test]
    fn iterates_stay_within_clamp() {
        let config = IvSolverConfig {
            max_vol: 0.5,
            ..IvSolverConfig::default()
        };
        // True vol 1.2 is outside the clamp, so the solver cannot reach it
        let q = quote(OptionType::Call, 100.0, 1.2, 0.5);
        assert!(implied_volatility(&q, &config).is_none());
    }

    #[test]
    fn config_rejects_inverted_bounds() {
        let config = IvSolverConfig {
            min_vol: 2.0,
            max_vol: 1.0,
            ..IvSolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
