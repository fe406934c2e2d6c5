use anyhow::Result;

use crate::config::EngineConfig;
use crate::engine::iv::{solve_implied_volatility, ImpliedVolInput};
use crate::engine::pricing::{price, years_from_days};
use crate::engine::types::BlackScholesInput;
use crate::server::{ImpliedVolParams, PriceParams};

use super::response_types::{ImpliedVolResponse, PriceResponse};

/// Years to expiry from whichever of the two fields was given.
fn years(time_to_expiry: Option<f64>, days_to_expiry: Option<i64>) -> f64 {
    time_to_expiry.unwrap_or_else(|| years_from_days(days_to_expiry.unwrap_or(0)))
}

pub fn execute(params: &PriceParams, config: &EngineConfig) -> Result<PriceResponse> {
    let time_to_expiry = years(params.time_to_expiry, params.days_to_expiry);
    let input = BlackScholesInput {
        spot: params.spot,
        strike: params.strike,
        time_to_expiry,
        volatility: params.volatility,
        risk_free_rate: params
            .risk_free_rate
            .unwrap_or(config.pricing.risk_free_rate),
        dividend_yield: params
            .dividend_yield
            .unwrap_or(config.pricing.dividend_yield),
        option_type: params.option_type,
    };
    let result = price(&input)?;

    let summary = if time_to_expiry <= 0.0 {
        format!(
            "Expired {} {:.2}: intrinsic value {:.4}.",
            input.option_type.as_str(),
            input.strike,
            result.price
        )
    } else {
        format!(
            "{} {:.2} with {:.4}y to expiry: {:.4} (delta {:.3}, theta {:.4}/day).",
            input.option_type.as_str(),
            input.strike,
            time_to_expiry,
            result.price,
            result.greeks.delta,
            result.greeks.theta,
        )
    };

    Ok(PriceResponse {
        summary,
        time_to_expiry,
        result,
    })
}

pub fn execute_implied_vol(
    params: &ImpliedVolParams,
    config: &EngineConfig,
) -> Result<ImpliedVolResponse> {
    let input = ImpliedVolInput {
        market_price: params.market_price,
        spot: params.spot,
        strike: params.strike,
        time_to_expiry: years(params.time_to_expiry, params.days_to_expiry),
        risk_free_rate: params
            .risk_free_rate
            .unwrap_or(config.pricing.risk_free_rate),
        dividend_yield: params
            .dividend_yield
            .unwrap_or(config.pricing.dividend_yield),
        option_type: params.option_type,
    };

    // Non-convergence is a normal answer, not a tool error
    Ok(match solve_implied_volatility(&input, &config.iv) {
        Ok(solution) => ImpliedVolResponse {
            summary: format!(
                "Implied volatility {:.2}% after {} iteration(s).",
                solution.volatility * 100.0,
                solution.iterations
            ),
            implied_volatility: Some(solution.volatility),
            iterations: Some(solution.iterations),
            failure: None,
        },
        Err(failure) => {
            tracing::debug!(strike = input.strike, "implied volatility undefined: {failure}");
            ImpliedVolResponse {
                summary: "Implied volatility is undefined for this quote.".to_string(),
                implied_volatility: None,
                iterations: None,
                failure: Some(failure.to_string()),
            }
        }
    })
}
