use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::engine::exits::{entry_cost_dollars, exit_levels};
use crate::engine::metrics::risk_reward_ratio;
use crate::engine::position::days_to_expiration;
use crate::engine::recognition::primary_expiration;
use crate::engine::simulator::{simulate, simulate_time_slices};
use crate::engine::types::SimulationParams;
use crate::server::SimulateParams;

use super::format::simulation_summary;
use super::response_types::SimulateResponse;

/// Request values first, config defaults for whatever was left out.
fn simulation_params(params: &SimulateParams, config: &EngineConfig) -> SimulationParams {
    SimulationParams {
        spot: params.spot,
        volatility: params.volatility,
        risk_free_rate: params
            .risk_free_rate
            .unwrap_or(config.pricing.risk_free_rate),
        dividend_yield: params
            .dividend_yield
            .unwrap_or(config.pricing.dividend_yield),
        price_range: params
            .price_range
            .unwrap_or(config.simulation.price_range),
        num_points: params.num_points.unwrap_or(config.simulation.num_points),
        days_forward: params.days_forward,
        multiplier: params.multiplier.unwrap_or(config.pricing.multiplier),
    }
}

pub fn execute(
    params: &SimulateParams,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<SimulateResponse> {
    let sim_params = simulation_params(params, config);

    let dte = match params.dte {
        Some(dte) => dte,
        None => {
            let expiration =
                primary_expiration(&params.legs).context("Cannot derive DTE without legs")?;
            days_to_expiration(expiration, now)
        }
    };

    let result = simulate(&params.legs, params.entry_cost_basis, dte, &sim_params)?;
    let time_slices = simulate_time_slices(
        &params.legs,
        params.entry_cost_basis,
        dte,
        &sim_params,
        &params.time_slices,
    )?;

    let exit_levels = params
        .exit_rules
        .as_ref()
        .map(|rules| {
            let entry_cost = entry_cost_dollars(params.entry_cost_basis, sim_params.multiplier);
            exit_levels(&result, entry_cost, rules)
        })
        .transpose()?;

    let risk_reward_ratio = if result.profit_unbounded || result.loss_unbounded {
        None
    } else {
        risk_reward_ratio(result.max_profit, result.max_loss)
    };

    Ok(SimulateResponse {
        summary: simulation_summary(&result),
        dte,
        risk_reward_ratio,
        time_slices,
        exit_levels,
        result,
    })
}
