//! Position valuation across a spot grid.
//!
//! Each grid point is priced independently (in parallel); the curve keeps
//! ascending price order, and breakevens/extrema come from a sequential scan
//! afterwards.

use garde::Validate;
use rayon::prelude::*;

use super::metrics;
use super::pricing::{price_unchecked, years_from_days};
use super::recognition::primary_expiration;
use super::types::{
    BlackScholesInput, CurvePoint, Greeks, Leg, OptionType, Position, SimulationParams,
    SimulationResult,
};
use crate::error::{EngineError, EngineResult};

/// One leg's pricing inputs with spot left open.
struct LegModel {
    template: BlackScholesInput,
    quantity: f64,
}

/// Value `legs` across the grid in `params`.
///
/// `entry_cost_basis` is the signed premium per unit of underlying (debit
/// positive); `dte` counts days to the primary (earliest) expiration. Each leg
/// is priced with `T = max(dte + offset - days_forward, 0) / 365`, where
/// `offset` is the leg's distance in days from the primary expiration.
pub fn simulate(
    legs: &[Leg],
    entry_cost_basis: f64,
    dte: i64,
    params: &SimulationParams,
) -> EngineResult<SimulationResult> {
    let models = prepare(legs, entry_cost_basis, dte, params)?;
    let multiplier = f64::from(params.multiplier);

    tracing::debug!(
        legs = legs.len(),
        points = params.num_points,
        days_forward = params.days_forward,
        "simulating position"
    );

    let curve: Vec<CurvePoint> = grid(params)
        .into_par_iter()
        .map(|spot| point_at(&models, spot, entry_cost_basis, multiplier))
        .collect();

    let current = point_at(&models, params.spot, entry_cost_basis, multiplier);
    let (max_profit, max_loss) = metrics::extrema(&curve)
        .map_or((0.0, 0.0), |e| (e.max_profit, e.max_loss));

    // Above the highest strike the expiration payoff slope is the net call quantity
    let net_calls: i64 = legs
        .iter()
        .filter(|l| l.option_type == OptionType::Call)
        .map(|l| i64::from(l.quantity))
        .sum();

    Ok(SimulationResult {
        days_forward: params.days_forward,
        breakevens: metrics::breakevens(&curve),
        curve,
        max_profit,
        max_loss,
        greeks: current.greeks,
        current_pnl: current.pnl,
        profit_unbounded: net_calls > 0,
        loss_unbounded: net_calls < 0,
    })
}

/// Simulate a stored position using its own cost basis and DTE.
pub fn simulate_position(
    position: &Position,
    params: &SimulationParams,
) -> EngineResult<SimulationResult> {
    simulate(
        &position.legs,
        position.signed_cost_basis(),
        position.dte,
        params,
    )
}

/// One result per horizon in `days_forward` (for example T+0 through
/// expiration). Horizons past the last expiration value every leg at intrinsic.
pub fn simulate_time_slices(
    legs: &[Leg],
    entry_cost_basis: f64,
    dte: i64,
    params: &SimulationParams,
    days_forward: &[i64],
) -> EngineResult<Vec<SimulationResult>> {
    days_forward
        .iter()
        .map(|&days| {
            let slice = params.clone().with_days_forward(days);
            simulate(legs, entry_cost_basis, dte, &slice)
        })
        .collect()
}

fn prepare(
    legs: &[Leg],
    entry_cost_basis: f64,
    dte: i64,
    params: &SimulationParams,
) -> EngineResult<Vec<LegModel>> {
    params.validate()?;
    if !entry_cost_basis.is_finite() {
        return Err(EngineError::invalid_input(format!(
            "entry cost basis must be finite (got {entry_cost_basis})"
        )));
    }
    if dte < 0 {
        return Err(EngineError::invalid_input(format!(
            "dte must be non-negative (got {dte})"
        )));
    }
    let Some(primary) = primary_expiration(legs) else {
        return Err(EngineError::invalid_input("at least one leg is required"));
    };

    legs.iter()
        .map(|leg| -> EngineResult<LegModel> {
            leg.validate()?;
            let offset = (leg.expiration - primary).num_days();
            let leg_dte = dte
                .saturating_add(offset)
                .saturating_sub(params.days_forward)
                .max(0);
            Ok(LegModel {
                template: BlackScholesInput {
                    spot: params.spot,
                    strike: leg.strike,
                    time_to_expiry: years_from_days(leg_dte),
                    volatility: params.volatility,
                    risk_free_rate: params.risk_free_rate,
                    dividend_yield: params.dividend_yield,
                    option_type: leg.option_type,
                },
                quantity: f64::from(leg.quantity),
            })
        })
        .collect()
}

/// Evenly spaced spot prices over `spot * (1 ± price_range)`.
fn grid(params: &SimulationParams) -> Vec<f64> {
    let low = params.spot * (1.0 - params.price_range);
    let high = params.spot * (1.0 + params.price_range);
    let steps = (params.num_points - 1) as f64;
    (0..params.num_points)
        .map(|i| {
            if i + 1 == params.num_points {
                high
            } else {
                low + (high - low) * (i as f64 / steps)
            }
        })
        .collect()
}

fn point_at(models: &[LegModel], spot: f64, entry_cost_basis: f64, multiplier: f64) -> CurvePoint {
    let (value, greeks) = models.iter().fold(
        (0.0, Greeks::default()),
        |(value, greeks), model| {
            let mut input = model.template.clone();
            input.spot = spot;
            let res = price_unchecked(&input);
            (
                value + res.price * model.quantity,
                greeks.add(&res.greeks.scale(model.quantity)),
            )
        },
    );
    CurvePoint {
        price: spot,
        pnl: (value - entry_cost_basis) * multiplier,
        greeks: greeks.scale(multiplier),
    }
}
