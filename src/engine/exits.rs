use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::metrics::crossings;
use super::types::{ExitRules, ExitType, SimulationResult};
use crate::error::EngineResult;

/// Dollar thresholds derived from exit rules, plus the spot prices at which a
/// simulated curve reaches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExitLevels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_pnl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_pnl: Option<f64>,
    pub take_profit_prices: Vec<f64>,
    pub stop_loss_prices: Vec<f64>,
}

/// Dollar entry cost: |signed cost per unit| x multiplier.
pub fn entry_cost_dollars(entry_cost_basis: f64, multiplier: i32) -> f64 {
    entry_cost_basis.abs() * f64::from(multiplier)
}

/// Decide whether a position should be closed.
///
/// `pnl` and `entry_cost` are in dollars. Stop loss is checked first, then
/// take profit, then the DTE floor.
pub fn check_exit(pnl: f64, entry_cost: f64, dte: i64, rules: &ExitRules) -> Option<ExitType> {
    let basis = entry_cost.abs();

    if let Some(sl) = rules.stop_loss {
        if pnl <= -(basis * sl) {
            return Some(ExitType::StopLoss);
        }
    }

    if let Some(tp) = rules.take_profit {
        if pnl >= basis * tp {
            return Some(ExitType::TakeProfit);
        }
    }

    if let Some(exit_dte) = rules.exit_dte {
        if dte <= exit_dte {
            return Some(ExitType::DteExit);
        }
    }

    None
}

/// Map exit rules onto a simulated curve.
pub fn exit_levels(
    result: &SimulationResult,
    entry_cost: f64,
    rules: &ExitRules,
) -> EngineResult<ExitLevels> {
    rules.validate()?;
    let basis = entry_cost.abs();

    let take_profit_pnl = rules.take_profit.map(|tp| basis * tp);
    let stop_loss_pnl = rules.stop_loss.map(|sl| -(basis * sl));

    Ok(ExitLevels {
        take_profit_prices: take_profit_pnl
            .map(|level| crossings(&result.curve, level))
            .unwrap_or_default(),
        stop_loss_prices: stop_loss_pnl
            .map(|level| crossings(&result.curve, level))
            .unwrap_or_default(),
        take_profit_pnl,
        stop_loss_pnl,
    })
}
