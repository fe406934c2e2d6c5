use anyhow::Result;

use crate::engine::recognition::classify;
use crate::error::EngineError;
use crate::server::BuildStrategyParams;
use crate::strategies::{all_strategies, find_strategy};

use super::format::{describe_classification, format_strategies};
use super::response_types::{LegsResponse, StrategiesResponse, StrategyInfo};

pub fn execute() -> StrategiesResponse {
    let strategies: Vec<StrategyInfo> = all_strategies()
        .into_iter()
        .map(|s| StrategyInfo {
            legs: s.legs.len(),
            name: s.name,
            category: s.category,
            position_type: s.position_type,
            direction: s.direction,
            description: s.description,
        })
        .collect();

    format_strategies(strategies)
}

/// Expand a named template into concrete legs.
pub fn execute_build(params: &BuildStrategyParams) -> Result<LegsResponse> {
    let template = find_strategy(&params.strategy)
        .ok_or_else(|| EngineError::UnknownStrategy(params.strategy.clone()))?;
    let legs = template.build_legs(
        params.strike,
        params.width,
        params.expiration,
        params.far_expiration,
        params.contracts,
    )?;
    let classification = classify(&legs);

    Ok(LegsResponse {
        summary: format!(
            "{} expanded to {} leg(s): {}.",
            template.name,
            legs.len(),
            describe_classification(&classification)
        ),
        legs,
        classification,
    })
}
