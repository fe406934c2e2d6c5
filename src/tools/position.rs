use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::engine::position::{
    create_position, create_position_from_legacy, legacy_to_legs, position_to_legacy,
};
use crate::engine::recognition::classify;
use crate::engine::types::{LegacyStrategy, Position, PositionMetadata};
use crate::server::CreatePositionParams;

use super::format::{describe_classification, position_summary};
use super::response_types::{LegsResponse, PositionResponse};

fn respond(position: Position) -> PositionResponse {
    PositionResponse {
        summary: position_summary(&position),
        legacy: position_to_legacy(&position),
        position,
    }
}

pub fn execute_create(params: CreatePositionParams, now: DateTime<Utc>) -> Result<PositionResponse> {
    let position = create_position(params.legs, params.metadata, now)?;
    Ok(respond(position))
}

pub fn execute_from_legacy(
    legacy: &LegacyStrategy,
    expiration: NaiveDate,
    metadata: PositionMetadata,
    now: DateTime<Utc>,
) -> Result<PositionResponse> {
    let position = create_position_from_legacy(legacy, expiration, metadata, now)?;
    Ok(respond(position))
}

pub fn execute_legacy_to_legs(
    legacy: &LegacyStrategy,
    expiration: NaiveDate,
) -> Result<LegsResponse> {
    let legs = legacy_to_legs(legacy, expiration)?;
    let classification = classify(&legs);
    Ok(LegsResponse {
        summary: format!(
            "{} {} at {:.2} (width {:.2}) expands to {} leg(s) expiring {expiration}.",
            legacy.side.as_str(),
            describe_classification(&classification),
            legacy.strike,
            legacy.width,
            legs.len(),
        ),
        legs,
        classification,
    })
}
