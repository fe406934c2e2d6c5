use crate::engine::recognition::{center_strike, classify, primary_expiration, wing_width};
use crate::engine::types::Leg;

use super::format::classify_summary;
use super::response_types::ClassifyResponse;

pub fn execute(legs: &[Leg]) -> ClassifyResponse {
    let classification = classify(legs);
    ClassifyResponse {
        summary: classify_summary(&classification, legs.len()),
        center_strike: center_strike(legs),
        width: wing_width(legs, classification.position_type),
        primary_expiration: primary_expiration(legs),
        classification,
    }
}
