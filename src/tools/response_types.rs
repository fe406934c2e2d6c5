use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::exits::ExitLevels;
use crate::engine::types::{
    BlackScholesResult, Classification, Leg, LegacyStrategy, Position, PositionType, Side,
    SimulationResult,
};

/// Response for `classify`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyResponse {
    pub summary: String,
    pub classification: Classification,
    pub center_strike: Option<f64>,
    pub width: Option<f64>,
    pub primary_expiration: Option<NaiveDate>,
}

/// Response for `price`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PriceResponse {
    pub summary: String,
    pub time_to_expiry: f64,
    pub result: BlackScholesResult,
}

/// Response for `implied_volatility`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImpliedVolResponse {
    pub summary: String,
    /// `None` when the quote has no implied volatility
    pub implied_volatility: Option<f64>,
    pub iterations: Option<u32>,
    pub failure: Option<String>,
}

/// Response for `simulate`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimulateResponse {
    pub summary: String,
    pub dte: i64,
    pub result: SimulationResult,
    pub risk_reward_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_slices: Vec<SimulationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_levels: Option<ExitLevels>,
}

/// Response for `create_position` and `legacy_to_legs` with metadata
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PositionResponse {
    pub summary: String,
    pub position: Position,
    /// Strike/width/debit form, when the position has one
    pub legacy: Option<LegacyStrategy>,
}

/// Response for `legacy_to_legs` and `build_strategy`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LegsResponse {
    pub summary: String,
    pub legs: Vec<Leg>,
    pub classification: Classification,
}

/// Response for `list_strategies`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategiesResponse {
    pub summary: String,
    pub total: usize,
    pub categories: HashMap<String, usize>,
    pub strategies: Vec<StrategyInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategyInfo {
    pub name: String,
    pub category: String,
    pub position_type: PositionType,
    pub direction: Side,
    pub legs: usize,
    pub description: String,
}
