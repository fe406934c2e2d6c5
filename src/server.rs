use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::types::{
    finite, optional_finite, optional_grid_range, positive_finite, ExitRules, Leg, LegacyStrategy,
    OptionType, PositionMetadata,
};
use crate::tools;
use crate::tools::response_types::{
    ClassifyResponse, ImpliedVolResponse, LegsResponse, PositionResponse, PriceResponse,
    SimulateResponse, StrategiesResponse,
};

fn validate_expiry_given(
    days: &Option<i64>,
) -> impl FnOnce(&Option<f64>, &()) -> garde::Result + '_ {
    move |years: &Option<f64>, (): &()| match (years, days) {
        (None, None) => Err(garde::Error::new(
            "one of time_to_expiry (years) or days_to_expiry is required",
        )),
        (Some(t), _) if !t.is_finite() => {
            Err(garde::Error::new(format!("time_to_expiry must be finite (got {t})")))
        }
        _ => Ok(()),
    }
}

fn validate_far_after_near(
    near: &NaiveDate,
) -> impl FnOnce(&Option<NaiveDate>, &()) -> garde::Result + '_ {
    move |far: &Option<NaiveDate>, (): &()| match far {
        Some(far) if far <= near => Err(garde::Error::new(format!(
            "far_expiration ({far}) must be after expiration ({near})"
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ClassifyParams {
    /// Legs in any order; an empty list classifies as custom
    #[garde(dive)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct PriceParams {
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub strike: f64,
    /// Years to expiry. Takes precedence over `days_to_expiry`.
    #[garde(custom(validate_expiry_given(&self.days_to_expiry)))]
    pub time_to_expiry: Option<f64>,
    /// Calendar days to expiry (converted with a 365-day year)
    #[garde(skip)]
    pub days_to_expiry: Option<i64>,
    #[garde(skip)]
    pub volatility: f64,
    /// Defaults to `pricing.risk_free_rate` from config
    #[garde(custom(optional_finite))]
    pub risk_free_rate: Option<f64>,
    /// Defaults to `pricing.dividend_yield` from config
    #[garde(custom(optional_finite))]
    pub dividend_yield: Option<f64>,
    #[serde(alias = "right")]
    #[garde(skip)]
    pub option_type: OptionType,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ImpliedVolParams {
    #[garde(skip)]
    pub market_price: f64,
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub strike: f64,
    #[garde(custom(validate_expiry_given(&self.days_to_expiry)))]
    pub time_to_expiry: Option<f64>,
    #[garde(skip)]
    pub days_to_expiry: Option<i64>,
    #[garde(custom(optional_finite))]
    pub risk_free_rate: Option<f64>,
    #[garde(custom(optional_finite))]
    pub dividend_yield: Option<f64>,
    #[serde(alias = "right")]
    #[garde(skip)]
    pub option_type: OptionType,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct SimulateParams {
    #[garde(length(min = 1), dive)]
    pub legs: Vec<Leg>,
    /// Signed entry premium per unit of underlying (debit positive)
    #[serde(default)]
    #[garde(custom(finite))]
    pub entry_cost_basis: f64,
    /// Days to the primary expiration; derived from the legs and the current
    /// date when omitted
    #[garde(inner(range(min = 0)))]
    pub dte: Option<i64>,
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub volatility: f64,
    #[garde(custom(optional_finite))]
    pub risk_free_rate: Option<f64>,
    #[garde(custom(optional_finite))]
    pub dividend_yield: Option<f64>,
    #[garde(custom(optional_grid_range))]
    pub price_range: Option<f64>,
    #[garde(inner(range(min = 2, max = 100_000)))]
    pub num_points: Option<usize>,
    #[serde(default)]
    #[garde(range(min = 0))]
    pub days_forward: i64,
    #[garde(inner(range(min = 1)))]
    pub multiplier: Option<i32>,
    /// Extra horizons (days forward) to evaluate, e.g. `[0, 15, 30]`
    #[serde(default)]
    #[garde(inner(range(min = 0)))]
    pub time_slices: Vec<i64>,
    #[garde(dive)]
    pub exit_rules: Option<ExitRules>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreatePositionParams {
    #[garde(length(min = 1), dive)]
    pub legs: Vec<Leg>,
    #[garde(dive)]
    pub metadata: PositionMetadata,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct LegacyToLegsParams {
    #[serde(flatten)]
    #[garde(dive)]
    pub legacy: LegacyStrategy,
    #[garde(skip)]
    pub expiration: NaiveDate,
    /// When present, also build a position from the expanded legs
    #[garde(dive)]
    pub metadata: Option<PositionMetadata>,
}

fn default_contracts() -> i32 {
    1
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct BuildStrategyParams {
    /// Strategy name (e.g. '`iron_condor`')
    #[garde(length(min = 1))]
    pub strategy: String,
    #[garde(custom(positive_finite))]
    pub strike: f64,
    #[serde(default)]
    #[garde(range(min = 0.0))]
    pub width: f64,
    #[garde(skip)]
    pub expiration: NaiveDate,
    /// Far expiration for calendar and diagonal templates
    #[garde(custom(validate_far_after_near(&self.expiration)))]
    pub far_expiration: Option<NaiveDate>,
    #[serde(default = "default_contracts")]
    #[garde(range(min = 1))]
    pub contracts: i32,
}

/// One tool invocation: `{"tool": "<name>", "params": {...}}`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(tag = "tool", content = "params", rename_all = "snake_case")]
pub enum ToolRequest {
    Classify(ClassifyParams),
    Price(PriceParams),
    ImpliedVolatility(ImpliedVolParams),
    Simulate(SimulateParams),
    CreatePosition(CreatePositionParams),
    LegacyToLegs(LegacyToLegsParams),
    BuildStrategy(BuildStrategyParams),
    ListStrategies,
}

impl ToolRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ToolRequest::Classify(_) => "classify",
            ToolRequest::Price(_) => "price",
            ToolRequest::ImpliedVolatility(_) => "implied_volatility",
            ToolRequest::Simulate(_) => "simulate",
            ToolRequest::CreatePosition(_) => "create_position",
            ToolRequest::LegacyToLegs(_) => "legacy_to_legs",
            ToolRequest::BuildStrategy(_) => "build_strategy",
            ToolRequest::ListStrategies => "list_strategies",
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ToolResponse {
    Classify(ClassifyResponse),
    Price(PriceResponse),
    ImpliedVolatility(ImpliedVolResponse),
    Simulate(SimulateResponse),
    Position(PositionResponse),
    Legs(LegsResponse),
    Strategies(StrategiesResponse),
}

fn validated<P: Validate<Context = ()>>(tool: &str, params: &P) -> Result<()> {
    params.validate().map_err(|e| {
        tracing::warn!(tool, "rejected request: {e}");
        anyhow::anyhow!("Validation error: {e}")
    })
}

/// Route one request to its tool. `now` comes from the caller so every tool
/// stays deterministic.
pub fn handle(
    request: ToolRequest,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<ToolResponse> {
    let tool = request.name();
    tracing::debug!(tool, "handling request");

    let response = match request {
        ToolRequest::Classify(params) => {
            validated(tool, &params)?;
            ToolResponse::Classify(tools::classify::execute(&params.legs))
        }
        ToolRequest::Price(params) => {
            validated(tool, &params)?;
            ToolResponse::Price(tools::pricing::execute(&params, config)?)
        }
        ToolRequest::ImpliedVolatility(params) => {
            validated(tool, &params)?;
            ToolResponse::ImpliedVolatility(tools::pricing::execute_implied_vol(&params, config)?)
        }
        ToolRequest::Simulate(params) => {
            validated(tool, &params)?;
            ToolResponse::Simulate(tools::simulate::execute(&params, config, now)?)
        }
        ToolRequest::CreatePosition(params) => {
            validated(tool, &params)?;
            ToolResponse::Position(tools::position::execute_create(params, now)?)
        }
        ToolRequest::LegacyToLegs(params) => {
            validated(tool, &params)?;
            match params.metadata {
                Some(metadata) => ToolResponse::Position(tools::position::execute_from_legacy(
                    &params.legacy,
                    params.expiration,
                    metadata,
                    now,
                )?),
                None => ToolResponse::Legs(tools::position::execute_legacy_to_legs(
                    &params.legacy,
                    params.expiration,
                )?),
            }
        }
        ToolRequest::BuildStrategy(params) => {
            validated(tool, &params)?;
            ToolResponse::Legs(tools::strategies::execute_build(&params)?)
        }
        ToolRequest::ListStrategies => ToolResponse::Strategies(tools::strategies::execute()),
    };
    Ok(response)
}

/// Parse and route a raw JSON request.
pub fn handle_json(
    input: &str,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<ToolResponse> {
    let request: ToolRequest =
        serde_json::from_str(input).context("Failed to parse tool request")?;
    handle(request, config, now)
}
