use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Default contract multiplier for equity and index options.
pub const DEFAULT_MULTIPLIER: i32 = 100;

/// Strikes closer than this are treated as the same strike.
pub const STRIKE_EPSILON: f64 = 1e-6;

pub fn same_strike(a: f64, b: f64) -> bool {
    (a - b).abs() < STRIKE_EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long = 1,
    Short = -1,
}

impl Side {
    pub fn multiplier(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }

    /// Long for positive quantities, short otherwise.
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity > 0 {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// Signed quantity for `contracts` on this side.
    pub fn signed(self, contracts: i32) -> i32 {
        match self {
            Side::Long => contracts,
            Side::Short => -contracts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationCycle {
    #[default]
    Primary, // Near-term (or same-expiration for non-calendar strategies)
    Secondary, // Far-term (calendar/diagonal only)
}

/// Canonical strategy taxonomy. `Custom` is the catch-all for anything the
/// recognizer does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    Single,
    Vertical,
    Calendar,
    Diagonal,
    Straddle,
    Strangle,
    Butterfly,
    Bwb,
    Condor,
    IronFly,
    IronCondor,
    Custom,
}

impl PositionType {
    pub const ALL: [PositionType; 12] = [
        PositionType::Single,
        PositionType::Vertical,
        PositionType::Calendar,
        PositionType::Diagonal,
        PositionType::Straddle,
        PositionType::Strangle,
        PositionType::Butterfly,
        PositionType::Bwb,
        PositionType::Condor,
        PositionType::IronFly,
        PositionType::IronCondor,
        PositionType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PositionType::Single => "single",
            PositionType::Vertical => "vertical",
            PositionType::Calendar => "calendar",
            PositionType::Diagonal => "diagonal",
            PositionType::Straddle => "straddle",
            PositionType::Strangle => "strangle",
            PositionType::Butterfly => "butterfly",
            PositionType::Bwb => "bwb",
            PositionType::Condor => "condor",
            PositionType::IronFly => "iron_fly",
            PositionType::IronCondor => "iron_condor",
            PositionType::Custom => "custom",
        }
    }

    /// Structures whose legs span more than one expiration.
    pub fn is_multi_expiration(self) -> bool {
        matches!(self, PositionType::Calendar | PositionType::Diagonal)
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CostBasisType {
    Debit,
    Credit,
}

impl CostBasisType {
    /// Split a signed amount (debit positive) into magnitude and type.
    pub fn split(signed: f64) -> (f64, CostBasisType) {
        if signed < 0.0 {
            (-signed, CostBasisType::Credit)
        } else {
            (signed, CostBasisType::Debit)
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            CostBasisType::Debit => 1.0,
            CostBasisType::Credit => -1.0,
        }
    }
}

pub(crate) fn positive_finite(value: &f64, (): &()) -> garde::Result {
    if value.is_finite() && *value > 0.0 {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "must be a positive finite number (got {value})"
        )))
    }
}

pub(crate) fn finite(value: &f64, (): &()) -> garde::Result {
    if value.is_finite() {
        Ok(())
    } else {
        Err(garde::Error::new(format!("must be finite (got {value})")))
    }
}

/// Grid half-width as a fraction of spot: finite and within [0.001, 0.99].
pub(crate) fn grid_range(value: &f64, (): &()) -> garde::Result {
    if value.is_finite() && (0.001..=0.99).contains(value) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "price range must be a finite fraction between 0.001 and 0.99 (got {value})"
        )))
    }
}

pub(crate) fn optional_grid_range(value: &Option<f64>, (): &()) -> garde::Result {
    match value {
        Some(v) => grid_range(v, &()),
        None => Ok(()),
    }
}

pub(crate) fn optional_finite(value: &Option<f64>, (): &()) -> garde::Result {
    match value {
        Some(v) => finite(v, &()),
        None => Ok(()),
    }
}

fn non_zero_quantity(value: &i32, (): &()) -> garde::Result {
    if *value == 0 {
        return Err(garde::Error::new("quantity must be non-zero"));
    }
    Ok(())
}

/// One option contract within a position. Quantity sign encodes long (+) /
/// short (-); magnitude is the contract count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Leg {
    #[garde(custom(positive_finite))]
    pub strike: f64,
    #[garde(skip)]
    pub expiration: NaiveDate,
    #[serde(alias = "right")]
    #[garde(skip)]
    pub option_type: OptionType,
    #[garde(custom(non_zero_quantity))]
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(inner(range(min = 0.0)))]
    pub fill_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub fill_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(inner(range(min = 0.0)))]
    pub commission: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(inner(range(min = 0.0)))]
    pub fees: Option<f64>,
}

impl Leg {
    pub fn new(strike: f64, expiration: NaiveDate, option_type: OptionType, quantity: i32) -> Self {
        Self {
            strike,
            expiration,
            option_type,
            quantity,
            fill_price: None,
            fill_date: None,
            commission: None,
            fees: None,
        }
    }

    pub fn call(strike: f64, expiration: NaiveDate, quantity: i32) -> Self {
        Self::new(strike, expiration, OptionType::Call, quantity)
    }

    pub fn put(strike: f64, expiration: NaiveDate, quantity: i32) -> Self {
        Self::new(strike, expiration, OptionType::Put, quantity)
    }

    #[must_use]
    pub fn with_fill(mut self, price: f64, date: NaiveDate) -> Self {
        self.fill_price = Some(price);
        self.fill_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_costs(mut self, commission: f64, fees: f64) -> Self {
        self.commission = Some(commission);
        self.fees = Some(fees);
        self
    }

    pub fn side(&self) -> Side {
        Side::from_quantity(self.quantity)
    }

    pub fn contracts(&self) -> u32 {
        self.quantity.unsigned_abs()
    }

    /// Premium paid (+) or received (-) for this leg, per unit of underlying.
    pub fn signed_premium(&self) -> Option<f64> {
        self.fill_price.map(|p| p * f64::from(self.quantity))
    }

    pub fn total_costs(&self) -> f64 {
        self.commission.unwrap_or(0.0) + self.fees.unwrap_or(0.0)
    }
}

/// Option Greeks. Theta is per calendar day, vega and rho per 1 point
/// (1%) move in volatility / rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Scale Greeks by a factor (signed quantity x multiplier)
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }

    #[must_use]
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

impl std::iter::Sum for Greeks {
    fn sum<I: Iterator<Item = Greeks>>(iter: I) -> Self {
        iter.fold(Greeks::default(), |acc, g| acc.add(&g))
    }
}

fn validate_volatility(time_to_expiry: &f64) -> impl FnOnce(&f64, &()) -> garde::Result + '_ {
    move |vol: &f64, (): &()| {
        if !vol.is_finite() || *vol < 0.0 {
            return Err(garde::Error::new(format!(
                "volatility must be a non-negative finite number (got {vol})"
            )));
        }
        if *time_to_expiry > 0.0 && *vol <= 0.0 {
            return Err(garde::Error::new(
                "volatility must be positive before expiration",
            ));
        }
        Ok(())
    }
}

/// Pricing request for a single European option.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct BlackScholesInput {
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub strike: f64,
    /// Years to expiry; zero or negative means expired.
    #[garde(custom(finite))]
    pub time_to_expiry: f64,
    #[garde(custom(validate_volatility(&self.time_to_expiry)))]
    pub volatility: f64,
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
pub struct BlackScholesResult {
    pub price: f64,
    pub greeks: Greeks,
}

fn default_price_range() -> f64 {
    0.10
}

fn default_num_points() -> usize {
    201
}

fn default_multiplier() -> i32 {
    DEFAULT_MULTIPLIER
}

/// Market and grid parameters for a position simulation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SimulationParams {
    #[garde(custom(positive_finite))]
    pub spot: f64,
    #[garde(custom(positive_finite))]
    pub volatility: f64,
    #[garde(custom(finite))]
    pub risk_free_rate: f64,
    #[serde(default)]
    #[garde(custom(finite))]
    pub dividend_yield: f64,
    /// Half-width of the price grid as a fraction of spot.
    #[serde(default = "default_price_range")]
    #[garde(custom(grid_range))]
    pub price_range: f64,
    #[serde(default = "default_num_points")]
    #[garde(range(min = 2, max = 100_000))]
    pub num_points: usize,
    #[serde(default)]
    #[garde(range(min = 0))]
    pub days_forward: i64,
    #[serde(default = "default_multiplier")]
    #[garde(range(min = 1))]
    pub multiplier: i32,
}

impl SimulationParams {
    pub fn new(spot: f64, volatility: f64, risk_free_rate: f64) -> Self {
        Self {
            spot,
            volatility,
            risk_free_rate,
            dividend_yield: 0.0,
            price_range: default_price_range(),
            num_points: default_num_points(),
            days_forward: 0,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    #[must_use]
    pub fn with_grid(mut self, price_range: f64, num_points: usize) -> Self {
        self.price_range = price_range;
        self.num_points = num_points;
        self
    }

    #[must_use]
    pub fn with_days_forward(mut self, days_forward: i64) -> Self {
        self.days_forward = days_forward;
        self
    }

    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurvePoint {
    pub price: f64,
    pub pnl: f64,
    pub greeks: Greeks,
}

/// Snapshot of a position valued across a spot grid. Never persisted;
/// recomputed whenever its inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationResult {
    pub days_forward: i64,
    pub curve: Vec<CurvePoint>,
    /// Highest P&L on the evaluated grid (range-dependent).
    pub max_profit: f64,
    /// Lowest P&L on the evaluated grid (range-dependent).
    pub max_loss: f64,
    /// Ascending spot prices where P&L crosses zero.
    pub breakevens: Vec<f64>,
    /// Position Greeks at the current spot.
    pub greeks: Greeks,
    /// P&L at the current spot.
    pub current_pnl: f64,
    /// Expiration payoff keeps rising as spot goes to infinity.
    pub profit_unbounded: bool,
    /// Expiration payoff keeps falling as spot goes to infinity.
    pub loss_unbounded: bool,
}

/// Output of the leg recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub position_type: PositionType,
    pub direction: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_symmetric: Option<bool>,
}

/// A named aggregate of legs on one underlying. The fields from
/// `position_type` through `width` are derived from `legs` and a reference
/// instant and are only ever written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub id: Uuid,
    pub underlying: String,
    pub legs: Vec<Leg>,
    pub position_type: PositionType,
    pub direction: Side,
    pub is_symmetric: Option<bool>,
    pub primary_expiration: NaiveDate,
    pub dte: i64,
    pub strike: f64,
    pub width: Option<f64>,
    /// Magnitude of the entry premium per unit of underlying.
    pub cost_basis: f64,
    pub cost_basis_type: CostBasisType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Entry cost with debit positive and credit negative.
    pub fn signed_cost_basis(&self) -> f64 {
        self.cost_basis * self.cost_basis_type.sign()
    }

    /// Commissions plus fees across all legs.
    pub fn total_costs(&self) -> f64 {
        self.legs.iter().map(Leg::total_costs).sum()
    }
}

/// Caller-supplied bookkeeping for a new position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct PositionMetadata {
    #[serde(default)]
    #[garde(skip)]
    pub id: Option<Uuid>,
    #[garde(length(min = 1, max = 16), pattern(r"^[A-Za-z0-9._/^-]+$"))]
    pub underlying: String,
    /// Signed entry premium (debit positive). Derived from leg fills when absent.
    #[serde(default)]
    #[garde(custom(optional_finite))]
    pub cost_basis: Option<f64>,
    #[serde(default)]
    #[garde(skip)]
    pub notes: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub tags: Vec<String>,
}

impl PositionMetadata {
    pub fn new(underlying: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost_basis(mut self, signed: f64) -> Self {
        self.cost_basis = Some(signed);
        self
    }
}

/// Strike/width/debit encoding used by older integrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct LegacyStrategy {
    #[garde(skip)]
    pub strategy: PositionType,
    #[garde(skip)]
    pub side: OptionType,
    #[garde(skip)]
    pub direction: Side,
    /// Center strike of the structure.
    #[garde(custom(positive_finite))]
    pub strike: f64,
    /// Wing width; zero for structures without wings.
    #[garde(range(min = 0.0))]
    pub width: f64,
    #[serde(default = "default_contracts")]
    #[garde(range(min = 1))]
    pub contracts: i32,
    /// Signed entry premium (debit positive).
    #[serde(default)]
    #[garde(custom(finite))]
    pub debit: f64,
}

fn default_contracts() -> i32 {
    1
}

/// One leg of a strategy template. Strikes are expressed as an offset from
/// the structure's center, in units of the wing width.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LegDef {
    pub side: Side,
    pub option_type: OptionType,
    pub qty: i32,
    pub strike_offset: f64,
    pub expiration_cycle: ExpirationCycle,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct StrategyDef {
    pub name: String,
    pub category: String,
    pub description: String,
    pub position_type: PositionType,
    pub direction: Side,
    pub legs: Vec<LegDef>,
}

impl StrategyDef {
    /// Returns true if this strategy has legs with different expiration cycles.
    pub fn is_multi_expiration(&self) -> bool {
        self.legs
            .iter()
            .any(|l| l.expiration_cycle == ExpirationCycle::Secondary)
    }

    /// The single right shared by every leg, or `None` for mixed structures.
    pub fn option_type(&self) -> Option<OptionType> {
        let first = self.legs.first()?.option_type;
        self.legs
            .iter()
            .all(|l| l.option_type == first)
            .then_some(first)
    }

    #[allow(clippy::float_cmp)]
    fn uses_width(&self) -> bool {
        self.legs.iter().any(|l| l.strike_offset != 0.0)
    }

    /// Expand the template into concrete legs around `strike`.
    ///
    /// `far` is required for calendar/diagonal templates and must fall after
    /// `near`; it is ignored otherwise.
    pub fn build_legs(
        &self,
        strike: f64,
        width: f64,
        near: NaiveDate,
        far: Option<NaiveDate>,
        contracts: i32,
    ) -> EngineResult<Vec<Leg>> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(EngineError::invalid_input(format!(
                "{}: strike must be positive (got {strike})",
                self.name
            )));
        }
        if contracts < 1 {
            return Err(EngineError::invalid_input(format!(
                "{}: contracts must be at least 1 (got {contracts})",
                self.name
            )));
        }
        if self.uses_width() && !(width.is_finite() && width > 0.0) {
            return Err(EngineError::invalid_input(format!(
                "{}: width must be positive (got {width})",
                self.name
            )));
        }
        let far = if self.is_multi_expiration() {
            match far {
                Some(far) if far > near => far,
                _ => {
                    return Err(EngineError::invalid_input(format!(
                        "{}: a far expiration after {near} is required",
                        self.name
                    )))
                }
            }
        } else {
            near
        };

        self.legs
            .iter()
            .map(|def| {
                let leg_strike = strike + def.strike_offset * width;
                if leg_strike <= 0.0 {
                    return Err(EngineError::invalid_input(format!(
                        "{}: width {width} puts a leg strike at {leg_strike}",
                        self.name
                    )));
                }
                let expiration = match def.expiration_cycle {
                    ExpirationCycle::Primary => near,
                    ExpirationCycle::Secondary => far,
                };
                let quantity = def.qty.checked_mul(contracts).ok_or_else(|| {
                    EngineError::invalid_input(format!(
                        "{}: {contracts} contracts overflows the leg quantity",
                        self.name
                    ))
                })?;
                Ok(Leg::new(
                    leg_strike,
                    expiration,
                    def.option_type,
                    def.side.signed(quantity),
                ))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ExitType {
    StopLoss,
    TakeProfit,
    DteExit,
}

/// Exit thresholds as fractions of the absolute entry cost.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ExitRules {
    #[serde(default)]
    #[garde(inner(range(min = 0.0)))]
    pub take_profit: Option<f64>,
    #[serde(default)]
    #[garde(inner(range(min = 0.0)))]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    #[garde(inner(range(min = 0)))]
    pub exit_dte: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn side_multiplier_long() {
        assert!((Side::Long.multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn side_multiplier_short() {
        assert!((Side::Short.multiplier() - (-1.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn side_from_quantity() {
        assert_eq!(Side::from_quantity(3), Side::Long);
        assert_eq!(Side::from_quantity(-2), Side::Short);
        assert_eq!(Side::Long.flip(), Side::Short);
    }

    #[test]
    fn option_type_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn position_type_serializes_snake_case() {
        let json = serde_json::to_string(&PositionType::IronCondor).unwrap();
        assert_eq!(json, "\"iron_condor\"");
        let parsed: PositionType = serde_json::from_str("\"bwb\"").unwrap();
        assert_eq!(parsed, PositionType::Bwb);
        for t in PositionType::ALL {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{t}\""));
        }
    }

    #[test]
    fn cost_basis_split() {
        assert_eq!(CostBasisType::split(2.5), (2.5, CostBasisType::Debit));
        assert_eq!(CostBasisType::split(-1.25), (1.25, CostBasisType::Credit));
        assert_eq!(CostBasisType::split(0.0), (0.0, CostBasisType::Debit));
    }

    #[test]
    fn leg_accepts_right_alias() {
        let leg: Leg = serde_json::from_str(
            r#"{"strike": 5900, "expiration": "2024-03-15", "right": "call", "quantity": -2}"#,
        )
        .unwrap();
        assert_eq!(leg.option_type, OptionType::Call);
        assert_eq!(leg.side(), Side::Short);
        assert_eq!(leg.contracts(), 2);
    }

    #[test]
    fn leg_signed_premium() {
        let leg = Leg::call(100.0, exp(), -2).with_fill(1.5, exp());
        assert!((leg.signed_premium().unwrap() - (-3.0)).abs() < 1e-12);
        assert!(Leg::call(100.0, exp(), 1).signed_premium().is_none());
    }

    #[test]
    fn leg_rejects_zero_quantity() {
        assert!(Leg::call(100.0, exp(), 0).validate().is_err());
    }

    #[test]
    fn leg_rejects_non_positive_strike() {
        assert!(Leg::put(0.0, exp(), 1).validate().is_err());
        assert!(Leg::put(-5.0, exp(), 1).validate().is_err());
        assert!(Leg::put(f64::NAN, exp(), 1).validate().is_err());
    }

    #[test]
    fn leg_rejects_negative_commission() {
        let leg = Leg::call(100.0, exp(), 1).with_costs(-0.65, 0.0);
        assert!(leg.validate().is_err());
    }

    #[test]
    fn greeks_scale_and_sum() {
        let g = Greeks::new(0.5, 0.02, -0.1, 0.2, 0.05);
        let total: Greeks = vec![g.scale(2.0), g.scale(-1.0)].into_iter().sum();
        assert!((total.delta - 0.5).abs() < 1e-12);
        assert!((total.theta - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn black_scholes_input_rejects_zero_vol_before_expiry() {
        let input = BlackScholesInput {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 0.5,
            volatility: 0.0,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type: OptionType::Call,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn black_scholes_input_allows_zero_vol_at_expiry() {
        let input = BlackScholesInput {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 0.0,
            volatility: 0.0,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            option_type: OptionType::Put,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn simulation_params_defaults() {
        let p: SimulationParams =
            serde_json::from_str(r#"{"spot": 5900, "volatility": 0.2, "risk_free_rate": 0.05}"#)
                .unwrap();
        assert!((p.price_range - 0.10).abs() < f64::EPSILON);
        assert_eq!(p.num_points, 201);
        assert_eq!(p.multiplier, 100);
        assert_eq!(p.days_forward, 0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn simulation_params_rejects_single_point_grid() {
        let p = SimulationParams::new(100.0, 0.2, 0.05).with_grid(0.1, 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn simulation_params_rejects_negative_days_forward() {
        let p = SimulationParams::new(100.0, 0.2, 0.05).with_days_forward(-1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn metadata_rejects_bad_symbol() {
        assert!(PositionMetadata::new("SPX").validate().is_ok());
        assert!(PositionMetadata::new("").validate().is_err());
        assert!(PositionMetadata::new("S P X").validate().is_err());
    }

    #[test]
    fn exit_rules_reject_negative_threshold() {
        let rules = ExitRules {
            take_profit: Some(-0.5),
            stop_loss: None,
            exit_dte: None,
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn simulation_params_rejects_non_finite_range() {
        for range in [f64::NAN, f64::INFINITY, 0.0, 1.5] {
            let p = SimulationParams::new(5925.0, 0.2, 0.05).with_grid(range, 11);
            assert!(p.validate().is_err(), "accepted {range}");
        }
        let p = SimulationParams::new(5925.0, 0.2, 0.05).with_grid(0.99, 11);
        assert!(p.validate().is_ok());
    }
}
