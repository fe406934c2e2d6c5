pub use crate::engine::types::{
    ExpirationCycle, LegDef, OptionType, PositionType, Side, StrategyDef,
};

pub fn leg(side: Side, option_type: OptionType, qty: i32, strike_offset: f64) -> LegDef {
    LegDef {
        side,
        option_type,
        qty,
        strike_offset,
        expiration_cycle: ExpirationCycle::Primary,
    }
}

pub fn call_leg(side: Side, qty: i32, strike_offset: f64) -> LegDef {
    leg(side, OptionType::Call, qty, strike_offset)
}

pub fn put_leg(side: Side, qty: i32, strike_offset: f64) -> LegDef {
    leg(side, OptionType::Put, qty, strike_offset)
}

/// Same leg on the far (secondary) expiration.
pub fn far(mut def: LegDef) -> LegDef {
    def.expiration_cycle = ExpirationCycle::Secondary;
    def
}

pub fn strategy(
    name: &str,
    category: &str,
    description: &str,
    position_type: PositionType,
    direction: Side,
    legs: Vec<LegDef>,
) -> StrategyDef {
    StrategyDef {
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        position_type,
        direction,
        legs,
    }
}
