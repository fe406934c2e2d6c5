pub mod butterflies;
pub mod calendar;
pub mod condors;
pub mod helpers;
pub mod iron;
pub mod singles;
pub mod spreads;

use crate::engine::types::{OptionType, PositionType, Side, StrategyDef};

pub fn all_strategies() -> Vec<StrategyDef> {
    let mut strategies = Vec::new();
    strategies.extend(singles::all());
    strategies.extend(spreads::all());
    strategies.extend(butterflies::all());
    strategies.extend(condors::all());
    strategies.extend(iron::all());
    strategies.extend(calendar::all());
    strategies
}

pub fn find_strategy(name: &str) -> Option<StrategyDef> {
    all_strategies().into_iter().find(|s| s.name == name)
}

/// Template for a (type, right, direction) triple. Mixed-right structures
/// (straddles, strangles, iron) match either right.
pub fn find_template(
    position_type: PositionType,
    side: OptionType,
    direction: Side,
) -> Option<StrategyDef> {
    all_strategies().into_iter().find(|s| {
        s.position_type == position_type
            && s.direction == direction
            && s.option_type().map_or(true, |right| right == side)
    })
}
