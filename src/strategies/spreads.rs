use super::helpers::*;

// Vertical spreads: strikes at center -/+ half the width
pub fn bull_call_spread() -> StrategyDef {
    strategy("bull_call_spread", "Spreads", "Buy lower strike call, sell higher strike call",
        PositionType::Vertical, Side::Long, vec![
        call_leg(Side::Long, 1, -0.5),
        call_leg(Side::Short, 1, 0.5),
    ])
}

pub fn bear_call_spread() -> StrategyDef {
    strategy("bear_call_spread", "Spreads", "Sell lower strike call, buy higher strike call",
        PositionType::Vertical, Side::Short, vec![
        call_leg(Side::Short, 1, -0.5),
        call_leg(Side::Long, 1, 0.5),
    ])
}

pub fn bull_put_spread() -> StrategyDef {
    strategy("bull_put_spread", "Spreads", "Sell higher strike put, buy lower strike put",
        PositionType::Vertical, Side::Short, vec![
        put_leg(Side::Long, 1, -0.5),
        put_leg(Side::Short, 1, 0.5),
    ])
}

pub fn bear_put_spread() -> StrategyDef {
    strategy("bear_put_spread", "Spreads", "Buy higher strike put, sell lower strike put",
        PositionType::Vertical, Side::Long, vec![
        put_leg(Side::Short, 1, -0.5),
        put_leg(Side::Long, 1, 0.5),
    ])
}

// Straddles
pub fn long_straddle() -> StrategyDef {
    strategy("long_straddle", "Spreads", "Buy ATM call and put at same strike",
        PositionType::Straddle, Side::Long, vec![
        put_leg(Side::Long, 1, 0.0),
        call_leg(Side::Long, 1, 0.0),
    ])
}

pub fn short_straddle() -> StrategyDef {
    strategy("short_straddle", "Spreads", "Sell ATM call and put at same strike",
        PositionType::Straddle, Side::Short, vec![
        put_leg(Side::Short, 1, 0.0),
        call_leg(Side::Short, 1, 0.0),
    ])
}

// Strangles: one width either side of center
pub fn long_strangle() -> StrategyDef {
    strategy("long_strangle", "Spreads", "Buy OTM call and OTM put",
        PositionType::Strangle, Side::Long, vec![
        put_leg(Side::Long, 1, -1.0),
        call_leg(Side::Long, 1, 1.0),
    ])
}

pub fn short_strangle() -> StrategyDef {
    strategy("short_strangle", "Spreads", "Sell OTM call and OTM put",
        PositionType::Strangle, Side::Short, vec![
        put_leg(Side::Short, 1, -1.0),
        call_leg(Side::Short, 1, 1.0),
    ])
}

pub fn all() -> Vec<StrategyDef> {
    vec![
        bull_call_spread(), bear_call_spread(),
        bull_put_spread(), bear_put_spread(),
        long_straddle(), short_straddle(),
        long_strangle(), short_strangle(),
    ]
}
