use super::helpers::*;

pub fn long_call() -> StrategyDef {
    strategy("long_call", "Singles", "Buy a call option", PositionType::Single, Side::Long, vec![
        call_leg(Side::Long, 1, 0.0),
    ])
}

pub fn short_call() -> StrategyDef {
    strategy("short_call", "Singles", "Sell a call option", PositionType::Single, Side::Short, vec![
        call_leg(Side::Short, 1, 0.0),
    ])
}

pub fn long_put() -> StrategyDef {
    strategy("long_put", "Singles", "Buy a put option", PositionType::Single, Side::Long, vec![
        put_leg(Side::Long, 1, 0.0),
    ])
}

pub fn short_put() -> StrategyDef {
    strategy("short_put", "Singles", "Sell a put option", PositionType::Single, Side::Short, vec![
        put_leg(Side::Short, 1, 0.0),
    ])
}

pub fn all() -> Vec<StrategyDef> {
    vec![long_call(), short_call(), long_put(), short_put()]
}
