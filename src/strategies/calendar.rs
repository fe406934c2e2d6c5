use super::helpers::{call_leg, far, put_leg, strategy, PositionType, Side, StrategyDef};

pub fn call_calendar_spread() -> StrategyDef {
    strategy(
        "call_calendar_spread",
        "Calendar",
        "Sell near-term call, buy far-term call at same strike",
        PositionType::Calendar,
        Side::Long,
        vec![
            call_leg(Side::Short, 1, 0.0),     // near-term
            far(call_leg(Side::Long, 1, 0.0)), // far-term
        ],
    )
}

pub fn short_call_calendar_spread() -> StrategyDef {
    strategy(
        "short_call_calendar_spread",
        "Calendar",
        "Buy near-term call, sell far-term call at same strike",
        PositionType::Calendar,
        Side::Short,
        vec![
            call_leg(Side::Long, 1, 0.0),
            far(call_leg(Side::Short, 1, 0.0)),
        ],
    )
}

pub fn put_calendar_spread() -> StrategyDef {
    strategy(
        "put_calendar_spread",
        "Calendar",
        "Sell near-term put, buy far-term put at same strike",
        PositionType::Calendar,
        Side::Long,
        vec![put_leg(Side::Short, 1, 0.0), far(put_leg(Side::Long, 1, 0.0))],
    )
}

pub fn short_put_calendar_spread() -> StrategyDef {
    strategy(
        "short_put_calendar_spread",
        "Calendar",
        "Buy near-term put, sell far-term put at same strike",
        PositionType::Calendar,
        Side::Short,
        vec![put_leg(Side::Long, 1, 0.0), far(put_leg(Side::Short, 1, 0.0))],
    )
}

// Diagonals: short near leg out of the money, long far leg in the money
pub fn call_diagonal_spread() -> StrategyDef {
    strategy(
        "call_diagonal_spread",
        "Calendar",
        "Sell near-term call, buy far-term call at a lower strike",
        PositionType::Diagonal,
        Side::Long,
        vec![
            call_leg(Side::Short, 1, 0.5),
            far(call_leg(Side::Long, 1, -0.5)),
        ],
    )
}

pub fn short_call_diagonal_spread() -> StrategyDef {
    strategy(
        "short_call_diagonal_spread",
        "Calendar",
        "Buy near-term call, sell far-term call at a lower strike",
        PositionType::Diagonal,
        Side::Short,
        vec![
            call_leg(Side::Long, 1, 0.5),
            far(call_leg(Side::Short, 1, -0.5)),
        ],
    )
}

pub fn put_diagonal_spread() -> StrategyDef {
    strategy(
        "put_diagonal_spread",
        "Calendar",
        "Sell near-term put, buy far-term put at a higher strike",
        PositionType::Diagonal,
        Side::Long,
        vec![
            put_leg(Side::Short, 1, -0.5),
            far(put_leg(Side::Long, 1, 0.5)),
        ],
    )
}

pub fn short_put_diagonal_spread() -> StrategyDef {
    strategy(
        "short_put_diagonal_spread",
        "Calendar",
        "Buy near-term put, sell far-term put at a higher strike",
        PositionType::Diagonal,
        Side::Short,
        vec![
            put_leg(Side::Long, 1, -0.5),
            far(put_leg(Side::Short, 1, 0.5)),
        ],
    )
}

pub fn all() -> Vec<StrategyDef> {
    vec![
        call_calendar_spread(),
        short_call_calendar_spread(),
        put_calendar_spread(),
        short_put_calendar_spread(),
        call_diagonal_spread(),
        short_call_diagonal_spread(),
        put_diagonal_spread(),
        short_put_diagonal_spread(),
    ]
}
