//! One-line human summaries attached to every tool response.

use std::collections::HashMap;

use crate::engine::types::{
    Classification, CostBasisType, Position, PositionType, Side, SimulationResult,
};

use super::response_types::{StrategiesResponse, StrategyInfo};

pub fn format_pnl(value: f64) -> String {
    if value >= 0.0 {
        format!("+${value:.2}")
    } else {
        format!("-${:.2}", value.abs())
    }
}

fn direction_name(direction: Side) -> &'static str {
    match direction {
        Side::Long => "long",
        Side::Short => "short",
    }
}

pub fn describe_classification(c: &Classification) -> String {
    let mut text = format!("{} {}", direction_name(c.direction), c.position_type);
    match c.is_symmetric {
        Some(true) => text.push_str(" (symmetric)"),
        Some(false) => text.push_str(" (asymmetric wings)"),
        None => {}
    }
    text
}

pub fn classify_summary(c: &Classification, legs: usize) -> String {
    if c.position_type == PositionType::Custom {
        return format!(
            "{legs} leg(s) do not match a known structure; treated as {}.",
            describe_classification(c)
        );
    }
    format!("{legs} leg(s) form a {}.", describe_classification(c))
}

pub fn simulation_summary(result: &SimulationResult) -> String {
    let breakevens = if result.breakevens.is_empty() {
        "no breakeven in range".to_string()
    } else {
        let prices: Vec<String> = result
            .breakevens
            .iter()
            .map(|b| format!("{b:.2}"))
            .collect();
        format!("breakeven(s) at {}", prices.join(", "))
    };

    let max_profit = if result.profit_unbounded {
        "unbounded".to_string()
    } else {
        format_pnl(result.max_profit)
    };
    let max_loss = if result.loss_unbounded {
        "unbounded".to_string()
    } else {
        format_pnl(result.max_loss)
    };

    format!(
        "T+{}: P&L {} at current spot; max profit {max_profit}, max loss {max_loss}; {breakevens}.",
        result.days_forward,
        format_pnl(result.current_pnl),
    )
}

pub fn position_summary(position: &Position) -> String {
    format!(
        "{} {} on {}: center {:.2}, {} DTE, {} {:.2}.",
        direction_name(position.direction),
        position.position_type,
        position.underlying,
        position.strike,
        position.dte,
        match position.cost_basis_type {
            CostBasisType::Debit => "debit",
            CostBasisType::Credit => "credit",
        },
        position.cost_basis,
    )
}

pub fn format_strategies(strategies: Vec<StrategyInfo>) -> StrategiesResponse {
    let total = strategies.len();
    let mut categories: HashMap<String, usize> = HashMap::new();
    for s in &strategies {
        *categories.entry(s.category.clone()).or_default() += 1;
    }

    let cat_parts: Vec<String> = {
        let mut sorted: Vec<_> = categories.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        sorted
            .iter()
            .map(|(cat, count)| format!("{cat} ({count})"))
            .collect()
    };

    let summary = format!(
        "{} strategies available across {} categories: {}.",
        total,
        categories.len(),
        cat_parts.join(", "),
    );

    StrategiesResponse {
        summary,
        total,
        categories,
        strategies,
    }
}
