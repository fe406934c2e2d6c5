use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::CurvePoint;

/// Highest and lowest P&L on a curve, with the spot price where each occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extrema {
    pub max_profit: f64,
    pub max_profit_price: f64,
    pub max_loss: f64,
    pub max_loss_price: f64,
}

/// Spot prices where the P&L curve crosses `level`, ascending.
///
/// A bracket counts when the sign strictly changes or the right endpoint lands
/// exactly on the level; the crossing price is linearly interpolated within
/// the bracket. A curve that starts exactly on the level reports its first
/// point.
#[allow(clippy::float_cmp)]
pub fn crossings(curve: &[CurvePoint], level: f64) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();

    if let Some(first) = curve.first() {
        if first.pnl == level {
            out.push(first.price);
        }
    }

    for pair in curve.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let a = left.pnl - level;
        let b = right.pnl - level;
        let crosses = (a < 0.0 && b >= 0.0) || (a > 0.0 && b <= 0.0);
        if !crosses {
            continue;
        }
        let price = if b == 0.0 {
            right.price
        } else {
            left.price + (right.price - left.price) * (a / (a - b))
        };
        let duplicate = matches!(out.last(), Some(prev) if (price - prev).abs() <= f64::EPSILON);
        if !duplicate {
            out.push(price);
        }
    }

    out
}

/// Zero-P&L crossings of a curve.
pub fn breakevens(curve: &[CurvePoint]) -> Vec<f64> {
    crossings(curve, 0.0)
}

/// Grid extrema; `None` for an empty curve. Ties keep the lowest price.
pub fn extrema(curve: &[CurvePoint]) -> Option<Extrema> {
    let first = curve.first()?;
    let init = Extrema {
        max_profit: first.pnl,
        max_profit_price: first.price,
        max_loss: first.pnl,
        max_loss_price: first.price,
    };
    Some(curve.iter().skip(1).fold(init, |mut acc, p| {
        if p.pnl > acc.max_profit {
            acc.max_profit = p.pnl;
            acc.max_profit_price = p.price;
        }
        if p.pnl < acc.max_loss {
            acc.max_loss = p.pnl;
            acc.max_loss_price = p.price;
        }
        acc
    }))
}

/// Reward per unit of risk: `max_profit / |max_loss|`. Undefined when the
/// curve never goes negative.
pub fn risk_reward_ratio(max_profit: f64, max_loss: f64) -> Option<f64> {
    if max_loss < 0.0 && max_loss.is_finite() && max_profit.is_finite() {
        Some(max_profit / max_loss.abs())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Greeks;

    fn curve(points: &[(f64, f64)]) -> Vec<CurvePoint> {
        points
            .iter()
            .map(|&(price, pnl)| CurvePoint {
                price,
                pnl,
                greeks: Greeks::default(),
            })
            .collect()
    }

    #[test]
    fn interpolates_single_crossing() {
        let c = curve(&[(100.0, -10.0), (110.0, 30.0)]);
        let be = breakevens(&c);
        assert_eq!(be.len(), 1);
        assert!((be[0] - 102.5).abs() < 1e-12);
    }

    #[test]
    fn two_crossings_ascending() {
        let c = curve(&[
            (90.0, -50.0),
            (95.0, 10.0),
            (100.0, 40.0),
            (105.0, 10.0),
            (110.0, -50.0),
        ]);
        let be = breakevens(&c);
        assert_eq!(be.len(), 2);
        assert!(be[0] < be[1]);
        assert!((be[0] - (90.0 + 5.0 * 50.0 / 60.0)).abs() < 1e-12);
        assert!((be[1] - (105.0 + 5.0 * 10.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn exact_zero_on_grid_is_reported_once() {
        let c = curve(&[(90.0, -5.0), (95.0, 0.0), (100.0, 5.0)]);
        assert_eq!(breakevens(&c), vec![95.0]);
    }

    #[test]
    fn flat_zero_stretch_reports_entry_only() {
        let c = curve(&[(90.0, -5.0), (95.0, 0.0), (100.0, 0.0), (105.0, 5.0)]);
        assert_eq!(breakevens(&c), vec![95.0]);
    }

    #[test]
    fn curve_starting_at_zero() {
        let c = curve(&[(90.0, 0.0), (95.0, 5.0)]);
        assert_eq!(breakevens(&c), vec![90.0]);
    }

    #[test]
    fn no_crossing() {
        let c = curve(&[(90.0, 5.0), (95.0, 6.0), (100.0, 7.0)]);
        assert!(breakevens(&c).is_empty());
        assert!(breakevens(&[]).is_empty());
    }

    #[test]
    fn crossings_at_arbitrary_level() {
        let c = curve(&[(100.0, 0.0), (110.0, 100.0)]);
        let hits = crossings(&c, 50.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - 105.0).abs() < 1e-12);
    }

    #[test]
    fn extrema_prices() {
        let c = curve(&[(90.0, -50.0), (100.0, 40.0), (110.0, -60.0)]);
        let e = extrema(&c).unwrap();
        assert_eq!(e.max_profit, 40.0);
        assert_eq!(e.max_profit_price, 100.0);
        assert_eq!(e.max_loss, -60.0);
        assert_eq!(e.max_loss_price, 110.0);
        assert!(extrema(&[]).is_none());
    }

    #[test]
    fn risk_reward() {
        assert!((risk_reward_ratio(300.0, -200.0).unwrap() - 1.5).abs() < 1e-12);
        assert!(risk_reward_ratio(300.0, 0.0).is_none());
        assert!(risk_reward_ratio(300.0, 10.0).is_none());
    }
}
