//! Leg recognition: classify an unordered set of legs into one strategy
//! shape plus a net direction.
//!
//! Legs are always re-sorted by (expiration, strike, right) first, so caller
//! order never matters. Patterns are checked from most to least specific and
//! anything unmatched falls through to `Custom`; classification never fails.
//!
//! Direction follows one rule: a structure is long when it is net-debit by
//! construction. Each shape names the anchor leg whose quantity sign decides
//! it (see [`classify`]).

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

use super::types::{same_strike, Classification, Leg, OptionType, PositionType, Side};

/// Legs ordered by (expiration, strike, right) with puts before calls.
pub fn sort_legs(legs: &[Leg]) -> Vec<Leg> {
    let mut sorted = legs.to_vec();
    sorted.sort_by_key(|l| {
        (
            l.expiration,
            OrderedFloat(l.strike),
            l.option_type == OptionType::Call,
        )
    });
    sorted
}

/// Classify legs into a `PositionType` and direction.
///
/// Anchor legs per shape:
/// - single: the leg itself
/// - vertical: lower strike for calls, higher strike for puts
/// - calendar / diagonal: the farthest-dated leg
/// - straddle / strangle: the call
/// - butterfly / bwb / condor: the lowest-strike wing
/// - iron fly / iron condor: the inner put (the body)
/// - custom: largest |quantity|, then closest to the center strike, then lowest strike
pub fn classify(legs: &[Leg]) -> Classification {
    let sorted = sort_legs(legs);
    let matched = match sorted.as_slice() {
        [] => None,
        [leg] => Some(shape(PositionType::Single, leg, None)),
        [a, b] => two_legs(a, b),
        [a, b, c] => three_legs(a, b, c),
        [a, b, c, d] => four_legs([a, b, c, d]),
        _ => None,
    };
    matched.unwrap_or_else(|| custom(&sorted))
}

fn shape(position_type: PositionType, anchor: &Leg, is_symmetric: Option<bool>) -> Classification {
    Classification {
        position_type,
        direction: anchor.side(),
        is_symmetric,
    }
}

fn two_legs(a: &Leg, b: &Leg) -> Option<Classification> {
    let same_expiration = a.expiration == b.expiration;
    let same_right = a.option_type == b.option_type;
    let same_k = same_strike(a.strike, b.strike);

    match (same_expiration, same_right) {
        (true, true) => {
            if same_k {
                // Two copies of one contract are not a spread
                return None;
            }
            let anchor = match a.option_type {
                OptionType::Call => a,
                OptionType::Put => b,
            };
            Some(shape(PositionType::Vertical, anchor, None))
        }
        (false, true) => {
            let position_type = if same_k {
                PositionType::Calendar
            } else {
                PositionType::Diagonal
            };
            Some(shape(position_type, b, None))
        }
        (true, false) => {
            let call = if a.option_type == OptionType::Call { a } else { b };
            let position_type = if same_k {
                PositionType::Straddle
            } else {
                PositionType::Strangle
            };
            Some(shape(position_type, call, None))
        }
        (false, false) => None,
    }
}

fn three_legs(low: &Leg, mid: &Leg, high: &Leg) -> Option<Classification> {
    let same_expiration = low.expiration == mid.expiration && mid.expiration == high.expiration;
    let same_right = low.option_type == mid.option_type && mid.option_type == high.option_type;
    if !same_expiration || !same_right {
        return None;
    }
    if same_strike(low.strike, mid.strike) || same_strike(mid.strike, high.strike) {
        return None;
    }
    // 1 / -2 / 1 ratio in either sign, checked in i64
    if low.quantity != high.quantity
        || i64::from(mid.quantity) != -2 * i64::from(low.quantity)
    {
        return None;
    }

    let lower_wing = mid.strike - low.strike;
    let upper_wing = high.strike - mid.strike;
    if same_strike(lower_wing, upper_wing) {
        Some(shape(PositionType::Butterfly, low, Some(true)))
    } else {
        Some(shape(PositionType::Bwb, low, Some(false)))
    }
}

fn four_legs(legs: [&Leg; 4]) -> Option<Classification> {
    let expiration = legs[0].expiration;
    if legs.iter().any(|l| l.expiration != expiration) {
        return None;
    }

    let right = legs[0].option_type;
    if legs.iter().all(|l| l.option_type == right) {
        let distinct = legs
            .windows(2)
            .all(|w| !same_strike(w[0].strike, w[1].strike));
        if !distinct {
            return None;
        }
        let symmetric = same_strike(
            legs[1].strike - legs[0].strike,
            legs[3].strike - legs[2].strike,
        );
        return Some(shape(PositionType::Condor, legs[0], Some(symmetric)));
    }

    let (put_low, put_high, call_low, call_high) = iron_legs(&legs)?;
    let symmetric = same_strike(
        put_high.strike - put_low.strike,
        call_high.strike - call_low.strike,
    );
    let position_type = if same_strike(put_high.strike, call_low.strike) {
        PositionType::IronFly
    } else {
        PositionType::IronCondor
    };
    Some(shape(position_type, put_high, Some(symmetric)))
}

/// Split four same-expiration legs into (put low, put high, call low, call high)
/// when they form an iron structure: two puts, two calls, distinct strikes within
/// each right, and every put strike at or below every call strike.
fn iron_legs<'a>(legs: &[&'a Leg; 4]) -> Option<(&'a Leg, &'a Leg, &'a Leg, &'a Leg)> {
    let puts: Vec<&Leg> = legs
        .iter()
        .copied()
        .filter(|l| l.option_type == OptionType::Put)
        .collect();
    let calls: Vec<&Leg> = legs
        .iter()
        .copied()
        .filter(|l| l.option_type == OptionType::Call)
        .collect();
    let (&[put_low, put_high], &[call_low, call_high]) = (puts.as_slice(), calls.as_slice()) else {
        return None;
    };
    if same_strike(put_low.strike, put_high.strike) || same_strike(call_low.strike, call_high.strike)
    {
        return None;
    }
    if put_high.strike > call_low.strike && !same_strike(put_high.strike, call_low.strike) {
        return None;
    }
    Some((put_low, put_high, call_low, call_high))
}

fn custom(sorted: &[Leg]) -> Classification {
    let direction = match center_strike(sorted) {
        Some(center) => sorted
            .iter()
            .min_by_key(|l| {
                (
                    Reverse(l.quantity.unsigned_abs()),
                    OrderedFloat((l.strike - center).abs()),
                    OrderedFloat(l.strike),
                )
            })
            .map_or(Side::Long, Leg::side),
        None => Side::Long,
    };
    Classification {
        position_type: PositionType::Custom,
        direction,
        is_symmetric: None,
    }
}

/// Median strike across legs (the structure's center).
pub fn center_strike(legs: &[Leg]) -> Option<f64> {
    let mut strikes: Vec<f64> = legs.iter().map(|l| l.strike).collect();
    if strikes.is_empty() {
        return None;
    }
    strikes.sort_by_key(|k| OrderedFloat(*k));
    let mid = strikes.len() / 2;
    if strikes.len() % 2 == 1 {
        Some(strikes[mid])
    } else {
        Some((strikes[mid - 1] + strikes[mid]) / 2.0)
    }
}

/// Wing width for a recognized shape; `None` for shapes without wings or
/// with unequal wings.
pub fn wing_width(legs: &[Leg], position_type: PositionType) -> Option<f64> {
    let sorted = sort_legs(legs);
    let strikes: Vec<f64> = sorted.iter().map(|l| l.strike).collect();
    let equal_wings = |lower: f64, upper: f64| same_strike(lower, upper).then_some(lower);

    match (position_type, strikes.as_slice()) {
        (PositionType::Vertical, [low, high]) => Some((high - low).abs()),
        (PositionType::Strangle, [a, b]) => Some((b - a).abs() / 2.0),
        (PositionType::Butterfly, [low, mid, high]) => equal_wings(mid - low, high - mid),
        // Iron legs sort puts before calls at a shared strike, so strikes stay ascending
        (
            PositionType::Condor | PositionType::IronFly | PositionType::IronCondor,
            [k0, k1, k2, k3],
        ) => equal_wings(k1 - k0, k3 - k2),
        _ => None,
    }
}

/// Earliest expiration across legs.
pub fn primary_expiration(legs: &[Leg]) -> Option<NaiveDate> {
    legs.iter().map(|l| l.expiration).min()
}

/// Majority right by contract count; ties go to calls.
pub fn dominant_side(legs: &[Leg]) -> OptionType {
    let (calls, puts) = legs.iter().fold((0u64, 0u64), |(c, p), l| match l.option_type {
        OptionType::Call => (c + u64::from(l.contracts()), p),
        OptionType::Put => (c, p + u64::from(l.contracts())),
    });
    if puts > calls {
        OptionType::Put
    } else {
        OptionType::Call
    }
}
