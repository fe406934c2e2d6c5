#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use optpos::engine::types::{Leg, OptionType};

/// March 2024 monthly expiration used by most fixtures.
pub fn near_exp() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// April 2024 monthly expiration, the far leg of calendars and diagonals.
pub fn far_exp() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 19).unwrap()
}

/// Reference clock: 30 calendar days before `near_exp()`.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 14, 15, 30, 0).unwrap()
}

pub fn call(strike: f64, quantity: i32) -> Leg {
    Leg::call(strike, near_exp(), quantity)
}

pub fn put(strike: f64, quantity: i32) -> Leg {
    Leg::put(strike, near_exp(), quantity)
}

pub fn leg_on(strike: f64, expiration: NaiveDate, option_type: OptionType, quantity: i32) -> Leg {
    Leg::new(strike, expiration, option_type, quantity)
}

/// 5900/5950 long call vertical.
pub fn bull_call_vertical() -> Vec<Leg> {
    vec![call(5900.0, 1), call(5950.0, -1)]
}

/// 5850/5900 put spread plus 5950/6000 call spread, sold.
pub fn short_iron_condor() -> Vec<Leg> {
    vec![
        put(5850.0, 1),
        put(5900.0, -1),
        call(5950.0, -1),
        call(6000.0, 1),
    ]
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}
