//! Black-Scholes-Merton pricing with continuous dividend yield.
//!
//! Time to expiry is always in calendar years (`days / 365`). Theta is
//! reported per calendar day, vega and rho per one-point (1%) move.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
#![allow(clippy::many_single_char_names)]

use garde::Validate;
use statrs::function::erf::erfc;
use std::f64::consts::{PI, SQRT_2};

use super::types::{BlackScholesInput, BlackScholesResult, Greeks, OptionType};
use crate::error::EngineResult;

/// Calendar-day convention for time to expiry.
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Convert calendar days to years for pricing.
pub fn years_from_days(days: i64) -> f64 {
    days as f64 / CALENDAR_DAYS_PER_YEAR
}

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

pub fn d1(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

pub fn d2(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    d1(s, k, t, r, q, sigma) - sigma * t.sqrt()
}

/// Price one option and its Greeks. Malformed inputs are rejected before any
/// arithmetic; an expired option (`time_to_expiry <= 0`) prices at intrinsic.
pub fn price(input: &BlackScholesInput) -> EngineResult<BlackScholesResult> {
    input.validate()?;
    Ok(price_unchecked(input))
}

/// Pricing without validation, for callers that already validated their
/// market parameters and only vary spot, volatility or time.
pub(crate) fn price_unchecked(input: &BlackScholesInput) -> BlackScholesResult {
    let BlackScholesInput {
        spot: s,
        strike: k,
        time_to_expiry: t,
        volatility: sigma,
        risk_free_rate: r,
        dividend_yield: q,
        option_type,
    } = *input;

    if t <= 0.0 {
        return expired(s, k, option_type);
    }

    let sqrt_t = t.sqrt();
    let d1 = d1(s, k, t, r, q, sigma);
    let d2 = d1 - sigma * sqrt_t;
    let df = (-r * t).exp();
    let div_factor = (-q * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let (price, delta, carry, rho) = match option_type {
        OptionType::Call => {
            let nd1 = norm_cdf(d1);
            let nd2 = norm_cdf(d2);
            (
                s * div_factor * nd1 - k * df * nd2,
                div_factor * nd1,
                -r * k * df * nd2 + q * s * div_factor * nd1,
                k * t * df * nd2,
            )
        }
        OptionType::Put => {
            let nmd1 = norm_cdf(-d1);
            let nmd2 = norm_cdf(-d2);
            (
                k * df * nmd2 - s * div_factor * nmd1,
                -div_factor * nmd1,
                r * k * df * nmd2 - q * s * div_factor * nmd1,
                -k * t * df * nmd2,
            )
        }
    };

    // Shared by both rights
    let gamma = div_factor * pdf_d1 / (s * sigma * sqrt_t);
    let vega_raw = s * div_factor * pdf_d1 * sqrt_t;
    let decay = -s * div_factor * pdf_d1 * sigma / (2.0 * sqrt_t);

    BlackScholesResult {
        price,
        greeks: Greeks::new(
            delta,
            gamma,
            (decay + carry) / CALENDAR_DAYS_PER_YEAR,
            vega_raw / 100.0,
            rho / 100.0,
        ),
    }
}

/// Intrinsic value with degenerate Greeks.
fn expired(spot: f64, strike: f64, option_type: OptionType) -> BlackScholesResult {
    let delta = match option_type {
        OptionType::Call => {
            if spot > strike {
                1.0
            } else {
                0.0
            }
        }
        OptionType::Put => {
            if spot < strike {
                -1.0
            } else {
                0.0
            }
        }
    };
    BlackScholesResult {
        price: option_type.intrinsic(spot, strike),
        greeks: Greeks::new(delta, 0.0, 0.0, 0.0, 0.0),
    }
}
