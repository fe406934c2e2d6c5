//! Trading-day volatility helpers. Pricing time uses the calendar convention
//! in `pricing`; the two conventions are never mixed.

use statrs::statistics::Statistics;

use crate::error::{EngineError, EngineResult};

/// Trading sessions per year for volatility annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Scale a per-period standard deviation to an annual figure.
pub fn annualize_volatility(period_std: f64, periods_per_year: f64) -> f64 {
    period_std * periods_per_year.sqrt()
}

/// Annualized close-to-close volatility from daily closes (sample standard
/// deviation of log returns, 252-day year).
pub fn realized_volatility(closes: &[f64]) -> EngineResult<f64> {
    if closes.len() < 3 {
        return Err(EngineError::invalid_input(format!(
            "realized volatility needs at least 3 closes (got {})",
            closes.len()
        )));
    }
    if let Some(bad) = closes.iter().find(|c| !c.is_finite() || **c <= 0.0) {
        return Err(EngineError::invalid_input(format!(
            "closes must be positive and finite (got {bad})"
        )));
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let daily = (&returns).std_dev();
    Ok(annualize_volatility(daily, TRADING_DAYS_PER_YEAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annualize_daily() {
        let annual = annualize_volatility(0.01, TRADING_DAYS_PER_YEAR);
        assert!((annual - 0.01 * 252.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn flat_prices_have_zero_vol() {
        let vol = realized_volatility(&[100.0, 100.0, 100.0, 100.0]).unwrap();
        assert!(vol.abs() < 1e-12);
    }

    #[test]
    fn alternating_returns() {
        // Log returns +r, -r, +r, -r: sample std = r * sqrt(4/3)
        let up = 1.01_f64;
        let closes = [100.0, 100.0 * up, 100.0, 100.0 * up, 100.0];
        let r = up.ln();
        let expected = r * (4.0_f64 / 3.0).sqrt() * 252.0_f64.sqrt();
        let vol = realized_volatility(&closes).unwrap();
        assert!((vol - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_short_or_bad_series() {
        assert!(realized_volatility(&[100.0, 101.0]).is_err());
        assert!(realized_volatility(&[100.0, 0.0, 101.0]).is_err());
        assert!(realized_volatility(&[100.0, f64::NAN, 101.0]).is_err());
    }
}
