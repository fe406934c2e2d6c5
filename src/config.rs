//! Engine configuration: market defaults, grid shape and solver settings.
//!
//! Values come from an optional TOML file, then `OPTPOS_*` environment
//! overrides, and are validated once after loading.

use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::engine::iv::IvSolverConfig;
use crate::engine::types::{finite, grid_range, DEFAULT_MULTIPLIER};
use crate::error::{EngineError, EngineResult};

pub const CONFIG_PATH_VAR: &str = "OPTPOS_CONFIG";

fn default_risk_free_rate() -> f64 {
    0.05
}

fn default_multiplier() -> i32 {
    DEFAULT_MULTIPLIER
}

fn default_price_range() -> f64 {
    0.10
}

fn default_num_points() -> usize {
    201
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct PricingConfig {
    #[serde(default = "default_risk_free_rate")]
    #[garde(custom(finite))]
    pub risk_free_rate: f64,
    #[serde(default)]
    #[garde(custom(finite))]
    pub dividend_yield: f64,
    #[serde(default = "default_multiplier")]
    #[garde(range(min = 1))]
    pub multiplier: i32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: 0.0,
            multiplier: default_multiplier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SimulationConfig {
    #[serde(default = "default_price_range")]
    #[garde(custom(grid_range))]
    pub price_range: f64,
    #[serde(default = "default_num_points")]
    #[garde(range(min = 2, max = 100_000))]
    pub num_points: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            price_range: default_price_range(),
            num_points: default_num_points(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct EngineConfig {
    #[serde(default)]
    #[garde(dive)]
    pub pricing: PricingConfig,
    #[serde(default)]
    #[garde(dive)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    #[garde(dive)]
    pub iv: IvSolverConfig,
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| EngineError::config(format!("invalid TOML: {e}")))?;
        config.checked()
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults, then the file named by `OPTPOS_CONFIG` (if set), then
    /// per-field environment overrides.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                tracing::debug!(%path, "loading engine config");
                Self::load(Path::new(&path))?
            }
            None => Self::default(),
        };

        override_from(&lookup, "OPTPOS_RISK_FREE_RATE", &mut config.pricing.risk_free_rate)?;
        override_from(&lookup, "OPTPOS_DIVIDEND_YIELD", &mut config.pricing.dividend_yield)?;
        override_from(&lookup, "OPTPOS_MULTIPLIER", &mut config.pricing.multiplier)?;
        override_from(&lookup, "OPTPOS_PRICE_RANGE", &mut config.simulation.price_range)?;
        override_from(&lookup, "OPTPOS_NUM_POINTS", &mut config.simulation.num_points)?;

        config.checked()
    }

    fn checked(self) -> EngineResult<Self> {
        self.validate()
            .map_err(|report| EngineError::config(report.to_string()))?;
        Ok(self)
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T) -> EngineResult<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| EngineError::config(format!("{key}={raw}: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert!((c.pricing.risk_free_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(c.pricing.multiplier, 100);
        assert_eq!(c.simulation.num_points, 201);
        assert_eq!(c.iv.max_iterations, 100);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = EngineConfig::from_toml_str(
            r"
            [pricing]
            risk_free_rate = 0.043

            [iv]
            tolerance = 1e-6
            ",
        )
        .unwrap();
        assert!((c.pricing.risk_free_rate - 0.043).abs() < f64::EPSILON);
        assert_eq!(c.pricing.multiplier, 100);
        assert!((c.iv.tolerance - 1e-6).abs() < f64::EPSILON);
        assert!((c.iv.max_vol - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = EngineConfig::from_toml_str("[simulation]\nnum_points = 1\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(EngineConfig::from_toml_str("[pricing\n").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let c = EngineConfig::from_lookup(lookup(&[
            ("OPTPOS_RISK_FREE_RATE", "0.03"),
            ("OPTPOS_NUM_POINTS", " 101 "),
        ]))
        .unwrap();
        assert!((c.pricing.risk_free_rate - 0.03).abs() < f64::EPSILON);
        assert_eq!(c.simulation.num_points, 101);
    }

    #[test]
    fn env_override_parse_error() {
        let err = EngineConfig::from_lookup(lookup(&[("OPTPOS_MULTIPLIER", "lots")])).unwrap_err();
        assert!(matches!(err, EngineError::Config(msg) if msg.contains("OPTPOS_MULTIPLIER")));
    }

    #[test]
    fn file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nprice_range = 0.2\nnum_points = 51").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let c = EngineConfig::from_lookup(lookup(&[
            (CONFIG_PATH_VAR, path.as_str()),
            ("OPTPOS_PRICE_RANGE", "0.15"),
        ]))
        .unwrap();
        assert!((c.simulation.price_range - 0.15).abs() < f64::EPSILON);
        assert_eq!(c.simulation.num_points, 51);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err =
            EngineConfig::from_lookup(lookup(&[(CONFIG_PATH_VAR, "/nonexistent/optpos.toml")]))
                .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn nan_price_range_override_is_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("OPTPOS_PRICE_RANGE", "NaN")])).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
