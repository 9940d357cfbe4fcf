//! Estimator constants and policies.

use anyhow::Context;
use rwh_utils::coerce::{non_negative, unit_fraction};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_RUNOFF_COEFFICIENT: f64 = 0.85;
pub const DEFAULT_PER_CAPITA_DAILY_LITERS: f64 = 100.0;
pub const DEFAULT_COST_PER_SQ_M: f64 = 150.0;
pub const DEFAULT_SAVINGS_PER_LITER: f64 = 0.01;

/// How the rainfall driver depth of a `SiteInput` is read.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBasis {
    /// The depth already is the yearly total.
    #[default]
    Annualized,
    /// The depth is an average month; the yearly total is twelve times it.
    PerMonth,
}

/// Which rule decides the feasibility rating.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityPolicy {
    /// Roof area and dweller thresholds (High: 100 m² and 4 dwellers,
    /// Medium: 50 m² and 2 dwellers).
    #[default]
    FixedThreshold,
    /// Runoff against household demand (High: covers it, Medium: covers half).
    DemandRatio,
}

/// Constants and policies applied to every estimate.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Runoff coefficient used when a site does not give one
    pub default_runoff_coefficient: f64,
    /// Household demand per person per day, in liters
    pub per_capita_daily_liters: f64,
    /// Construction cost per square meter of roof
    pub cost_per_sq_m: f64,
    /// Value of one harvested liter
    pub savings_per_liter: f64,
    pub rainfall_basis: RainfallBasis,
    pub feasibility_policy: FeasibilityPolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_runoff_coefficient: DEFAULT_RUNOFF_COEFFICIENT,
            per_capita_daily_liters: DEFAULT_PER_CAPITA_DAILY_LITERS,
            cost_per_sq_m: DEFAULT_COST_PER_SQ_M,
            savings_per_liter: DEFAULT_SAVINGS_PER_LITER,
            rainfall_basis: RainfallBasis::default(),
            feasibility_policy: FeasibilityPolicy::default(),
        }
    }
}

impl EstimatorConfig {
    /// Parse a JSON config; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: EstimatorConfig =
            serde_json::from_str(json).context("Invalid estimator config JSON")?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Yearly rainfall depth in mm for a site's rainfall driver.
    pub fn annual_rainfall_mm(&self, rainfall_mm: f64) -> f64 {
        match self.rainfall_basis {
            RainfallBasis::Annualized => rainfall_mm,
            RainfallBasis::PerMonth => rainfall_mm * 12.0,
        }
    }

    /// Clamp constants into range: negative or non-finite values become 0
    /// and the default coefficient stays in `[0, 1]`.
    pub fn sanitized(self) -> Self {
        Self {
            default_runoff_coefficient: unit_fraction(self.default_runoff_coefficient)
                .unwrap_or(DEFAULT_RUNOFF_COEFFICIENT),
            per_capita_daily_liters: non_negative(self.per_capita_daily_liters),
            cost_per_sq_m: non_negative(self.cost_per_sq_m),
            savings_per_liter: non_negative(self.savings_per_liter),
            ..self
        }
    }
}
