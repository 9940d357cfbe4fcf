use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tiered outcome of the feasibility classification.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum FeasibilityRating {
    Low,
    Medium,
    High,
}

impl FeasibilityRating {
    /// Maximum value of the feasibility gauge.
    pub const GAUGE_MAX: u8 = 3;

    /// Filled segments of the feasibility gauge (out of `GAUGE_MAX`).
    pub fn gauge_value(self) -> u8 {
        match self {
            FeasibilityRating::High => 3,
            FeasibilityRating::Medium => 2,
            FeasibilityRating::Low => 1,
        }
    }

    /// Score of the rating on the 0-100 radar scale.
    pub fn radar_score(self) -> f64 {
        match self {
            FeasibilityRating::High => 100.0,
            FeasibilityRating::Medium => 60.0,
            FeasibilityRating::Low => 30.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeasibilityRating::High => "High",
            FeasibilityRating::Medium => "Medium",
            FeasibilityRating::Low => "Low",
        }
    }
}

impl fmt::Display for FeasibilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Qualitative groundwater storage potential of an aquifer.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum CapacityTier {
    Low,
    Medium,
    High,
}

impl FromStr for CapacityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(CapacityTier::Low),
            "medium" => Ok(CapacityTier::Medium),
            "high" => Ok(CapacityTier::High),
            other => Err(format!("unknown capacity tier: {other}")),
        }
    }
}

impl fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CapacityTier::Low => "Low",
            CapacityTier::Medium => "Medium",
            CapacityTier::High => "High",
        };
        f.pad(s)
    }
}

/// Latitude/longitude in decimal degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Aquifer details shown next to the map marker.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AquiferInfo {
    #[serde(rename = "type")]
    pub aquifer_type: String,
    pub capacity_tier: CapacityTier,
    pub coordinates: Coordinates,
}

/// One bar of the rainfall chart.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MonthlyValue {
    pub label: String,
    /// Rainfall in millimeters
    pub value: f64,
}

/// One axis of the site radar chart, scored 0-100.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RadarAxis {
    pub metric: String,
    pub value: f64,
}

/// Recharge structures suggested for the available open space.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RechargeStructure {
    RechargePit,
    RechargeShaft,
    Trench,
    RainBarrelTank,
}

impl fmt::Display for RechargeStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RechargeStructure::RechargePit => "Recharge Pit",
            RechargeStructure::RechargeShaft => "Recharge Shaft",
            RechargeStructure::Trench => "Trench",
            RechargeStructure::RainBarrelTank => "Rain Barrel / Tank",
        };
        f.pad(s)
    }
}

/// Three-level status used by the groundwater and payback gauges.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Outlook {
    Excellent,
    Moderate,
    Critical,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outlook::Excellent => "Excellent",
            Outlook::Moderate => "Moderate",
            Outlook::Critical => "Critical",
        };
        f.pad(s)
    }
}

/// Groundwater level gauge: 100% fill means water at the surface.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct GroundwaterGauge {
    pub status: Outlook,
    pub fill_percent: f64,
}

/// Payback gauge: 100% progress at or below the target payback period.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PaybackGauge {
    pub status: Outlook,
    pub progress_percent: u8,
}

/// The full set of derived figures for one site submission.
///
/// A snapshot is produced whole by the estimator and replaced whole on the
/// next submission; nothing mutates it field by field.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub feasibility_rating: FeasibilityRating,
    /// Harvestable volume per year in liters
    pub annual_runoff_liters: f64,
    /// Depth to the water table in meters
    pub groundwater_depth_meters: f64,
    pub estimated_cost_currency: f64,
    pub estimated_annual_savings_currency: f64,
    /// Cost divided by savings; `None` when there are no savings
    pub payback_years: Option<f64>,
    pub aquifer_info: AquiferInfo,
    /// Twelve entries, January first
    pub monthly_series: Vec<MonthlyValue>,
    /// Household demand per year in liters
    pub required_annual_consumption_liters: f64,
    /// Runoff divided by demand; `None` when there is no demand
    pub demand_coverage_ratio: Option<f64>,
    pub recharge_structures: Vec<RechargeStructure>,
    pub radar_profile: Vec<RadarAxis>,
    pub groundwater_gauge: GroundwaterGauge,
    pub payback_gauge: PaybackGauge,
    pub summary: String,
}

impl DerivedMetrics {
    pub fn annual_runoff_cubic_meters(&self) -> f64 {
        self.annual_runoff_liters / 1000.0
    }

    /// Payback period for display, `"N/A"` when undefined.
    pub fn payback_label(&self) -> String {
        match self.payback_years {
            Some(years) if years.is_finite() => format!("{years:.1} years"),
            _ => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_gauge_and_radar() {
        assert_eq!(FeasibilityRating::High.gauge_value(), FeasibilityRating::GAUGE_MAX);
        assert_eq!(FeasibilityRating::Medium.gauge_value(), 2);
        assert_eq!(FeasibilityRating::Low.gauge_value(), 1);
        assert_eq!(FeasibilityRating::Medium.radar_score(), 60.0);
        assert!(FeasibilityRating::Low < FeasibilityRating::High);
    }

    #[test]
    fn test_capacity_tier_from_str() {
        assert_eq!("High".parse::<CapacityTier>(), Ok(CapacityTier::High));
        assert_eq!(" medium ".parse::<CapacityTier>(), Ok(CapacityTier::Medium));
        assert!("vast".parse::<CapacityTier>().is_err());
    }

    #[test]
    fn test_aquifer_info_serializes_type_field() {
        let info = AquiferInfo {
            aquifer_type: "Alluvial Aquifer".to_string(),
            capacity_tier: CapacityTier::High,
            coordinates: Coordinates {
                lat: 23.3441,
                lng: 85.3096,
            },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "Alluvial Aquifer");
        assert_eq!(json["capacity_tier"], "High");
        assert_eq!(json["coordinates"]["lng"], 85.3096);
    }

    #[test]
    fn test_structure_names() {
        assert_eq!(RechargeStructure::RainBarrelTank.to_string(), "Rain Barrel / Tank");
        assert_eq!(RechargeStructure::RechargeShaft.to_string(), "Recharge Shaft");
    }
}
