use rwh_utils::coerce::{count_or_zero, non_negative, quantity_or_zero, unit_fraction};
use serde::{Deserialize, Serialize};

/// Default form values shown on a fresh dashboard.
pub const DEFAULT_ROOF_AREA: &str = "120";
pub const DEFAULT_DWELLERS: &str = "4";
pub const DEFAULT_OPEN_SPACE: &str = "50";
pub const DEFAULT_LOCATION: &str = "Ranchi, Jharkhand";
pub const DEFAULT_RAINFALL_MM: &str = "750";

/// Site details exactly as a form collected them: every field optional text.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct RawSiteInput {
    pub location: Option<String>,
    pub roof_area: Option<String>,
    pub dwellers: Option<String>,
    pub open_space: Option<String>,
    pub runoff_coefficient: Option<String>,
    pub rainfall_mm: Option<String>,
}

impl RawSiteInput {
    /// The values a new dashboard starts with.
    pub fn dashboard_defaults() -> Self {
        Self {
            location: Some(DEFAULT_LOCATION.to_string()),
            roof_area: Some(DEFAULT_ROOF_AREA.to_string()),
            dwellers: Some(DEFAULT_DWELLERS.to_string()),
            open_space: Some(DEFAULT_OPEN_SPACE.to_string()),
            runoff_coefficient: None,
            rainfall_mm: Some(DEFAULT_RAINFALL_MM.to_string()),
        }
    }

    /// Coerce the text fields into a numeric `SiteInput`.
    ///
    /// Never fails: unreadable or missing numbers become 0, a missing or
    /// unreadable runoff coefficient is left for the estimator to default.
    pub fn coerce(&self) -> SiteInput {
        let roof_runoff_coefficient = self
            .runoff_coefficient
            .as_deref()
            .and_then(rwh_utils::coerce::parse_float_prefix)
            .and_then(unit_fraction);
        SiteInput {
            roof_area_sq_m: quantity_or_zero(self.roof_area.as_deref()),
            dweller_count: count_or_zero(self.dwellers.as_deref()),
            open_space_sq_m: quantity_or_zero(self.open_space.as_deref()),
            location: self
                .location
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            roof_runoff_coefficient,
            monthly_rainfall_mm: quantity_or_zero(self.rainfall_mm.as_deref()),
        }
    }
}

/// Numeric site details, the single input of an estimate.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct SiteInput {
    /// Rooftop catchment area in square meters
    pub roof_area_sq_m: f64,
    /// Number of occupants
    pub dweller_count: u32,
    /// Open ground available for recharge structures, in square meters
    pub open_space_sq_m: f64,
    /// Free-text place name
    pub location: String,
    /// Fraction of rainfall captured by the roof; `None` means "use the default"
    pub roof_runoff_coefficient: Option<f64>,
    /// Rainfall driver depth in millimeters (see `RainfallBasis` in `rwh-estimate`)
    pub monthly_rainfall_mm: f64,
}

impl SiteInput {
    /// Clamp every numeric field into its valid range.
    ///
    /// Values built directly (not through `RawSiteInput::coerce`) may carry
    /// negatives or NaN; those become 0, and a coefficient is kept in `[0, 1]`.
    pub fn normalized(&self) -> SiteInput {
        SiteInput {
            roof_area_sq_m: non_negative(self.roof_area_sq_m),
            dweller_count: self.dweller_count,
            open_space_sq_m: non_negative(self.open_space_sq_m),
            location: self.location.trim().to_string(),
            roof_runoff_coefficient: self.roof_runoff_coefficient.and_then(unit_fraction),
            monthly_rainfall_mm: non_negative(self.monthly_rainfall_mm),
        }
    }
}
