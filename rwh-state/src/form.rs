//! Named fields of the site form.

use rwh_site::site_input::RawSiteInput;
use std::fmt;
use std::str::FromStr;

/// One input of the site form.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SiteField {
    Location,
    RoofArea,
    Dwellers,
    OpenSpace,
    RunoffCoefficient,
    RainfallMm,
}

impl SiteField {
    pub const ALL: [SiteField; 6] = [
        SiteField::Location,
        SiteField::RoofArea,
        SiteField::Dwellers,
        SiteField::OpenSpace,
        SiteField::RunoffCoefficient,
        SiteField::RainfallMm,
    ];

    /// The form control name (`roofArea`, `openSpace`, ...).
    pub fn name(self) -> &'static str {
        match self {
            SiteField::Location => "location",
            SiteField::RoofArea => "roofArea",
            SiteField::Dwellers => "dwellers",
            SiteField::OpenSpace => "openSpace",
            SiteField::RunoffCoefficient => "runoffCoefficient",
            SiteField::RainfallMm => "rainfallMm",
        }
    }

    /// Write `value` into the matching slot of a draft.
    pub fn apply(self, draft: &mut RawSiteInput, value: String) {
        let slot = match self {
            SiteField::Location => &mut draft.location,
            SiteField::RoofArea => &mut draft.roof_area,
            SiteField::Dwellers => &mut draft.dwellers,
            SiteField::OpenSpace => &mut draft.open_space,
            SiteField::RunoffCoefficient => &mut draft.runoff_coefficient,
            SiteField::RainfallMm => &mut draft.rainfall_mm,
        };
        *slot = Some(value);
    }
}

impl fmt::Display for SiteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SiteField {
    type Err = String;

    /// Accepts the form control name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_ascii_lowercase();
        SiteField::ALL
            .into_iter()
            .find(|field| field.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}
