//! Core types for rooftop rainwater harvesting estimates.
//!
//! - `site_input`: the form-facing `RawSiteInput` and the coerced `SiteInput`
//! - `metrics`: the `DerivedMetrics` snapshot and its display parts
//! - `geo`: the `GeoDataProvider` capability for aquifer and groundwater data
//! - `location`: the embedded location table backing the default provider

pub mod geo;
pub mod location;
pub mod metrics;
pub mod site_input;
