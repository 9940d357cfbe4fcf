//! Listings of the reference data behind the estimator.

use rwh_estimate::{climatology, EstimatorConfig};
use rwh_site::location::{LocationRecord, StaticGeoData};
use rwh_site::metrics::MonthlyValue;
use rwh_utils::coerce::quantity_or_zero;

pub fn location_lines(records: &[LocationRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "{:<24} {:<36} {:<6} {:>8.4} {:>8.4} {:>6.1} m",
                r.name, r.aquifer_type, r.capacity_tier, r.latitude, r.longitude, r.groundwater_depth_m
            )
        })
        .collect()
}

pub fn run_locations() -> anyhow::Result<()> {
    let geo = StaticGeoData::embedded();
    if geo.records().is_empty() {
        anyhow::bail!("Embedded location table is empty");
    }
    for line in location_lines(geo.records()) {
        println!("{line}");
    }
    Ok(())
}

/// Monthly distribution for a raw rainfall value, or the reference
/// climatology when none is given.
pub fn climatology_series(rainfall: Option<&str>, config: &EstimatorConfig) -> Vec<MonthlyValue> {
    match rainfall {
        Some(raw) => climatology::monthly_series(config.annual_rainfall_mm(quantity_or_zero(Some(raw)))),
        None => climatology::reference_series(),
    }
}

pub fn run_climatology(rainfall: Option<&str>, config: &EstimatorConfig) -> anyhow::Result<()> {
    let series = climatology_series(rainfall, config);
    let total: f64 = series.iter().map(|m| m.value).sum();
    for month in &series {
        println!("{} {:>7.1}", month.label, month.value);
    }
    println!("Total {:.1} mm", total);
    Ok(())
}
