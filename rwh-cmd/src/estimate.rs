//! Single-site estimate: publish through a dashboard store, then print.

use crate::SiteArgs;
use log::info;
use rwh_estimate::{Estimator, EstimatorConfig};
use rwh_site::metrics::{DerivedMetrics, FeasibilityRating};
use rwh_site::site_input::{RawSiteInput, SiteInput};
use rwh_state::DashboardStore;
use rwh_utils::format::{format_currency, format_indian, format_liters};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Run an estimate for the given site form values.
///
/// The result goes through a `DashboardStore` the same way a dashboard
/// submission does; `delay_ms` holds it back before publishing.
pub async fn run_estimate(
    site: &SiteArgs,
    config: EstimatorConfig,
    json: bool,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let store = Arc::new(DashboardStore::with_defaults(Estimator::with_config(config)));
    let input = site.to_raw().coerce();

    let published = if delay_ms > 0 {
        info!("Publishing estimate after {} ms", delay_ms);
        store
            .submit_delayed(input, Duration::from_millis(delay_ms))
            .wait()
            .await
    } else {
        store.submit(input)
    };
    if !published {
        anyhow::bail!("Estimate was superseded before it could be published");
    }

    let snapshot = store.current();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.metrics)?);
    } else {
        print!("{}", render_report(&snapshot.input, &snapshot.metrics));
    }
    Ok(())
}

/// Estimate one site with no store involved.
pub fn estimate_raw(estimator: &Estimator, raw: &RawSiteInput) -> (SiteInput, DerivedMetrics) {
    let input = raw.coerce();
    let metrics = estimator.estimate(&input);
    (input, metrics)
}

fn percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{:.0}%", r * 100.0),
        _ => "N/A".to_string(),
    }
}

/// Human-readable report of one snapshot.
pub struct Report<'a> {
    pub input: &'a SiteInput,
    pub metrics: &'a DerivedMetrics,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = self.metrics;
        let aquifer = &metrics.aquifer_info;
        let location = if self.input.location.is_empty() {
            "(no location)"
        } else {
            self.input.location.as_str()
        };

        writeln!(f, "Site: {location}")?;
        writeln!(
            f,
            "Feasibility: {} ({}/{})",
            metrics.feasibility_rating,
            metrics.feasibility_rating.gauge_value(),
            FeasibilityRating::GAUGE_MAX
        )?;
        writeln!(
            f,
            "Annual runoff: {} L ({} m3)",
            format_liters(metrics.annual_runoff_liters),
            format_indian(metrics.annual_runoff_cubic_meters(), 2)
        )?;
        writeln!(
            f,
            "Household demand: {} L/yr ({} covered)",
            format_liters(metrics.required_annual_consumption_liters),
            percent(metrics.demand_coverage_ratio)
        )?;
        writeln!(
            f,
            "Groundwater depth: {:.1} m ({}, gauge {:.0}%)",
            metrics.groundwater_depth_meters,
            metrics.groundwater_gauge.status,
            metrics.groundwater_gauge.fill_percent
        )?;
        writeln!(
            f,
            "Aquifer: {}, capacity {} at {:.4}, {:.4}",
            aquifer.aquifer_type,
            aquifer.capacity_tier,
            aquifer.coordinates.lat,
            aquifer.coordinates.lng
        )?;
        writeln!(f, "Estimated cost: {}", format_currency(metrics.estimated_cost_currency))?;
        writeln!(
            f,
            "Annual savings: {}",
            format_currency(metrics.estimated_annual_savings_currency)
        )?;
        writeln!(
            f,
            "Payback: {} ({}, gauge {}%)",
            metrics.payback_label(),
            metrics.payback_gauge.status,
            metrics.payback_gauge.progress_percent
        )?;
        let structures: Vec<String> = metrics
            .recharge_structures
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(f, "Suggested structures: {}", structures.join(", "))?;
        writeln!(f, "Monthly rainfall (mm):")?;
        for month in &metrics.monthly_series {
            writeln!(f, "  {} {:>7.1}", month.label, month.value)?;
        }
        writeln!(f, "{}", metrics.summary)
    }
}

pub fn render_report(input: &SiteInput, metrics: &DerivedMetrics) -> String {
    Report { input, metrics }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(roof: &str, dwellers: &str, rainfall: &str) -> RawSiteInput {
        RawSiteInput {
            location: Some("Ranchi, Jharkhand".to_string()),
            roof_area: Some(roof.to_string()),
            dwellers: Some(dwellers.to_string()),
            open_space: Some("25".to_string()),
            runoff_coefficient: Some("0.85".to_string()),
            rainfall_mm: Some(rainfall.to_string()),
        }
    }

    #[test]
    fn test_estimate_raw() {
        let (input, metrics) = estimate_raw(&Estimator::default(), &raw("100", "4", "750"));
        assert_eq!(input.dweller_count, 4);
        assert_eq!(metrics.feasibility_rating, FeasibilityRating::High);
    }

    #[test]
    fn test_render_report() {
        let (input, metrics) = estimate_raw(&Estimator::default(), &raw("120", "4", "750"));
        let report = render_report(&input, &metrics);
        assert!(report.starts_with("Site: Ranchi, Jharkhand\n"));
        assert!(report.contains("Feasibility: High (3/3)"));
        assert!(report.contains("Annual runoff: 76,500 L (76.5 m3)"));
        assert!(report.contains("Household demand: 1,46,000 L/yr (52% covered)"));
        assert!(report.contains("Estimated cost: \u{20b9}18,000"));
        assert!(report.contains("Suggested structures: Recharge Pit, Trench"));
        assert!(report.contains("  Jul"));
    }

    #[test]
    fn test_render_report_empty_site() {
        let (input, metrics) = estimate_raw(&Estimator::default(), &RawSiteInput::default());
        let report = render_report(&input, &metrics);
        assert!(report.starts_with("Site: (no location)\n"));
        assert!(report.contains("Feasibility: Low (1/3)"));
        assert!(report.contains("Payback: N/A (Critical, gauge 0%)"));
        assert!(report.contains("Household demand: 0 L/yr (N/A covered)"));
    }

    #[tokio::test]
    async fn test_run_estimate_with_delay() {
        let site = SiteArgs {
            location: Some("Jaipur".to_string()),
            roof_area: Some("80".to_string()),
            dwellers: Some("3".to_string()),
            rainfall: Some("600".to_string()),
            ..SiteArgs::default()
        };
        run_estimate(&site, EstimatorConfig::default(), true, 5)
            .await
            .unwrap();
    }
}
