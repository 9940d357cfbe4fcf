use crate::config::EstimatorConfig;
use crate::{climatology, economics, feasibility, insights, runoff};
use log::debug;
use rwh_site::geo::GeoDataProvider;
use rwh_site::location::StaticGeoData;
use rwh_site::metrics::DerivedMetrics;
use rwh_site::site_input::SiteInput;
use std::sync::Arc;

/// Stateless estimator: configuration plus an injected geo data source.
///
/// Cloning is cheap; clones share the provider.
#[derive(Clone)]
pub struct Estimator {
    config: EstimatorConfig,
    geo: Arc<dyn GeoDataProvider + Send + Sync>,
}

impl Estimator {
    pub fn new(config: EstimatorConfig, geo: Arc<dyn GeoDataProvider + Send + Sync>) -> Self {
        Self {
            config: config.sanitized(),
            geo,
        }
    }

    /// Estimator over the embedded location table.
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self::new(config, Arc::new(StaticGeoData::embedded()))
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Derive the full metrics snapshot for one site.
    ///
    /// Pure and infallible: the same input always gives the same snapshot,
    /// and out-of-range input is clamped to zero before any formula runs.
    pub fn estimate(&self, input: &SiteInput) -> DerivedMetrics {
        let input = input.normalized();
        let config = &self.config;

        let coefficient = input
            .roof_runoff_coefficient
            .unwrap_or(config.default_runoff_coefficient);
        let annual_rainfall_mm = config.annual_rainfall_mm(input.monthly_rainfall_mm);

        let annual_runoff_liters =
            runoff::annual_runoff_liters(input.roof_area_sq_m, annual_rainfall_mm, coefficient);
        let required_annual_consumption_liters = runoff::required_annual_consumption_liters(
            input.dweller_count,
            config.per_capita_daily_liters,
        );
        let feasibility_rating = feasibility::classify(
            config.feasibility_policy,
            input.roof_area_sq_m,
            input.dweller_count,
            annual_runoff_liters,
            required_annual_consumption_liters,
        );

        let estimated_cost_currency =
            economics::estimated_cost(input.roof_area_sq_m, config.cost_per_sq_m);
        let estimated_annual_savings_currency =
            economics::annual_savings(annual_runoff_liters, config.savings_per_liter);
        let payback_years =
            economics::payback_years(estimated_cost_currency, estimated_annual_savings_currency);

        let (aquifer_info, groundwater_depth_meters) = self.geo.lookup_site(&input.location);

        debug!(
            "Estimated {:?}: {:.0} L/yr runoff, {:.0} L/yr demand, rating {}",
            input.location, annual_runoff_liters, required_annual_consumption_liters, feasibility_rating
        );

        DerivedMetrics {
            feasibility_rating,
            annual_runoff_liters,
            groundwater_depth_meters,
            estimated_cost_currency,
            estimated_annual_savings_currency,
            payback_years,
            aquifer_info,
            monthly_series: climatology::monthly_series(annual_rainfall_mm),
            required_annual_consumption_liters,
            demand_coverage_ratio: runoff::coverage_ratio(
                annual_runoff_liters,
                required_annual_consumption_liters,
            ),
            recharge_structures: insights::recharge_structures(input.open_space_sq_m),
            radar_profile: insights::radar_profile(
                input.roof_area_sq_m,
                input.dweller_count,
                annual_rainfall_mm,
                input.open_space_sq_m,
                feasibility_rating,
            ),
            groundwater_gauge: insights::groundwater_gauge(groundwater_depth_meters),
            payback_gauge: economics::payback_gauge(payback_years),
            summary: insights::summary(
                input.roof_area_sq_m,
                input.dweller_count,
                feasibility_rating,
                annual_runoff_liters,
            ),
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_config(EstimatorConfig::default())
    }
}
