//! Feasibility estimation for rooftop rainwater harvesting.
//!
//! This crate turns one `SiteInput` into one `DerivedMetrics` snapshot.
//! Every figure shown on the dashboard comes from here; display code only
//! reads the snapshot.

pub mod config;
mod estimator;

pub use config::{EstimatorConfig, FeasibilityPolicy, RainfallBasis};
pub use estimator::Estimator;

/// Runoff volume and household demand.
pub mod runoff {
    use rwh_utils::coerce::saturating_non_negative;

    pub const DAYS_PER_YEAR: f64 = 365.0;

    /// Harvestable liters per year: 1 mm of rain on 1 m² yields 1 liter.
    ///
    /// Overflowing products saturate at `f64::MAX`; an overflow times a zero
    /// coefficient is 0.
    pub fn annual_runoff_liters(roof_area_sq_m: f64, annual_rainfall_mm: f64, coefficient: f64) -> f64 {
        saturating_non_negative(roof_area_sq_m * annual_rainfall_mm * coefficient)
    }

    /// Liters a household uses in a year.
    pub fn required_annual_consumption_liters(dwellers: u32, per_capita_daily_liters: f64) -> f64 {
        saturating_non_negative(f64::from(dwellers) * per_capita_daily_liters * DAYS_PER_YEAR)
    }

    /// Share of demand the runoff covers, `None` for a household with no demand.
    pub fn coverage_ratio(runoff_liters: f64, demand_liters: f64) -> Option<f64> {
        if demand_liters > 0.0 {
            Some(runoff_liters / demand_liters)
        } else {
            None
        }
    }

}

/// Feasibility rating rules.
pub mod feasibility {
    use crate::config::FeasibilityPolicy;
    use rwh_site::metrics::FeasibilityRating;

    pub const HIGH_MIN_ROOF_AREA_SQ_M: f64 = 100.0;
    pub const HIGH_MIN_DWELLERS: u32 = 4;
    pub const MEDIUM_MIN_ROOF_AREA_SQ_M: f64 = 50.0;
    pub const MEDIUM_MIN_DWELLERS: u32 = 2;

    /// Rate a site by roof area and household size.
    ///
    /// A site harvesting nothing is Low whatever its size.
    pub fn classify_fixed_threshold(
        roof_area_sq_m: f64,
        dwellers: u32,
        runoff_liters: f64,
    ) -> FeasibilityRating {
        if runoff_liters.is_nan() || runoff_liters <= 0.0 {
            FeasibilityRating::Low
        } else if roof_area_sq_m >= HIGH_MIN_ROOF_AREA_SQ_M && dwellers >= HIGH_MIN_DWELLERS {
            FeasibilityRating::High
        } else if roof_area_sq_m >= MEDIUM_MIN_ROOF_AREA_SQ_M && dwellers >= MEDIUM_MIN_DWELLERS {
            FeasibilityRating::Medium
        } else {
            FeasibilityRating::Low
        }
    }

    /// Rate a site by how much of its demand the runoff covers.
    ///
    /// A site harvesting nothing is Low even when it has no demand.
    pub fn classify_demand_ratio(runoff_liters: f64, demand_liters: f64) -> FeasibilityRating {
        if runoff_liters <= 0.0 {
            FeasibilityRating::Low
        } else if runoff_liters >= demand_liters {
            FeasibilityRating::High
        } else if runoff_liters >= demand_liters / 2.0 {
            FeasibilityRating::Medium
        } else {
            FeasibilityRating::Low
        }
    }

    pub fn classify(
        policy: FeasibilityPolicy,
        roof_area_sq_m: f64,
        dwellers: u32,
        runoff_liters: f64,
        demand_liters: f64,
    ) -> FeasibilityRating {
        match policy {
            FeasibilityPolicy::FixedThreshold => {
                classify_fixed_threshold(roof_area_sq_m, dwellers, runoff_liters)
            }
            FeasibilityPolicy::DemandRatio => classify_demand_ratio(runoff_liters, demand_liters),
        }
    }

}

/// Cost, savings and payback.
pub mod economics {
    use rwh_site::metrics::{Outlook, PaybackGauge};
    use rwh_utils::coerce::saturating_non_negative;

    /// Payback at or below this many years fills the gauge.
    pub const TARGET_PAYBACK_YEARS: f64 = 5.0;
    /// Payback at or above this many years empties the gauge.
    pub const MAX_PAYBACK_YEARS: f64 = 20.0;
    /// Payback above this many years is Critical.
    pub const CRITICAL_PAYBACK_YEARS: f64 = 15.0;

    pub fn estimated_cost(roof_area_sq_m: f64, cost_per_sq_m: f64) -> f64 {
        saturating_non_negative(roof_area_sq_m * cost_per_sq_m)
    }

    pub fn annual_savings(runoff_liters: f64, savings_per_liter: f64) -> f64 {
        saturating_non_negative(runoff_liters * savings_per_liter)
    }

    /// Years until savings repay the cost; `None` without positive savings.
    pub fn payback_years(cost: f64, savings: f64) -> Option<f64> {
        if savings > 0.0 {
            Some(cost / savings)
        } else {
            None
        }
    }

    pub fn payback_gauge(payback_years: Option<f64>) -> PaybackGauge {
        let Some(years) = payback_years.filter(|y| y.is_finite()) else {
            return PaybackGauge {
                status: Outlook::Critical,
                progress_percent: 0,
            };
        };
        let progress_percent = if years <= TARGET_PAYBACK_YEARS {
            100
        } else if years >= MAX_PAYBACK_YEARS {
            0
        } else {
            let range = MAX_PAYBACK_YEARS - TARGET_PAYBACK_YEARS;
            ((1.0 - (years - TARGET_PAYBACK_YEARS) / range) * 100.0).round() as u8
        };
        let status = if years <= TARGET_PAYBACK_YEARS {
            Outlook::Excellent
        } else if years > CRITICAL_PAYBACK_YEARS {
            Outlook::Critical
        } else {
            Outlook::Moderate
        };
        PaybackGauge {
            status,
            progress_percent,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_payback_years() {
            assert_eq!(payback_years(15_000.0, 1_500.0), Some(10.0));
            assert_eq!(payback_years(15_000.0, 0.0), None);
            assert_eq!(payback_years(0.0, 0.0), None);
            assert_eq!(payback_years(f64::MAX, f64::MAX), Some(1.0));
        }

        #[test]
        fn test_cost_and_savings_saturate() {
            assert_eq!(estimated_cost(f64::MAX, 150.0), f64::MAX);
            assert_eq!(annual_savings(f64::MAX, 0.01), f64::MAX * 0.01);
            assert_eq!(annual_savings(f64::NAN, 0.01), 0.0);
        }

        #[test]
        fn test_payback_gauge() {
            let excellent = payback_gauge(Some(4.0));
            assert_eq!(excellent.status, Outlook::Excellent);
            assert_eq!(excellent.progress_percent, 100);

            let moderate = payback_gauge(Some(10.0));
            assert_eq!(moderate.status, Outlook::Moderate);
            assert_eq!(moderate.progress_percent, 67);

            let critical = payback_gauge(Some(16.0));
            assert_eq!(critical.status, Outlook::Critical);
            assert_eq!(critical.progress_percent, 27);

            assert_eq!(payback_gauge(Some(25.0)).progress_percent, 0);
            assert_eq!(payback_gauge(None).status, Outlook::Critical);
        }
    }
}

/// Seasonal rainfall distribution for the monthly chart.
pub mod climatology {
    use chrono::Month;
    use rwh_site::metrics::MonthlyValue;

    /// Reference monsoon climatology in mm, January first.
    pub const REFERENCE_MONTHLY_MM: [f64; 12] = [
        15.0, 20.0, 35.0, 50.0, 100.0, 250.0, 300.0, 280.0, 200.0, 80.0, 25.0, 10.0,
    ];

    pub fn reference_total_mm() -> f64 {
        REFERENCE_MONTHLY_MM.iter().sum()
    }

    /// Three-letter month labels, January first.
    pub fn month_labels() -> Vec<String> {
        let mut month = Month::January;
        let mut labels = Vec::with_capacity(12);
        for _ in 0..12 {
            labels.push(month.name()[..3].to_string());
            month = month.succ();
        }
        labels
    }

    /// Spread a yearly rainfall depth over the months in the reference
    /// proportions; the twelve values sum to `annual_rainfall_mm`.
    pub fn monthly_series(annual_rainfall_mm: f64) -> Vec<MonthlyValue> {
        let total = reference_total_mm();
        month_labels()
            .into_iter()
            .zip(REFERENCE_MONTHLY_MM)
            .map(|(label, reference_mm)| MonthlyValue {
                label,
                value: annual_rainfall_mm * reference_mm / total,
            })
            .collect()
    }

    /// The reference climatology itself.
    pub fn reference_series() -> Vec<MonthlyValue> {
        monthly_series(reference_total_mm())
    }

}

/// Site suggestions and gauges derived from the core figures.
pub mod insights {
    use rwh_site::metrics::{FeasibilityRating, GroundwaterGauge, Outlook, RadarAxis, RechargeStructure};
    use rwh_utils::format::format_liters;

    /// Depth at which the groundwater gauge is empty.
    pub const MAX_GAUGE_DEPTH_M: f64 = 100.0;
    pub const EXCELLENT_MAX_DEPTH_M: f64 = 30.0;
    pub const MODERATE_MAX_DEPTH_M: f64 = 65.0;

    // Values that score 100 on each radar axis.
    const RADAR_FULL_ROOF_AREA_SQ_M: f64 = 150.0;
    const RADAR_FULL_DWELLERS: f64 = 10.0;
    const RADAR_FULL_RAINFALL_MM: f64 = 1200.0;
    const RADAR_FULL_OPEN_SPACE_SQ_M: f64 = 100.0;

    /// Structures that fit the available open ground.
    pub fn recharge_structures(open_space_sq_m: f64) -> Vec<RechargeStructure> {
        if open_space_sq_m >= 50.0 {
            vec![
                RechargeStructure::RechargePit,
                RechargeStructure::RechargeShaft,
                RechargeStructure::Trench,
            ]
        } else if open_space_sq_m >= 20.0 {
            vec![RechargeStructure::RechargePit, RechargeStructure::Trench]
        } else {
            vec![RechargeStructure::RainBarrelTank]
        }
    }

    fn radar_score(value: f64, full: f64) -> f64 {
        (value / full * 100.0).min(100.0)
    }

    pub fn radar_profile(
        roof_area_sq_m: f64,
        dwellers: u32,
        annual_rainfall_mm: f64,
        open_space_sq_m: f64,
        rating: FeasibilityRating,
    ) -> Vec<RadarAxis> {
        let axis = |metric: &str, value: f64| RadarAxis {
            metric: metric.to_string(),
            value,
        };
        vec![
            axis("Roof Area", radar_score(roof_area_sq_m, RADAR_FULL_ROOF_AREA_SQ_M)),
            axis(
                "Water Consumption",
                radar_score(f64::from(dwellers), RADAR_FULL_DWELLERS),
            ),
            axis("Rainfall", radar_score(annual_rainfall_mm, RADAR_FULL_RAINFALL_MM)),
            axis("Open Space", radar_score(open_space_sq_m, RADAR_FULL_OPEN_SPACE_SQ_M)),
            axis("Feasibility", rating.radar_score()),
        ]
    }

    pub fn groundwater_gauge(depth_m: f64) -> GroundwaterGauge {
        let fill_percent = (100.0 - depth_m / MAX_GAUGE_DEPTH_M * 100.0).clamp(0.0, 100.0);
        let status = if depth_m <= EXCELLENT_MAX_DEPTH_M {
            Outlook::Excellent
        } else if depth_m <= MODERATE_MAX_DEPTH_M {
            Outlook::Moderate
        } else {
            Outlook::Critical
        };
        GroundwaterGauge {
            status,
            fill_percent,
        }
    }

    pub fn summary(roof_area_sq_m: f64, dwellers: u32, rating: FeasibilityRating, runoff_liters: f64) -> String {
        format!(
            "With a {} sq. m roof and {} dwellers, the potential for rainwater harvesting is {}. \
             You could potentially harvest up to {} liters annually.",
            roof_area_sq_m,
            dwellers,
            rating,
            format_liters(runoff_liters)
        )
    }

}
