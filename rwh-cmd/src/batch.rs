//! Batch estimate: one CSV row of raw site values in, one metrics row out.

use crate::estimate::estimate_raw;
use anyhow::Context;
use log::info;
use rwh_estimate::{Estimator, EstimatorConfig};
use rwh_site::metrics::{CapacityTier, DerivedMetrics, FeasibilityRating};
use rwh_site::site_input::{RawSiteInput, SiteInput};
use serde::Serialize;
use std::io::{Read, Write};

/// One output row of the metrics CSV.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsRow {
    pub location: String,
    pub feasibility: FeasibilityRating,
    pub annual_runoff_liters: f64,
    pub required_annual_consumption_liters: f64,
    pub estimated_cost: f64,
    pub estimated_annual_savings: f64,
    /// Empty when payback is undefined
    pub payback_years: Option<f64>,
    pub groundwater_depth_m: f64,
    pub aquifer_type: String,
    pub capacity_tier: CapacityTier,
    pub latitude: f64,
    pub longitude: f64,
}

impl MetricsRow {
    pub fn new(input: &SiteInput, metrics: &DerivedMetrics) -> Self {
        let aquifer = &metrics.aquifer_info;
        Self {
            location: input.location.clone(),
            feasibility: metrics.feasibility_rating,
            annual_runoff_liters: metrics.annual_runoff_liters,
            required_annual_consumption_liters: metrics.required_annual_consumption_liters,
            estimated_cost: metrics.estimated_cost_currency,
            estimated_annual_savings: metrics.estimated_annual_savings_currency,
            payback_years: metrics.payback_years,
            groundwater_depth_m: metrics.groundwater_depth_meters,
            aquifer_type: aquifer.aquifer_type.clone(),
            capacity_tier: aquifer.capacity_tier,
            latitude: aquifer.coordinates.lat,
            longitude: aquifer.coordinates.lng,
        }
    }
}

/// Estimate every site in a headered CSV.
///
/// Expected columns: location, roof_area, dwellers, open_space,
/// runoff_coefficient, rainfall_mm. Empty cells are coerced like empty form
/// fields.
pub fn estimate_rows<R: Read>(estimator: &Estimator, reader: R) -> anyhow::Result<Vec<MetricsRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<RawSiteInput>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let raw = result.with_context(|| format!("Bad site row at line {}", idx + 2))?;
        let (input, metrics) = estimate_raw(estimator, &raw);
        rows.push(MetricsRow::new(&input, &metrics));
    }
    Ok(rows)
}

/// Write metrics rows as a headered CSV.
pub fn write_rows<W: Write>(rows: &[MetricsRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_batch(input_csv: &str, output_csv: &str, config: EstimatorConfig) -> anyhow::Result<()> {
    let estimator = Estimator::with_config(config);
    let input = std::fs::File::open(input_csv)
        .with_context(|| format!("Failed to open {}", input_csv))?;
    let rows = estimate_rows(&estimator, input)?;

    let output = std::fs::File::create(output_csv)
        .with_context(|| format!("Failed to create {}", output_csv))?;
    write_rows(&rows, output)?;

    info!("Batch complete. {} sites written to {}", rows.len(), output_csv);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITES_CSV: &str = "\
location,roof_area,dwellers,open_space,runoff_coefficient,rainfall_mm
\"Ranchi, Jharkhand\",120,4,50,0.85,750
Chennai,10,1,5,0.8,1400
Unknown Town,,,,,
";

    #[test]
    fn test_estimate_rows() {
        let rows = estimate_rows(&Estimator::default(), SITES_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].location, "Ranchi, Jharkhand");
        assert_eq!(rows[0].feasibility, FeasibilityRating::High);
        assert!((rows[0].annual_runoff_liters - 76_500.0).abs() < 1e-6);

        assert_eq!(rows[1].feasibility, FeasibilityRating::Low);
        assert_eq!(rows[1].aquifer_type, "Coastal Sedimentary Aquifer");

        assert_eq!(rows[2].annual_runoff_liters, 0.0);
        assert_eq!(rows[2].payback_years, None);
        assert_eq!(rows[2].aquifer_type, "Alluvial Aquifer");
    }

    #[test]
    fn test_estimate_fixture_sites() {
        let fixture = include_str!("../../fixtures/sites.csv");
        let rows = estimate_rows(&Estimator::default(), fixture.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        // empty coefficient cell: 60 m² * 790 mm * 0.85
        let delhi = &rows[1];
        assert_eq!(delhi.feasibility, FeasibilityRating::Medium);
        assert!((delhi.annual_runoff_liters - 40_290.0).abs() < 1e-6);
        assert_eq!(delhi.groundwater_depth_m, 45.0);
        assert_eq!(delhi.capacity_tier, CapacityTier::Medium);

        let unknown = &rows[3];
        assert_eq!(unknown.location, "Unknown Town");
        assert_eq!(unknown.feasibility, FeasibilityRating::Low);
        assert_eq!(unknown.groundwater_depth_m, 25.0);
        assert_eq!(unknown.latitude, 23.3441);
    }

    #[test]
    fn test_write_rows() {
        let rows = estimate_rows(&Estimator::default(), SITES_CSV.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_rows(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "location,feasibility,annual_runoff_liters,required_annual_consumption_liters,\
                 estimated_cost,estimated_annual_savings,payback_years,groundwater_depth_m,\
                 aquifer_type,capacity_tier,latitude,longitude"
            )
        );
        assert!(lines.next().unwrap().starts_with("\"Ranchi, Jharkhand\",High,"));
        assert!(lines.last().unwrap().contains(",0.0,,25.0,"));
    }

    #[test]
    fn test_bad_row_reports_line() {
        let csv_data = "location,roof_area,dwellers,open_space,runoff_coefficient,rainfall_mm\nA,1,2\n";
        let err = estimate_rows(&Estimator::default(), csv_data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
