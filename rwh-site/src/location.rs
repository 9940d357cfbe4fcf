use crate::geo::{locality_key, location_key, GeoDataProvider};
use crate::metrics::{AquiferInfo, CapacityTier, Coordinates};
use csv::ReaderBuilder;
use log::warn;
use serde::{Deserialize, Serialize};

/// Embedded CSV table of known locations and their aquifer data.
pub static LOCATIONS_CSV: &str = include_str!("../../fixtures/locations.csv");

/// Aquifer and groundwater data for one named location.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Place name as displayed (e.g., "Ranchi, Jharkhand")
    pub name: String,
    pub aquifer_type: String,
    pub capacity_tier: CapacityTier,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Depth to the water table in meters
    pub groundwater_depth_m: f64,
}

impl LocationRecord {
    /// The record used for any location missing from the table.
    pub fn fallback() -> Self {
        Self {
            name: "Ranchi, Jharkhand".to_string(),
            aquifer_type: "Alluvial Aquifer".to_string(),
            capacity_tier: CapacityTier::High,
            latitude: 23.3441,
            longitude: 85.3096,
            groundwater_depth_m: 25.0,
        }
    }

    pub fn aquifer_info(&self) -> AquiferInfo {
        AquiferInfo {
            aquifer_type: self.aquifer_type.clone(),
            capacity_tier: self.capacity_tier,
            coordinates: Coordinates {
                lat: self.latitude,
                lng: self.longitude,
            },
        }
    }
}

/// `GeoDataProvider` backed by a static location table.
#[derive(Debug, Clone)]
pub struct StaticGeoData {
    records: Vec<LocationRecord>,
    fallback: LocationRecord,
}

impl StaticGeoData {
    pub fn new(records: Vec<LocationRecord>, fallback: LocationRecord) -> Self {
        Self { records, fallback }
    }

    /// Provider over the embedded `fixtures/locations.csv` table.
    ///
    /// A table that fails to parse leaves a fallback-only provider.
    pub fn embedded() -> Self {
        let records = Self::parse_location_csv(LOCATIONS_CSV).unwrap_or_else(|e| {
            warn!("Embedded location table failed to parse: {}", e);
            Vec::new()
        });
        Self::new(records, LocationRecord::fallback())
    }

    /// Parse a CSV string of location data into a vector of LocationRecords.
    ///
    /// Expected CSV columns: location, aquifer_type, capacity_tier, latitude,
    /// longitude, groundwater_depth_m. Unreadable numbers read as 0 and an
    /// unknown capacity tier reads as Low.
    pub fn parse_location_csv(csv_object: &str) -> Result<Vec<LocationRecord>, csv::Error> {
        let mut records: Vec<LocationRecord> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();
            let number = |idx: usize| field(idx).parse::<f64>().unwrap_or(0.0);
            let name = field(0).to_string();
            if name.is_empty() {
                continue;
            }
            let capacity_tier = field(2).parse::<CapacityTier>().unwrap_or_else(|e| {
                warn!("{} for {}, using Low", e, name);
                CapacityTier::Low
            });
            records.push(LocationRecord {
                aquifer_type: field(1).to_string(),
                capacity_tier,
                latitude: number(3),
                longitude: number(4),
                groundwater_depth_m: number(5),
                name,
            });
        }
        Ok(records)
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Find the record for a place name.
    ///
    /// Names match case- and whitespace-insensitively, either in full or by
    /// the locality before the first comma ("Ranchi" finds "Ranchi, Jharkhand").
    pub fn find(&self, location: &str) -> Option<&LocationRecord> {
        let key = location_key(location);
        if key.is_empty() {
            return None;
        }
        let locality = locality_key(&key);
        self.records
            .iter()
            .find(|r| location_key(&r.name) == key)
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| locality_key(&location_key(&r.name)) == locality)
            })
    }

    /// The matching record, or the fallback record for unknown locations.
    pub fn resolve(&self, location: &str) -> &LocationRecord {
        match self.find(location) {
            Some(record) => record,
            None => {
                warn!("Unknown location {:?}, using fallback aquifer record", location);
                &self.fallback
            }
        }
    }
}

impl Default for StaticGeoData {
    fn default() -> Self {
        Self::embedded()
    }
}

impl GeoDataProvider for StaticGeoData {
    fn lookup_aquifer(&self, location: &str) -> AquiferInfo {
        self.resolve(location).aquifer_info()
    }

    fn lookup_groundwater_depth(&self, location: &str) -> f64 {
        self.resolve(location).groundwater_depth_m
    }

    fn lookup_site(&self, location: &str) -> (AquiferInfo, f64) {
        let record = self.resolve(location);
        (record.aquifer_info(), record.groundwater_depth_m)
    }
}
