use crate::metrics::AquiferInfo;

/// Source of location-keyed aquifer and groundwater data.
///
/// The estimator never reaches a geospatial service itself; whatever backs
/// this trait (the embedded table, a test double, a remote lookup cached
/// ahead of time) is injected. Implementations must not fail: an unknown
/// location answers with a fallback record.
pub trait GeoDataProvider {
    fn lookup_aquifer(&self, location: &str) -> AquiferInfo;
    fn lookup_groundwater_depth(&self, location: &str) -> f64;

    /// Aquifer and groundwater depth for one location in a single lookup.
    fn lookup_site(&self, location: &str) -> (AquiferInfo, f64) {
        (
            self.lookup_aquifer(location),
            self.lookup_groundwater_depth(location),
        )
    }
}

/// Normalize a place name for lookup: trimmed, lowercase, single spaces.
pub fn location_key(location: &str) -> String {
    location
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The part of a normalized place name before the first comma ("ranchi").
pub fn locality_key(key: &str) -> &str {
    key.split(',').next().unwrap_or(key).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_key() {
        assert_eq!(location_key("  Ranchi,   Jharkhand "), "ranchi, jharkhand");
        assert_eq!(location_key(""), "");
    }

    #[test]
    fn test_locality_key() {
        assert_eq!(locality_key("ranchi, jharkhand"), "ranchi");
        assert_eq!(locality_key("chennai"), "chennai");
    }
}
