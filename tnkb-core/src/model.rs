//! Domain data structures for regions and decoded vehicles.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::plate::PlateParts;

/// Region name used when a remote region code is not in the registry.
pub const UNKNOWN_REGION: &str = "Unknown";
/// Region name used when a locally parsed region code is not in the registry.
pub const UNKNOWN_LOCAL_REGION: &str = "Unknown Region";
/// Vehicle type used when the backend does not report one.
pub const UNKNOWN_VEHICLE_TYPE: &str = "Unknown";
/// Vehicle type assumed for locally parsed plates.
pub const DEFAULT_LOCAL_VEHICLE_TYPE: &str = "Car";

const LOCAL_SOURCE: &str = "local_parsing";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Registration region identified by a plate prefix.
pub struct RegionRecord {
    /// One or two uppercase letters.
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// Province the region belongs to.
    pub province: String,
}

impl RegionRecord {
    /// Construct a new record.
    #[must_use]
    pub fn new<C: Into<String>, N: Into<String>, P: Into<String>>(
        code: C,
        name: N,
        province: P,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            province: province.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Where the data of a [`VehicleInfo`] came from.
pub enum LookupSource {
    /// Remote lookup API.
    Remote,
    /// Local parsing after the remote lookup failed.
    LocalParsing,
    /// Placeholder for input that could not be checked.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Decoded plate information produced by a single lookup.
pub struct VehicleInfo {
    plate_number: String,
    region_code: String,
    region_name: String,
    vehicle_type: String,
    is_valid: bool,
    details: Map<String, Value>,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    source: LookupSource,
}

impl VehicleInfo {
    /// Build a record from a remote lookup.
    ///
    /// `region` is the registry entry for `region_code`, if any.
    pub(crate) fn from_remote(
        plate_number: String,
        region_code: String,
        region: Option<&RegionRecord>,
        vehicle_type: Option<String>,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            plate_number,
            region_code,
            region_name: region.map_or_else(|| UNKNOWN_REGION.to_owned(), |found| found.name.clone()),
            vehicle_type: vehicle_type.unwrap_or_else(|| UNKNOWN_VEHICLE_TYPE.to_owned()),
            is_valid: true,
            details,
            created_at: Utc::now(),
            source: LookupSource::Remote,
        }
    }

    /// Build a record from locally parsed plate components.
    pub(crate) fn from_local(parts: &PlateParts, region: Option<&RegionRecord>) -> Self {
        let details = json!({
            "source": LOCAL_SOURCE,
            "region_code": parts.region_code,
            "digits": parts.digits,
            "note": "Parsed locally without API",
        });

        Self {
            plate_number: parts.to_string(),
            region_code: parts.region_code.clone(),
            region_name: region
                .map_or_else(|| UNKNOWN_LOCAL_REGION.to_owned(), |found| found.name.clone()),
            vehicle_type: DEFAULT_LOCAL_VEHICLE_TYPE.to_owned(),
            is_valid: true,
            details: into_object(details),
            created_at: Utc::now(),
            source: LookupSource::LocalParsing,
        }
    }

    /// Placeholder for input that failed to check.
    pub(crate) fn invalid(raw_plate: &str, error: &str) -> Self {
        Self {
            plate_number: raw_plate.to_owned(),
            region_code: String::new(),
            region_name: UNKNOWN_REGION.to_owned(),
            vehicle_type: UNKNOWN_VEHICLE_TYPE.to_owned(),
            is_valid: false,
            details: into_object(json!({ "error": error })),
            created_at: Utc::now(),
            source: LookupSource::Invalid,
        }
    }

    /// Normalized plate number, or the raw input for invalid entries.
    #[must_use]
    pub fn plate_number(&self) -> &str {
        &self.plate_number
    }

    /// Uppercase region code; empty for invalid entries.
    #[must_use]
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// Human-readable region name.
    #[must_use]
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// Vehicle type as reported or assumed.
    #[must_use]
    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    /// Whether the plate passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Free-form diagnostic payload.
    #[must_use]
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Moment the record was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Where the data came from.
    #[must_use]
    pub fn source(&self) -> LookupSource {
        self.source
    }

    /// Serialize into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "plate_number": self.plate_number,
            "region_code": self.region_code,
            "region_name": self.region_name,
            "vehicle_type": self.vehicle_type,
            "is_valid": self.is_valid,
            "details": self.details,
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

impl fmt::Display for VehicleInfo {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Vehicle({} - {})", self.plate_number, self.region_name)
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> PlateParts {
        PlateParts {
            region_code: "B".to_owned(),
            digits: "1234".to_owned(),
            suffix: "ABC".to_owned(),
        }
    }

    #[test]
    fn local_record_carries_provenance() {
        let region = RegionRecord::new("B", "Jawa Barat", "West Java");
        let info = VehicleInfo::from_local(&parts(), Some(&region));

        assert!(info.is_valid());
        assert_eq!(info.plate_number(), "B 1234 ABC");
        assert_eq!(info.region_name(), "Jawa Barat");
        assert_eq!(info.vehicle_type(), "Car");
        assert_eq!(info.source(), LookupSource::LocalParsing);
        assert_eq!(info.details().get("source"), Some(&json!("local_parsing")));
        assert_eq!(info.details().get("digits"), Some(&json!("1234")));
        assert_eq!(info.details().get("region_code"), Some(&json!("B")));
    }

    #[test]
    fn unknown_regions_get_placeholder_names() {
        let local = VehicleInfo::from_local(&parts(), None);
        assert_eq!(local.region_name(), UNKNOWN_LOCAL_REGION);

        let remote = VehicleInfo::from_remote("B 1234 ABC".to_owned(), "ZZ".to_owned(), None, None, Map::new());
        assert_eq!(remote.region_name(), UNKNOWN_REGION);
        assert_eq!(remote.vehicle_type(), UNKNOWN_VEHICLE_TYPE);
        assert!(remote.is_valid());
    }

    #[test]
    fn invalid_record_keeps_raw_input() {
        let info = VehicleInfo::invalid("nope", "Invalid plate: bad");
        assert!(!info.is_valid());
        assert_eq!(info.plate_number(), "nope");
        assert_eq!(info.region_code(), "");
        assert_eq!(info.region_name(), "Unknown");
        assert_eq!(info.vehicle_type(), "Unknown");
        assert_eq!(info.details().get("error"), Some(&json!("Invalid plate: bad")));
        assert_eq!(info.source(), LookupSource::Invalid);
    }

    #[test]
    fn serializes_to_json_object() {
        let info = VehicleInfo::from_local(&parts(), None);
        let value = info.to_json();

        assert_eq!(value["plate_number"], json!("B 1234 ABC"));
        assert_eq!(value["is_valid"], json!(true));
        assert_eq!(value["details"]["source"], json!("local_parsing"));
        let created = value["created_at"].as_str().expect("timestamp string");
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn display_names_plate_and_region() {
        let region = RegionRecord::new("B", "Jawa Barat", "West Java");
        let info = VehicleInfo::from_local(&parts(), Some(&region));
        assert_eq!(info.to_string(), "Vehicle(B 1234 ABC - Jawa Barat)");
    }
}
