//! High-level service facade combining validation, remote lookup and local fallback.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::model::{RegionRecord, VehicleInfo};
use crate::plate::{self, PlateParts};
use crate::ports::{OfflinePort, PlateLookupPort, TnkbError};
use crate::registry::RegionRegistry;

/// Public entry point for checking plates and browsing regions.
pub struct TnkbService {
    registry: Arc<RegionRegistry>,
    port: Arc<dyn PlateLookupPort>,
}

impl TnkbService {
    /// Create a new service bound to the provided registry and lookup backend.
    #[must_use]
    pub fn new(registry: Arc<RegionRegistry>, port: Arc<dyn PlateLookupPort>) -> Self {
        Self { registry, port }
    }

    /// Service with the built-in registry that never calls a remote backend.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(RegionRegistry::builtin()), Arc::new(OfflinePort))
    }

    /// Check and decode a plate number.
    ///
    /// The remote backend is tried first; if it fails for any reason the plate
    /// is decoded locally from its region prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TnkbError::InvalidPlate`] when the plate is malformed.
    pub async fn check_plate(&self, raw: &str) -> Result<VehicleInfo, TnkbError> {
        let (normalized, parts) = validate(raw)?;

        match self.port.lookup(&normalized).await {
            Ok(payload) => {
                debug!("{} resolved {normalized}", self.port.name());
                // Fall back to the parsed prefix so valid records always carry a region code.
                let region_code = payload
                    .region_code
                    .map(|code| code.trim().to_uppercase())
                    .filter(|code| !code.is_empty())
                    .unwrap_or_else(|| parts.region_code.clone());
                let region = self.registry.lookup(&region_code);
                Ok(VehicleInfo::from_remote(
                    normalized,
                    region_code,
                    region,
                    payload.vehicle_type,
                    payload.raw,
                ))
            }
            Err(err) => {
                warn!(
                    "{} lookup for {normalized} failed: {err}, falling back to local parsing",
                    self.port.name()
                );
                Ok(self.parse_locally(&parts))
            }
        }
    }

    /// Decode a plate from its region prefix without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`TnkbError::InvalidPlate`] when the plate is malformed.
    pub fn check_plate_locally(&self, raw: &str) -> Result<VehicleInfo, TnkbError> {
        let (_, parts) = validate(raw)?;
        Ok(self.parse_locally(&parts))
    }

    /// Whether the plate is well formed. Never contacts the backend.
    #[must_use]
    pub fn validate_plate(&self, raw: &str) -> bool {
        validate(raw).is_ok()
    }

    /// Look up a region by code, ignoring case.
    #[must_use]
    pub fn region_info(&self, code: &str) -> Option<RegionRecord> {
        self.registry.lookup(code).cloned()
    }

    /// List all known regions sorted by code.
    #[must_use]
    pub fn list_regions(&self) -> Vec<RegionRecord> {
        self.registry.list_all()
    }

    /// Check several plates in order.
    ///
    /// Plates that fail are reported as invalid placeholders instead of
    /// aborting the batch, so the output always matches the input one to one.
    pub async fn bulk_check<S: AsRef<str>>(&self, plates: &[S]) -> Vec<VehicleInfo> {
        let mut results = Vec::with_capacity(plates.len());

        for plate in plates {
            let raw = plate.as_ref();
            match self.check_plate(raw).await {
                Ok(info) => results.push(info),
                Err(err) => {
                    error!("Failed to check plate {raw:?}: {err}");
                    results.push(VehicleInfo::invalid(raw, &err.to_string()));
                }
            }
        }

        results
    }

    fn parse_locally(&self, parts: &PlateParts) -> VehicleInfo {
        VehicleInfo::from_local(parts, self.registry.lookup(&parts.region_code))
    }
}

fn validate(raw: &str) -> Result<(String, PlateParts), TnkbError> {
    let normalized = plate::normalize(raw)?;
    let parts = plate::parse(&normalized)?;
    Ok((normalized, parts))
}
