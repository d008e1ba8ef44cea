//! Satellite tracking models: validated element sets, observer site,
//! sampled look angles and finished passes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NoradId;
use crate::error::{AdvisorError, AdvisorResult};

/// Two-line orbital element set that passed structural validation.
///
/// The lines are kept verbatim for the propagator; only the catalog number is
/// extracted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSet {
    pub name: String,
    pub norad_id: NoradId,
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Validate and build an element set.
    ///
    /// Rejects wrong line prefixes, lines too short to carry a catalog number,
    /// an unparsable catalog number and mismatched numbers between the lines.
    pub fn parse(name: &str, line1: &str, line2: &str) -> AdvisorResult<Self> {
        let name = name.trim();
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        let label = if name.is_empty() { "<unnamed>" } else { name };

        if !line1.starts_with("1 ") {
            return Err(AdvisorError::malformed(label, "line 1 must start with '1 '"));
        }
        if !line2.starts_with("2 ") {
            return Err(AdvisorError::malformed(label, "line 2 must start with '2 '"));
        }

        let id1 = catalog_number(line1).map_err(|reason| AdvisorError::malformed(label, reason))?;
        let id2 = catalog_number(line2).map_err(|reason| AdvisorError::malformed(label, reason))?;
        if id1 != id2 {
            return Err(AdvisorError::malformed(
                label,
                format!("catalog numbers differ between lines ({} vs {})", id1, id2),
            ));
        }

        let name = if name.is_empty() {
            format!("NORAD {}", id1)
        } else {
            name.to_string()
        };

        Ok(Self {
            name,
            norad_id: id1,
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
}

/// Columns 3-7 of either element line.
fn catalog_number(line: &str) -> Result<NoradId, String> {
    let field = line
        .get(2..7)
        .ok_or_else(|| format!("line too short for a catalog number: '{}'", line))?;
    field
        .parse::<NoradId>()
        .map_err(|e| format!("unparsable catalog number '{}': {}", field.trim(), e))
}

/// Geodetic observer site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation_m: f64,
}

/// Topocentric direction to a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    #[serde(default)]
    pub range_km: Option<f64>,
}

impl LookAngles {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg,
            elevation_deg,
            range_km: None,
        }
    }
}

/// A completed pass above the elevation threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatellitePass {
    pub satellite_name: String,
    pub norad_id: NoradId,
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth: f64,
    pub max_altitude: f64,
    pub max_time: DateTime<Utc>,
    pub max_azimuth: f64,
    pub set_time: DateTime<Utc>,
    pub set_azimuth: f64,
    /// Seconds between rise and set
    pub duration: i64,
    pub magnitude: f64,
    pub is_visible: bool,
}

impl SatellitePass {
    pub fn rise_direction(&self) -> &'static str {
        crate::services::satellite_passes::azimuth_to_compass(self.rise_azimuth)
    }

    pub fn set_direction(&self) -> &'static str {
        crate::services::satellite_passes::azimuth_to_compass(self.set_azimuth)
    }
}
