//! Advisor configuration file support.
//!
//! Settings are read from a TOML file. Every field has a default so a partial
//! (or empty) file is valid.
//!
//! ```toml
//! [passes]
//! min_elevation_deg = 10.0
//! display_magnitude_limit = 3.0
//!
//! [passes.zenith_magnitudes]
//! 25544 = -3.5
//!
//! [equipment]
//! fov_width_arcmin = 120.0
//! fov_height_arcmin = 80.0
//!
//! [display]
//! active_filters = ["moon_clear", "high_altitude"]
//! sort_field = "magnitude"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{FieldOfView, NoradId};

/// Zenith magnitudes for well-known bright satellites.
const KNOWN_ZENITH_MAGNITUDES: &[(u32, f64)] = &[
    (25544, -3.5), // ISS
    (48274, -2.0), // Tiangong
    (20580, 1.5),  // Hubble
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub passes: PassSettings,
    #[serde(default)]
    pub nights: NightSettings,
    #[serde(default)]
    pub equipment: EquipmentSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Satellite pass detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSettings {
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f64,
    #[serde(default = "default_sample_step")]
    pub sample_step_seconds: u32,
    #[serde(default = "default_display_magnitude_limit")]
    pub display_magnitude_limit: f64,
    #[serde(default = "default_zenith_magnitude")]
    pub default_zenith_magnitude: f64,
    /// Overrides keyed by NORAD catalog number
    #[serde(default)]
    pub zenith_magnitudes: BTreeMap<String, f64>,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            min_elevation_deg: default_min_elevation(),
            sample_step_seconds: default_sample_step(),
            display_magnitude_limit: default_display_magnitude_limit(),
            default_zenith_magnitude: default_zenith_magnitude(),
            zenith_magnitudes: BTreeMap::new(),
        }
    }
}

impl PassSettings {
    /// Zenith magnitude for a satellite: configured override, then the built-in
    /// table, then the configured default.
    pub fn zenith_magnitude(&self, norad_id: NoradId) -> f64 {
        if let Some(mag) = self.zenith_magnitudes.get(&norad_id.to_string()) {
            return *mag;
        }
        KNOWN_ZENITH_MAGNITUDES
            .iter()
            .find(|(id, _)| *id == norad_id.value())
            .map(|(_, mag)| *mag)
            .unwrap_or(self.default_zenith_magnitude)
    }

    /// Rewrite override keys in their canonical form ("025544" becomes "25544").
    fn normalize_zenith_keys(&mut self) -> AdvisorResult<()> {
        let mut normalized = BTreeMap::new();
        for (key, mag) in &self.zenith_magnitudes {
            let id = key.parse::<NoradId>().map_err(|e| {
                AdvisorError::Configuration(format!(
                    "passes.zenith_magnitudes key '{}' is not a catalog number: {}",
                    key, e
                ))
            })?;
            if normalized.insert(id.to_string(), *mag).is_some() {
                return Err(AdvisorError::Configuration(format!(
                    "passes.zenith_magnitudes lists catalog number {} more than once",
                    id
                )));
            }
        }
        self.zenith_magnitudes = normalized;
        Ok(())
    }
}

/// Forecast-window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSettings {
    #[serde(default = "default_best_night_count")]
    pub best_night_count: usize,
}

impl Default for NightSettings {
    fn default() -> Self {
        Self {
            best_night_count: default_best_night_count(),
        }
    }
}

/// Imaging equipment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentSettings {
    #[serde(default)]
    pub fov_width_arcmin: Option<f64>,
    #[serde(default)]
    pub fov_height_arcmin: Option<f64>,
}

impl EquipmentSettings {
    /// Field of view, when both sides are configured.
    pub fn field_of_view(&self) -> Option<FieldOfView> {
        match (self.fov_width_arcmin, self.fov_height_arcmin) {
            (Some(w), Some(h)) => Some(FieldOfView::new(w, h)),
            _ => None,
        }
    }
}

/// List presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub active_filters: Vec<String>,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            active_filters: Vec::new(),
            sort_field: default_sort_field(),
        }
    }
}

fn default_min_elevation() -> f64 {
    10.0
}

fn default_sample_step() -> u32 {
    30
}

fn default_display_magnitude_limit() -> f64 {
    3.0
}

fn default_zenith_magnitude() -> f64 {
    2.0
}

fn default_best_night_count() -> usize {
    3
}

fn default_sort_field() -> String {
    "score".to_string()
}

impl AdvisorConfig {
    /// Parse configuration from TOML text and check value ranges.
    pub fn from_toml_str(content: &str) -> AdvisorResult<Self> {
        let mut config: AdvisorConfig = toml::from_str(content)?;
        config.passes.normalize_zenith_keys()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AdvisorConfig)` if successful
    /// * `Err(AdvisorError::Configuration)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> AdvisorResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AdvisorError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            AdvisorError::Toml(inner) => {
                AdvisorError::Configuration(format!("Failed to parse config file: {}", inner))
            }
            other => other,
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `nightseek.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when none of them exists. A file that exists but
    /// fails to parse or validate is an error.
    pub fn from_default_location() -> AdvisorResult<Option<Self>> {
        Self::search(&[
            PathBuf::from("nightseek.toml"),
            PathBuf::from("backend/nightseek.toml"),
            PathBuf::from("../nightseek.toml"),
        ])
    }

    fn search(paths: &[PathBuf]) -> AdvisorResult<Option<Self>> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path).map(Some),
            None => Ok(None),
        }
    }

    fn validate(&self) -> AdvisorResult<()> {
        if self.passes.sample_step_seconds == 0 {
            return Err(AdvisorError::Configuration(
                "passes.sample_step_seconds must be positive".to_string(),
            ));
        }
        if !(0.0..90.0).contains(&self.passes.min_elevation_deg) {
            return Err(AdvisorError::Configuration(format!(
                "passes.min_elevation_deg must be in [0, 90), got {}",
                self.passes.min_elevation_deg
            )));
        }
        let fov = [
            self.equipment.fov_width_arcmin,
            self.equipment.fov_height_arcmin,
        ];
        if fov.iter().flatten().any(|side| *side <= 0.0) {
            return Err(AdvisorError::Configuration(
                "equipment field of view sides must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AdvisorConfig::from_toml_str("").unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.passes.min_elevation_deg, 10.0);
        assert_eq!(config.passes.sample_step_seconds, 30);
        assert_eq!(config.passes.display_magnitude_limit, 3.0);
        assert_eq!(config.nights.best_night_count, 3);
        assert_eq!(config.display.sort_field, "score");
        assert!(config.equipment.field_of_view().is_none());
    }

    #[test]
    fn test_zenith_magnitude_lookup_order() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [passes]
            default_zenith_magnitude = 4.0

            [passes.zenith_magnitudes]
            20580 = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.passes.zenith_magnitude(NoradId::new(20580)), 2.5);
        assert_eq!(config.passes.zenith_magnitude(NoradId::new(25544)), -3.5);
        assert_eq!(config.passes.zenith_magnitude(NoradId::new(99999)), 4.0);
    }

    #[test]
    fn test_field_of_view_needs_both_sides() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [equipment]
            fov_width_arcmin = 120.0
            "#,
        )
        .unwrap();
        assert!(config.equipment.field_of_view().is_none());
    }

    #[test]
    fn test_rejects_zero_step() {
        let err = AdvisorConfig::from_toml_str("[passes]\nsample_step_seconds = 0\n").unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_search_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let found = AdvisorConfig::search(&[dir.path().join("nightseek.toml")]).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_search_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("nightseek.toml");
        std::fs::write(&bad, "[passes]\nsample_step_seconds = 0\n").unwrap();
        let err = AdvisorConfig::search(&[dir.path().join("absent.toml"), bad]).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_search_takes_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("nightseek.toml");
        std::fs::write(&good, "[nights]\nbest_night_count = 7\n").unwrap();
        let config = AdvisorConfig::search(&[dir.path().join("absent.toml"), good])
            .unwrap()
            .unwrap();
        assert_eq!(config.nights.best_night_count, 7);
    }

    #[test]
    fn test_zero_padded_zenith_key_matches() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [passes.zenith_magnitudes]
            "025544" = -2.0
            " 40001" = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.passes.zenith_magnitude(NoradId::new(25544)), -2.0);
        assert_eq!(config.passes.zenith_magnitude(NoradId::new(40001)), 1.0);
    }

    #[test]
    fn test_rejects_duplicate_zenith_keys_after_padding() {
        let err = AdvisorConfig::from_toml_str(
            "[passes.zenith_magnitudes]\n25544 = -3.0\n\"025544\" = -2.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_rejects_non_numeric_zenith_key() {
        let result = AdvisorConfig::from_toml_str("[passes.zenith_magnitudes]\niss = -3.5\n");
        assert!(result.is_err());
    }
}
