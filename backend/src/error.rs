//! Error types for the advisor core.
//!
//! Only ingestion and configuration can fail outright. Missing optional inputs
//! (weather, seeing, imaging windows) degrade individual score components and
//! unknown filter or sort identifiers are ignored, so neither shows up here.

use thiserror::Error;

use crate::models::NoradId;

/// Result type for advisor operations
pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;

/// Errors raised by the advisor core.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// An orbital element set failed structural validation at ingestion.
    #[error("Malformed element set '{name}': {reason}")]
    MalformedElementSet { name: String, reason: String },

    /// An element set could not be propagated; the satellite is dropped from the batch.
    #[error("Propagation failed for NORAD {norad_id}: {message}")]
    Propagation { norad_id: NoradId, message: String },

    /// Imaging window bounds or quality score out of range
    #[error("Invalid imaging window: {0}")]
    InvalidImagingWindow(String),

    /// Configuration file could not be read or holds invalid values
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failure reported by a [`Propagator`](crate::services::satellite_passes::Propagator)
/// implementation for a single sample time.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PropagationError {
    pub message: String,
}

impl PropagationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl AdvisorError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        AdvisorError::MalformedElementSet {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = AdvisorError::malformed("ISS", "line 1 must start with '1 '");
        assert_eq!(
            err.to_string(),
            "Malformed element set 'ISS': line 1 must start with '1 '"
        );
    }

    #[test]
    fn test_propagation_display() {
        let err = AdvisorError::Propagation {
            norad_id: NoradId::new(25544),
            message: "decayed".to_string(),
        };
        assert!(err.to_string().contains("25544"));
        assert!(err.to_string().contains("decayed"));
    }

    #[test]
    fn test_toml_conversion() {
        let parse: Result<toml::Value, _> = toml::from_str("not = [valid");
        let err: AdvisorError = parse.unwrap_err().into();
        assert!(matches!(err, AdvisorError::Toml(_)));
    }
}
