//! Loading configuration files from disk.

use std::io::Write;

use tempfile::NamedTempFile;

use nightseek_core::models::{FieldOfView, NoradId};
use nightseek_core::services::SortField;
use nightseek_core::{AdvisorConfig, AdvisorError};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_from_file_reads_all_sections() {
    let file = write_config(
        r#"
[passes]
min_elevation_deg = 15.0
sample_step_seconds = 60

[passes.zenith_magnitudes]
40001 = -1.0

[nights]
best_night_count = 5

[equipment]
fov_width_arcmin = 120.0
fov_height_arcmin = 80.0

[display]
active_filters = ["moon_clear"]
sort_field = "frame-fill"
"#,
    );

    let config = AdvisorConfig::from_file(file.path()).unwrap();

    assert_eq!(config.passes.min_elevation_deg, 15.0);
    assert_eq!(config.passes.sample_step_seconds, 60);
    assert_eq!(config.passes.zenith_magnitude(NoradId::new(40001)), -1.0);
    assert_eq!(config.passes.display_magnitude_limit, 3.0);
    assert_eq!(config.nights.best_night_count, 5);
    assert_eq!(
        config.equipment.field_of_view(),
        Some(FieldOfView::new(120.0, 80.0))
    );
    assert_eq!(
        SortField::parse_or_default(&config.display.sort_field),
        SortField::FrameFill
    );
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = write_config("");
    let config = AdvisorConfig::from_file(file.path()).unwrap();
    assert_eq!(config, AdvisorConfig::default());
}

#[test]
fn test_missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdvisorConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AdvisorError::Configuration(_)));
}

#[test]
fn test_syntax_error_is_configuration_error() {
    let file = write_config("[passes\nmin_elevation_deg = ");
    let err = AdvisorConfig::from_file(file.path()).unwrap_err();
    match err {
        AdvisorError::Configuration(msg) => assert!(msg.contains("Failed to parse")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_value_is_rejected() {
    let file = write_config("[passes]\nsample_step_seconds = 0\n");
    let err = AdvisorConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AdvisorError::Configuration(_)));
}
