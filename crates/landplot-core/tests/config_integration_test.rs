//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use landplot_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var("LANDPLOT_CSV_DECIMAL_SEPARATOR");
    env::remove_var("LANDPLOT_DEFAULT_COLOR");
    env::remove_var("LANDPLOT_IMPORT_COLOR");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
csv_decimal_separator = "."
import_color = "#111111"
"##
    )
    .unwrap();

    env::set_var("LANDPLOT_IMPORT_COLOR", "#222222");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.csv_decimal_separator.value, '.');
    assert_eq!(config.csv_decimal_separator.source, ConfigSource::File);
    assert_eq!(config.import_color.value, "#222222");
    assert_eq!(config.import_color.source, ConfigSource::Environment);
    assert_eq!(config.default_color.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_value_is_ignored() {
    clear_env();
    env::set_var("LANDPLOT_CSV_DECIMAL_SEPARATOR", "semicolon");
    env::set_var("LANDPLOT_DEFAULT_COLOR", "yellow");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.csv_decimal_separator.value, ',');
    assert_eq!(config.csv_decimal_separator.source, ConfigSource::Default);
    assert_eq!(config.default_color.value, "#ffc107");

    clear_env();
}

#[test]
#[serial]
fn test_full_precedence_chain() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r##"csv_decimal_separator = ".""##).unwrap();

    env::set_var("LANDPLOT_CSV_DECIMAL_SEPARATOR", ",");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();
    assert_eq!(config.csv_decimal_separator.value, ',');
    assert_eq!(config.csv_decimal_separator.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        csv_decimal_separator: Some('.'),
        ..Default::default()
    });
    assert_eq!(config.csv_decimal_separator.value, '.');
    assert_eq!(config.csv_decimal_separator.source, ConfigSource::Cli);

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/landplot.toml");
    assert!(result.is_err());
}
