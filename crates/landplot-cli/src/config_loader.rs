//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use landplot_core::config::{parse_color, parse_decimal_separator, CliConfigOverrides, LayeredConfig};
use std::path::Path;

use crate::cli::Cli;

/// Validate the configuration flags given on the command line
pub fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    Ok(CliConfigOverrides {
        csv_decimal_separator: cli
            .decimal_separator
            .as_deref()
            .map(parse_decimal_separator)
            .transpose()
            .context("Invalid --decimal-separator")?,
        default_color: cli
            .default_color
            .as_deref()
            .map(|c| parse_color("default_color", c))
            .transpose()
            .context("Invalid --default-color")?,
        import_color: cli
            .import_color
            .as_deref()
            .map(|c| parse_color("import_color", c))
            .transpose()
            .context("Invalid --import-color")?,
    })
}

/// Load layered configuration: defaults, optional file, environment, CLI
pub fn load_config(file: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = file {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landplot_core::config::ConfigSource;
    use std::io::Write;

    #[test]
    fn test_file_then_cli() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "csv_decimal_separator = \".\"\nimport_color = \"#00FF00\"").unwrap();

        let overrides =
            CliConfigOverrides { import_color: Some("#0000ff".to_string()), ..Default::default() };
        let config = load_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.csv_decimal_separator.value, '.');
        assert_eq!(config.import_color.value, "#0000ff");
        assert_eq!(config.import_color.source, ConfigSource::Cli);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/landplot.toml")), Default::default());
        assert!(result.is_err());
    }
}
