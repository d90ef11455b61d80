use crate::error::{LandplotError, Result};
use crate::models::{DEFAULT_COLOR, IMPORT_COLOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for landplot
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Decimal separator used for numeric CSV columns
    pub csv_decimal_separator: ConfigValue<char>,
    /// Color for manually drawn geometries without one
    pub default_color: ConfigValue<String>,
    /// Color assigned to every imported geometry
    pub import_color: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            csv_decimal_separator: ConfigValue::new(',', ConfigSource::Default),
            default_color: ConfigValue::new(DEFAULT_COLOR.to_string(), ConfigSource::Default),
            import_color: ConfigValue::new(IMPORT_COLOR.to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| LandplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| LandplotError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(separator) = file_config.csv_decimal_separator {
            let separator = parse_decimal_separator(&separator)?;
            self.csv_decimal_separator.update(separator, ConfigSource::File);
        }

        if let Some(color) = file_config.default_color {
            let color = parse_color("default_color", &color)?;
            self.default_color.update(color, ConfigSource::File);
        }

        if let Some(color) = file_config.import_color {
            let color = parse_color("import_color", &color)?;
            self.import_color.update(color, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // LANDPLOT_CSV_DECIMAL_SEPARATOR
        if let Ok(separator_str) = env::var("LANDPLOT_CSV_DECIMAL_SEPARATOR") {
            match parse_decimal_separator(&separator_str) {
                Ok(separator) => {
                    self.csv_decimal_separator.update(separator, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid LANDPLOT_CSV_DECIMAL_SEPARATOR value '{}': expected ',' or '.'",
                    separator_str
                ),
            }
        }

        // LANDPLOT_DEFAULT_COLOR
        if let Ok(color_str) = env::var("LANDPLOT_DEFAULT_COLOR") {
            match parse_color("default_color", &color_str) {
                Ok(color) => self.default_color.update(color, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LANDPLOT_DEFAULT_COLOR value '{}': expected #rrggbb",
                    color_str
                ),
            }
        }

        // LANDPLOT_IMPORT_COLOR
        if let Ok(color_str) = env::var("LANDPLOT_IMPORT_COLOR") {
            match parse_color("import_color", &color_str) {
                Ok(color) => self.import_color.update(color, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LANDPLOT_IMPORT_COLOR value '{}': expected #rrggbb",
                    color_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(separator) = overrides.csv_decimal_separator {
            self.csv_decimal_separator.update(separator, ConfigSource::Cli);
        }

        if let Some(color) = overrides.default_color {
            self.default_color.update(color, ConfigSource::Cli);
        }

        if let Some(color) = overrides.import_color {
            self.import_color.update(color, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "csv_decimal_separator".to_string(),
            (self.csv_decimal_separator.value.to_string(), self.csv_decimal_separator.source),
        );

        map.insert(
            "default_color".to_string(),
            (self.default_color.value.clone(), self.default_color.source),
        );

        map.insert(
            "import_color".to_string(),
            (self.import_color.value.clone(), self.import_color.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    csv_decimal_separator: Option<String>,
    default_color: Option<String>,
    import_color: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub csv_decimal_separator: Option<char>,
    pub default_color: Option<String>,
    pub import_color: Option<String>,
}

/// Parse a CSV decimal separator from string
pub fn parse_decimal_separator(s: &str) -> Result<char> {
    match s.trim().to_lowercase().as_str() {
        "," | "comma" => Ok(','),
        "." | "dot" | "point" => Ok('.'),
        _ => Err(LandplotError::ConfigInvalid {
            key: "csv_decimal_separator".to_string(),
            reason: format!("Invalid decimal separator: {}. Use ',' or '.'", s),
        }),
    }
}

/// Parse a `#rrggbb` color, normalizing it to lowercase
pub fn parse_color(key: &str, s: &str) -> Result<String> {
    let trimmed = s.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(trimmed.to_lowercase())
    } else {
        Err(LandplotError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Invalid color: {}. Use #rrggbb", s),
        })
    }
}
