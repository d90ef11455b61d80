//! Export outcomes and format dispatch

use landplot_core::config::LayeredConfig;
use landplot_core::error::{LandplotError, Result};
use landplot_core::models::GeometryRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A file ready to be handed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of exporting one record
///
/// `Unsupported` is a normal outcome: the stored feature describes a geometry
/// type the exporter cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(ExportedFile),
    Unsupported { geometry_type: String },
}

impl ExportOutcome {
    /// Turn the unsupported signal into a user-visible error
    pub fn into_file(self) -> Result<ExportedFile> {
        match self {
            ExportOutcome::Exported(file) => Ok(file),
            ExportOutcome::Unsupported { geometry_type } => {
                Err(LandplotError::UnsupportedGeometry { geometry_type })
            }
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ExportOutcome::Unsupported { .. })
    }
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Kml,
    Shp,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Kml => "kml",
            ExportFormat::Shp => "shp",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = LandplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "kml" => Ok(ExportFormat::Kml),
            "shp" | "shapefile" => Ok(ExportFormat::Shp),
            other => Err(LandplotError::ConfigInvalid {
                key: "format".to_string(),
                reason: format!("Unknown export format '{}'. Expected csv, kml or shp", other),
            }),
        }
    }
}

/// Settings that shape exported files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Decimal separator for numeric CSV columns
    pub decimal_separator: char,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { decimal_separator: ',' }
    }
}

impl From<&LayeredConfig> for ExportOptions {
    fn from(config: &LayeredConfig) -> Self {
        Self { decimal_separator: config.csv_decimal_separator.value }
    }
}

/// Export a record in the requested format
pub fn export_record(
    record: &GeometryRecord,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportOutcome> {
    let outcome = match format {
        ExportFormat::Csv => crate::csv::export_csv(record, options.decimal_separator)?,
        ExportFormat::Kml => crate::kml::export_kml(record)?,
        ExportFormat::Shp => crate::shapefile::export_shapefile(record)?,
    };

    match &outcome {
        ExportOutcome::Exported(file) => tracing::info!(
            format = %format,
            file_name = %file.file_name,
            size = file.bytes.len(),
            "Exported record"
        ),
        ExportOutcome::Unsupported { geometry_type } => tracing::info!(
            format = %format,
            geometry_type = %geometry_type,
            "Record geometry not supported for export"
        ),
    }

    Ok(outcome)
}
