//! Error types for landplot

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandplotError {
    // Geometry errors
    #[error("Invalid coordinate ({lon}, {lat}): {reason}")]
    InvalidCoordinate { lon: f64, lat: f64, reason: String },

    #[error("Invalid {geometry_type} geometry: {reason}")]
    InvalidGeometry { geometry_type: String, reason: String },

    #[error("Geometry type {geometry_type} is not supported")]
    UnsupportedGeometry { geometry_type: String },

    // Projection errors
    #[error("Projection from {from} to {to} failed: {reason}")]
    Projection { from: String, to: String, reason: String },

    // Import errors
    #[error("No valid geometry found in {filename}")]
    NothingToImport { filename: String },

    // Storage errors
    #[error("Record {id} not found")]
    RecordNotFound { id: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Format errors
    #[error("{format} error: {message}")]
    Format { format: String, message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LandplotError {
    /// Build a format error tagged with the format name
    pub fn format(format: impl Into<String>, message: impl ToString) -> Self {
        Self::Format { format: format.into(), message: message.to_string() }
    }
}

impl From<serde_json::Error> for LandplotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LandplotError>;
