//! Geometry records exchanged with the storage collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{CanonicalGeometry, GeometryKind};
use crate::canonical;
use crate::error::Result;

/// Color given to manually drawn geometries without an explicit color
pub const DEFAULT_COLOR: &str = "#ffc107";

/// Color given to every imported geometry
pub const IMPORT_COLOR: &str = "#3388ff";

/// Name given to manually drawn geometries without an explicit name
pub const DEFAULT_NAME: &str = "Unnamed";

/// Storage-assigned record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque owner/session token. The engine only passes it through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerToken(String);

impl OwnerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Area and length of a geometry measured in the equal-area system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GeometryMetrics {
    pub area_ha: f64,
    pub length_km: f64,
    pub kind: GeometryKind,
}

impl GeometryMetrics {
    /// Create metrics, rounding both values to 4 decimal places
    pub fn new(area_ha: f64, length_km: f64, kind: GeometryKind) -> Self {
        Self { area_ha: round4(area_ha), length_km: round4(length_km), kind }
    }

    /// Metrics reported when computation failed
    pub fn unknown() -> Self {
        Self { area_ha: 0.0, length_km: 0.0, kind: GeometryKind::Unknown }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == GeometryKind::Unknown
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// A named, colored geometry together with its computed metrics
///
/// `feature` holds the canonical GeoJSON Feature text as stored, which may
/// describe a geometry type the engine cannot export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub id: Option<RecordId>,
    pub name: String,
    pub color: String,
    pub feature: String,
    pub metrics: GeometryMetrics,
}

impl GeometryRecord {
    /// Create a record that has not been stored yet
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        feature: impl Into<String>,
        metrics: GeometryMetrics,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            feature: feature.into(),
            metrics,
        }
    }

    /// Create a manually drawn record, falling back to the default name and color
    pub fn manual(
        name: Option<String>,
        color: Option<String>,
        feature: impl Into<String>,
        metrics: GeometryMetrics,
    ) -> Self {
        Self::new(
            name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            feature,
            metrics,
        )
    }

    /// Decode the stored feature into a canonical geometry
    pub fn geometry(&self) -> Result<CanonicalGeometry> {
        canonical::decode_geometry(&self.feature)
    }
}

/// Partial update of a stored record
///
/// A new feature always travels with its freshly computed metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub feature: Option<(String, GeometryMetrics)>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn feature(mut self, feature: impl Into<String>, metrics: GeometryMetrics) -> Self {
        self.feature = Some((feature.into(), metrics));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.feature.is_none()
    }

    /// Apply the patch to a record in place
    pub fn apply(self, record: &mut GeometryRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(color) = self.color {
            record.color = color;
        }
        if let Some((feature, metrics)) = self.feature {
            record.feature = feature;
            record.metrics = metrics;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_rounding() {
        let metrics = GeometryMetrics::new(12.345678, 0.000049, GeometryKind::Polygon);
        assert_eq!(metrics.area_ha, 12.3457);
        assert_eq!(metrics.length_km, 0.0);
        assert!(!metrics.is_unknown());
    }

    #[test]
    fn test_unknown_metrics() {
        let metrics = GeometryMetrics::unknown();
        assert_eq!(metrics.area_ha, 0.0);
        assert_eq!(metrics.length_km, 0.0);
        assert!(metrics.is_unknown());
    }

    #[test]
    fn test_manual_record_defaults() {
        let record = GeometryRecord::manual(None, None, "{}", GeometryMetrics::unknown());
        assert_eq!(record.name, DEFAULT_NAME);
        assert_eq!(record.color, DEFAULT_COLOR);
        assert!(record.id.is_none());
    }

    #[test]
    fn test_patch_apply() {
        let mut record =
            GeometryRecord::new("Plot A", DEFAULT_COLOR, "{}", GeometryMetrics::unknown());
        let metrics = GeometryMetrics::new(1.5, 0.5, GeometryKind::Polygon);

        RecordPatch::new().color("#000000").feature("{\"new\":1}", metrics).apply(&mut record);

        assert_eq!(record.name, "Plot A");
        assert_eq!(record.color, "#000000");
        assert_eq!(record.feature, "{\"new\":1}");
        assert_eq!(record.metrics, metrics);
    }

    #[test]
    fn test_empty_patch() {
        assert!(RecordPatch::new().is_empty());
        assert!(!RecordPatch::new().name("x").is_empty());
    }
}
