//! Canonical geometry types used across all landplot crates.
//!
//! Coordinates are always `[longitude, latitude]` pairs in WGS 84. Reading
//! and writing GeoJSON goes through [`crate::canonical`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry type classification
///
/// `Unknown` is reserved for records whose metrics could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    #[default]
    Unknown,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry restricted to the shapes a land plot can take
///
/// A polygon carries only its outer ring.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalGeometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    Polygon { coordinates: Vec<[f64; 2]> },
}

impl CanonicalGeometry {
    /// Create a Point geometry
    pub fn point(lon: f64, lat: f64) -> Self {
        CanonicalGeometry::Point { coordinates: [lon, lat] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        CanonicalGeometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry from its outer ring
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        CanonicalGeometry::Polygon { coordinates: ring }
    }

    /// Get the geometry type
    pub fn kind(&self) -> GeometryKind {
        match self {
            CanonicalGeometry::Point { .. } => GeometryKind::Point,
            CanonicalGeometry::LineString { .. } => GeometryKind::LineString,
            CanonicalGeometry::Polygon { .. } => GeometryKind::Polygon,
        }
    }

    /// Vertex sequence in storage order: the single point, the line path, or
    /// the outer ring exactly as stored (not closed).
    pub fn vertices(&self) -> &[[f64; 2]] {
        match self {
            CanonicalGeometry::Point { coordinates } => std::slice::from_ref(coordinates),
            CanonicalGeometry::LineString { coordinates } => coordinates,
            CanonicalGeometry::Polygon { coordinates } => coordinates,
        }
    }
}
