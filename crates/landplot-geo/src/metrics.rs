//! Area and length metrics in the equal-area system
//!
//! `try_compute_metrics` reports every failure. `compute_metrics` is the soft
//! variant the rest of the system relies on: it always returns a value and
//! falls back to zeroed `Unknown` metrics.

use geo::{Area, Euclidean, Length};
use landplot_core::canonical;
use landplot_core::error::Result;
use landplot_core::models::{
    CanonicalGeometry, GeometryKind, GeometryMetrics, GeometryRecord, RecordPatch,
};

use crate::models::GeometryExt;
use crate::projection::EqualAreaProjection;
use crate::validation::validate_geometry;

const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;
const METRES_PER_KILOMETRE: f64 = 1_000.0;

/// Compute area (ha) and length (km), propagating projection and geometry errors
pub fn try_compute_metrics(geometry: &CanonicalGeometry) -> Result<GeometryMetrics> {
    validate_geometry(geometry).into_result(geometry.kind().as_str())?;

    let projected = EqualAreaProjection::new()?.project_geometry(geometry)?;

    let metrics = match projected.to_geo() {
        geo::Geometry::Polygon(polygon) => GeometryMetrics::new(
            polygon.unsigned_area() / SQUARE_METRES_PER_HECTARE,
            Euclidean.length(polygon.exterior()) / METRES_PER_KILOMETRE,
            GeometryKind::Polygon,
        ),
        geo::Geometry::LineString(line) => GeometryMetrics::new(
            0.0,
            Euclidean.length(&line) / METRES_PER_KILOMETRE,
            GeometryKind::LineString,
        ),
        _ => GeometryMetrics::new(0.0, 0.0, GeometryKind::Point),
    };

    Ok(metrics)
}

/// Compute metrics, degrading to `GeometryMetrics::unknown()` on any error
pub fn compute_metrics(geometry: &CanonicalGeometry) -> GeometryMetrics {
    match try_compute_metrics(geometry) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::debug!(error = %e, "Metrics computation failed, reporting Unknown");
            GeometryMetrics::unknown()
        }
    }
}

/// Compute metrics for stored canonical text with the same soft contract
pub fn metrics_for_feature(feature: &str) -> GeometryMetrics {
    match canonical::decode_geometry(feature) {
        Ok(geometry) => compute_metrics(&geometry),
        Err(e) => {
            tracing::debug!(error = %e, "Feature could not be decoded, reporting Unknown");
            GeometryMetrics::unknown()
        }
    }
}

/// Build a manually drawn record with freshly computed metrics
pub fn measured_record(
    name: Option<String>,
    color: Option<String>,
    feature: impl Into<String>,
) -> GeometryRecord {
    let feature = feature.into();
    let metrics = metrics_for_feature(&feature);
    GeometryRecord::manual(name, color, feature, metrics)
}

/// Build a patch that replaces a record's feature and its metrics
pub fn geometry_patch(feature: impl Into<String>) -> RecordPatch {
    let feature = feature.into();
    let metrics = metrics_for_feature(&feature);
    RecordPatch::new().feature(feature, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CanonicalGeometry {
        CanonicalGeometry::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
    }

    #[test]
    fn test_equatorial_degree_box() {
        let metrics = try_compute_metrics(&unit_box()).unwrap();
        assert_eq!(metrics.kind, GeometryKind::Polygon);
        // Cylindrical equal-area with standard parallel 30°
        assert!((metrics.area_ha - 1_230_846.39).abs() / 1_230_846.39 < 1e-3);
        assert!((metrics.length_km - 448.1065).abs() / 448.1065 < 1e-3);
    }

    #[test]
    fn test_open_ring_measures_like_closed_ring() {
        let open = CanonicalGeometry::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(compute_metrics(&open), compute_metrics(&unit_box()));
    }

    #[test]
    fn test_line_string_length() {
        let line = CanonicalGeometry::line_string(vec![[0.0, 0.0], [1.0, 0.0]]);
        let metrics = compute_metrics(&line);
        assert_eq!(metrics.kind, GeometryKind::LineString);
        assert_eq!(metrics.area_ha, 0.0);
        assert!((metrics.length_km - 96.4863).abs() < 0.01);
    }

    #[test]
    fn test_point_has_zero_metrics() {
        let metrics = compute_metrics(&CanonicalGeometry::point(-47.9, -15.8));
        assert_eq!(metrics, GeometryMetrics::new(0.0, 0.0, GeometryKind::Point));
    }

    #[test]
    fn test_invalid_geometry_is_unknown() {
        let line = CanonicalGeometry::line_string(vec![[0.0, 0.0]]);
        assert!(try_compute_metrics(&line).is_err());
        assert_eq!(compute_metrics(&line), GeometryMetrics::unknown());

        let out_of_range = CanonicalGeometry::point(200.0, 0.0);
        assert_eq!(compute_metrics(&out_of_range), GeometryMetrics::unknown());
    }

    #[test]
    fn test_metrics_for_feature_soft_failures() {
        assert!(metrics_for_feature("garbage").is_unknown());
        assert!(metrics_for_feature(r#"{"type":"MultiPoint","coordinates":[[0,0]]}"#).is_unknown());

        let feature = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1.0,1.0]}}"#;
        assert_eq!(metrics_for_feature(feature).kind, GeometryKind::Point);
    }

    #[test]
    fn test_geometry_patch_carries_metrics() {
        let feature = r#"{"type":"LineString","coordinates":[[0.0,0.0],[0.0,1.0]]}"#;
        let patch = geometry_patch(feature);
        let (text, metrics) = patch.feature.unwrap();
        assert_eq!(text, feature);
        assert_eq!(metrics.kind, GeometryKind::LineString);
        assert!(metrics.length_km > 0.0);
    }

    #[test]
    fn test_measured_record_defaults() {
        let record = measured_record(None, None, "not json");
        assert_eq!(record.name, "Unnamed");
        assert_eq!(record.color, "#ffc107");
        assert!(record.metrics.is_unknown());
    }
}
