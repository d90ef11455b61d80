//! Bridges between canonical geometries and the `geo` crate.

use geo::Geometry as GeoGeometry;
use landplot_core::models::CanonicalGeometry;

fn to_line_string(coordinates: &[[f64; 2]]) -> geo::LineString {
    coordinates.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect()
}

/// Convert a canonical geometry to a `geo::Geometry`
///
/// The polygon exterior is closed by `geo::Polygon::new` if it was stored open.
pub fn to_geo_geometry(geom: &CanonicalGeometry) -> GeoGeometry {
    match geom {
        CanonicalGeometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        CanonicalGeometry::LineString { coordinates } => {
            GeoGeometry::LineString(to_line_string(coordinates))
        }
        CanonicalGeometry::Polygon { coordinates } => {
            GeoGeometry::Polygon(geo::Polygon::new(to_line_string(coordinates), vec![]))
        }
    }
}

/// Extension trait for canonical geometries with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;
}

impl GeometryExt for CanonicalGeometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversion() {
        let geom = CanonicalGeometry::point(115.0, -8.5);
        match geom.to_geo() {
            GeoGeometry::Point(p) => {
                assert!((p.x() - 115.0).abs() < 1e-10);
                assert!((p.y() + 8.5).abs() < 1e-10);
            }
            other => panic!("Expected Point geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_open_ring_is_closed() {
        let geom = CanonicalGeometry::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        match geom.to_geo() {
            GeoGeometry::Polygon(p) => {
                assert_eq!(p.exterior().0.len(), 4);
                assert_eq!(p.exterior().0.first(), p.exterior().0.last());
            }
            other => panic!("Expected Polygon geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_line_string_keeps_order() {
        let geom = CanonicalGeometry::line_string(vec![[3.0, 1.0], [1.0, 3.0], [2.0, 2.0]]);
        match geom.to_geo() {
            GeoGeometry::LineString(ls) => {
                let xs: Vec<f64> = ls.coords().map(|c| c.x).collect();
                assert_eq!(xs, vec![3.0, 1.0, 2.0]);
            }
            other => panic!("Expected LineString geometry, got {:?}", other),
        }
    }
}
