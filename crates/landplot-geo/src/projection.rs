//! Reprojection of geographic coordinates into metric systems
//!
//! Two systems are used:
//! - a single equal-area system (EPSG:6933) for every area/length metric, so
//!   values are comparable wherever the geometry lies;
//! - the UTM zone containing each point (EPSG:326xx north, EPSG:327xx south)
//!   for per-vertex coordinate tables.
//!
//! Transformers are built per call and never cached or shared.

use landplot_core::error::{LandplotError, Result};
use landplot_core::models::CanonicalGeometry;
use proj::Proj;
use serde::Serialize;
use std::fmt;

/// Geographic coordinates (longitude, latitude) on WGS 84
pub const GEOGRAPHIC_CRS: &str = "EPSG:4326";

/// EPSG code of the equal-area system used for metrics
pub const EQUAL_AREA_EPSG: u32 = 6933;

const UTM_NORTH_BASE_EPSG: u32 = 32600;
const UTM_SOUTH_BASE_EPSG: u32 = 32700;
const UTM_ZONE_COUNT: u8 = 60;

/// Hemisphere half of a UTM zone label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Southern for negative latitudes, northern otherwise (the equator is north)
    pub fn for_latitude(lat: f64) -> Self {
        if lat < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }

    fn base_epsg(&self) -> u32 {
        match self {
            Hemisphere::North => UTM_NORTH_BASE_EPSG,
            Hemisphere::South => UTM_SOUTH_BASE_EPSG,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// UTM zone number for a longitude: `floor((lon + 180) / 6) + 1`
///
/// Longitude 180 belongs to zone 60 rather than a nonexistent zone 61.
pub fn utm_zone(lon: f64) -> Result<u8> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(LandplotError::InvalidCoordinate {
            lon,
            lat: f64::NAN,
            reason: "longitude must be within [-180, 180]".to_string(),
        });
    }
    let zone = ((lon + 180.0) / 6.0).floor() as u8 + 1;
    Ok(zone.min(UTM_ZONE_COUNT))
}

/// EPSG code of a UTM zone: 326xx in the north, 327xx in the south
pub fn utm_epsg(zone: u8, hemisphere: Hemisphere) -> u32 {
    hemisphere.base_epsg() + u32::from(zone)
}

/// One point projected into its own UTM zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtmZoneResult {
    pub zone: u8,
    pub hemisphere: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

impl UtmZoneResult {
    /// Zone label such as `23S`
    pub fn zone_label(&self) -> String {
        format!("{}{}", self.zone, self.hemisphere)
    }
}

fn validate_geographic(lon: f64, lat: f64) -> Result<()> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(LandplotError::InvalidCoordinate {
            lon,
            lat,
            reason: "coordinates must be finite".to_string(),
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(LandplotError::InvalidCoordinate {
            lon,
            lat,
            reason: "longitude must be within [-180, 180]".to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(LandplotError::InvalidCoordinate {
            lon,
            lat,
            reason: "latitude must be within [-90, 90]".to_string(),
        });
    }
    Ok(())
}

fn create_projection(to: &str) -> Result<Proj> {
    Proj::new_known_crs(GEOGRAPHIC_CRS, to, None).map_err(|e| LandplotError::Projection {
        from: GEOGRAPHIC_CRS.to_string(),
        to: to.to_string(),
        reason: format!("Failed to create projection: {}", e),
    })
}

fn convert(proj: &Proj, target: &str, lon: f64, lat: f64) -> Result<(f64, f64)> {
    validate_geographic(lon, lat)?;
    let (x, y) = proj.convert((lon, lat)).map_err(|e| LandplotError::Projection {
        from: GEOGRAPHIC_CRS.to_string(),
        to: target.to_string(),
        reason: format!("Projection failed: {}", e),
    })?;
    if !x.is_finite() || !y.is_finite() {
        return Err(LandplotError::Projection {
            from: GEOGRAPHIC_CRS.to_string(),
            to: target.to_string(),
            reason: format!("Projection of ({}, {}) is not finite", lon, lat),
        });
    }
    Ok((x, y))
}

/// Transformer into the equal-area system, scoped to one computation
pub struct EqualAreaProjection {
    proj: Proj,
    target: String,
}

impl EqualAreaProjection {
    pub fn new() -> Result<Self> {
        let target = format!("EPSG:{}", EQUAL_AREA_EPSG);
        let proj = create_projection(&target)?;
        Ok(Self { proj, target })
    }

    /// Project one `[lon, lat]` pair into metres
    pub fn project(&self, coord: [f64; 2]) -> Result<[f64; 2]> {
        let (x, y) = convert(&self.proj, &self.target, coord[0], coord[1])?;
        Ok([x, y])
    }

    /// Project a coordinate sequence, failing on the first bad coordinate
    pub fn project_all(&self, coords: &[[f64; 2]]) -> Result<Vec<[f64; 2]>> {
        coords.iter().map(|c| self.project(*c)).collect()
    }

    /// Project every vertex of a geometry, keeping its shape
    pub fn project_geometry(&self, geometry: &CanonicalGeometry) -> Result<CanonicalGeometry> {
        let projected = match geometry {
            CanonicalGeometry::Point { coordinates } => {
                let [x, y] = self.project(*coordinates)?;
                CanonicalGeometry::point(x, y)
            }
            CanonicalGeometry::LineString { coordinates } => {
                CanonicalGeometry::line_string(self.project_all(coordinates)?)
            }
            CanonicalGeometry::Polygon { coordinates } => {
                CanonicalGeometry::polygon(self.project_all(coordinates)?)
            }
        };
        Ok(projected)
    }
}

impl fmt::Debug for EqualAreaProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualAreaProjection").field("target", &self.target).finish()
    }
}

/// Project a single geographic point into the equal-area system
pub fn to_equal_area(coord: [f64; 2]) -> Result<[f64; 2]> {
    EqualAreaProjection::new()?.project(coord)
}

/// Transformer into the UTM zone of one point, with its zone label
pub struct UtmProjection {
    proj: Proj,
    zone: u8,
    hemisphere: Hemisphere,
    target: String,
}

impl UtmProjection {
    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn epsg(&self) -> u32 {
        utm_epsg(self.zone, self.hemisphere)
    }

    /// Project a point into this zone's easting/northing
    pub fn project(&self, lon: f64, lat: f64) -> Result<UtmZoneResult> {
        let (easting, northing) = convert(&self.proj, &self.target, lon, lat)?;
        Ok(UtmZoneResult { zone: self.zone, hemisphere: self.hemisphere, easting, northing })
    }
}

impl fmt::Debug for UtmProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtmProjection")
            .field("zone", &self.zone)
            .field("hemisphere", &self.hemisphere)
            .field("target", &self.target)
            .finish()
    }
}

/// Select the UTM system for a point and build its transformer
pub fn utm_projection_for(lon: f64, lat: f64) -> Result<UtmProjection> {
    validate_geographic(lon, lat)?;
    let zone = utm_zone(lon)?;
    let hemisphere = Hemisphere::for_latitude(lat);
    let target = format!("EPSG:{}", utm_epsg(zone, hemisphere));
    let proj = create_projection(&target)?;
    Ok(UtmProjection { proj, zone, hemisphere, target })
}

/// Resolve the UTM zone of a point and project it
pub fn utm_point(lon: f64, lat: f64) -> Result<UtmZoneResult> {
    utm_projection_for(lon, lat)?.project(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_utm_zone_formula() {
        assert_eq!(utm_zone(-180.0).unwrap(), 1);
        assert_eq!(utm_zone(-177.0).unwrap(), 1);
        assert_eq!(utm_zone(-174.0).unwrap(), 2);
        assert_eq!(utm_zone(-45.0).unwrap(), 23);
        assert_eq!(utm_zone(0.0).unwrap(), 31);
        assert_eq!(utm_zone(179.9).unwrap(), 60);
        assert_eq!(utm_zone(180.0).unwrap(), 60);
    }

    #[test]
    fn test_utm_zone_rejects_out_of_range() {
        assert!(utm_zone(180.5).is_err());
        assert!(utm_zone(f64::NAN).is_err());
    }

    #[test]
    fn test_hemisphere_and_epsg() {
        assert_eq!(Hemisphere::for_latitude(-0.1), Hemisphere::South);
        assert_eq!(Hemisphere::for_latitude(0.0), Hemisphere::North);
        assert_eq!(utm_epsg(23, Hemisphere::South), 32723);
        assert_eq!(utm_epsg(31, Hemisphere::North), 32631);
    }

    #[test]
    fn test_utm_point_on_central_meridian() {
        // -45 is the central meridian of zone 23
        let result = utm_point(-45.0, -15.0).unwrap();
        assert_eq!(result.zone, 23);
        assert_eq!(result.hemisphere, Hemisphere::South);
        assert_eq!(result.zone_label(), "23S");
        assert!((result.easting - 500_000.0).abs() < 1e-3);
        assert!(result.northing > 8_000_000.0 && result.northing < 8_500_000.0);
    }

    #[test]
    fn test_utm_projection_for_reports_zone() {
        let projection = utm_projection_for(2.35, 48.85).unwrap();
        assert_eq!(projection.zone(), 31);
        assert_eq!(projection.hemisphere(), Hemisphere::North);
        assert_eq!(projection.epsg(), 32631);
    }

    #[test]
    fn test_equal_area_origin() {
        let [x, y] = to_equal_area([0.0, 0.0]).unwrap();
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_equal_area_rejects_invalid_input() {
        assert!(matches!(
            to_equal_area([f64::INFINITY, 0.0]),
            Err(LandplotError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            to_equal_area([0.0, 95.0]),
            Err(LandplotError::InvalidCoordinate { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_zone_constant_within_band(band in 0u8..60, offset in 0.0f64..5.999) {
            let west = -180.0 + 6.0 * f64::from(band);
            prop_assert_eq!(utm_zone(west).unwrap(), band + 1);
            prop_assert_eq!(utm_zone(west + offset).unwrap(), band + 1);
        }

        #[test]
        fn prop_zone_steps_by_one_across_boundary(band in 1u8..60) {
            let boundary = -180.0 + 6.0 * f64::from(band);
            let west = utm_zone(boundary - 1e-9).unwrap();
            let east = utm_zone(boundary).unwrap();
            prop_assert_eq!(east, west + 1);
        }
    }
}
