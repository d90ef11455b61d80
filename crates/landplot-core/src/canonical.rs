//! Canonical interchange codec (GeoJSON)
//!
//! Stored records and import results are serialized as GeoJSON Features with
//! `[lon, lat]` positions. Parsing goes through the `geojson` crate so that
//! any valid GeoJSON document can be inspected, and only the three land-plot
//! shapes are accepted as canonical geometries.

use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};

use crate::error::{LandplotError, Result};
use crate::models::CanonicalGeometry;

/// One feature split out of a GeoJSON document, kept as canonical text
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFeature {
    /// Value of the `name` property, if it is a string
    pub name: Option<String>,
    /// The feature serialized on its own
    pub text: String,
}

/// GeoJSON type name of a geometry value
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn position(type_name: &str, position: &[f64]) -> Result<[f64; 2]> {
    match position {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(LandplotError::InvalidGeometry {
            geometry_type: type_name.to_string(),
            reason: format!("position needs at least 2 components, found {}", position.len()),
        }),
    }
}

fn positions(type_name: &str, positions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
    positions.iter().map(|p| position(type_name, p)).collect()
}

impl TryFrom<&Value> for CanonicalGeometry {
    type Error = LandplotError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Point(p) => {
                let [lon, lat] = position("Point", p)?;
                Ok(CanonicalGeometry::point(lon, lat))
            }
            Value::LineString(coords) => {
                Ok(CanonicalGeometry::line_string(positions("LineString", coords)?))
            }
            Value::Polygon(rings) => {
                let outer = rings.first().ok_or_else(|| LandplotError::InvalidGeometry {
                    geometry_type: "Polygon".to_string(),
                    reason: "polygon has no rings".to_string(),
                })?;
                Ok(CanonicalGeometry::polygon(positions("Polygon", outer)?))
            }
            other => Err(LandplotError::UnsupportedGeometry {
                geometry_type: value_type_name(other).to_string(),
            }),
        }
    }
}

impl From<&CanonicalGeometry> for Value {
    fn from(geometry: &CanonicalGeometry) -> Self {
        let to_positions = |coords: &[[f64; 2]]| -> Vec<Vec<f64>> {
            coords.iter().map(|c| c.to_vec()).collect()
        };
        match geometry {
            CanonicalGeometry::Point { coordinates } => Value::Point(coordinates.to_vec()),
            CanonicalGeometry::LineString { coordinates } => {
                Value::LineString(to_positions(coordinates))
            }
            CanonicalGeometry::Polygon { coordinates } => {
                Value::Polygon(vec![to_positions(coordinates)])
            }
        }
    }
}

fn parse(text: &str) -> Result<GeoJson> {
    text.parse::<GeoJson>().map_err(|e| LandplotError::Serialization(e.to_string()))
}

/// Decode a GeoJSON Feature or bare geometry into a canonical geometry
pub fn decode_geometry(text: &str) -> Result<CanonicalGeometry> {
    match parse(text)? {
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => CanonicalGeometry::try_from(&geometry.value),
            None => Err(LandplotError::InvalidGeometry {
                geometry_type: "Feature".to_string(),
                reason: "feature has no geometry".to_string(),
            }),
        },
        GeoJson::Geometry(geometry) => CanonicalGeometry::try_from(&geometry.value),
        GeoJson::FeatureCollection(_) => Err(LandplotError::UnsupportedGeometry {
            geometry_type: "FeatureCollection".to_string(),
        }),
    }
}

/// Encode a canonical geometry as a GeoJSON Feature
pub fn encode_feature(geometry: &CanonicalGeometry, properties: JsonObject) -> Result<String> {
    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    };
    Ok(serde_json::to_string(&feature)?)
}

fn split_feature(feature: Feature) -> Result<CanonicalFeature> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(|name| name.as_str())
        .map(str::to_string);
    Ok(CanonicalFeature { name, text: serde_json::to_string(&feature)? })
}

/// Split a GeoJSON document into individual features
///
/// A bare geometry becomes a feature with empty properties. Geometry types
/// are not checked here; exporters report unsupported types themselves.
pub fn split_features(text: &str) -> Result<Vec<CanonicalFeature>> {
    match parse(text)? {
        GeoJson::FeatureCollection(collection) => {
            collection.features.into_iter().map(split_feature).collect()
        }
        GeoJson::Feature(feature) => Ok(vec![split_feature(feature)?]),
        GeoJson::Geometry(geometry) => {
            let feature = Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(JsonObject::new()),
                foreign_members: None,
            };
            Ok(vec![split_feature(feature)?])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_feature() {
        let text = r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[-47.0,-15.0],[-47.1,-15.1]]}}"#;
        let geometry = decode_geometry(text).unwrap();
        assert_eq!(geometry, CanonicalGeometry::line_string(vec![[-47.0, -15.0], [-47.1, -15.1]]));
    }

    #[test]
    fn test_decode_bare_geometry_drops_elevation() {
        let text = r#"{"type":"Point","coordinates":[10.5,20.25,300.0]}"#;
        assert_eq!(decode_geometry(text).unwrap(), CanonicalGeometry::point(10.5, 20.25));
    }

    #[test]
    fn test_decode_unsupported_type() {
        let text = r#"{"type":"MultiPoint","coordinates":[[1.0,2.0],[3.0,4.0]]}"#;
        match decode_geometry(text) {
            Err(LandplotError::UnsupportedGeometry { geometry_type }) => {
                assert_eq!(geometry_type, "MultiPoint")
            }
            other => panic!("expected unsupported geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_geometry("not json"), Err(LandplotError::Serialization(_))));
    }

    #[test]
    fn test_encode_then_decode_polygon() {
        let polygon = CanonicalGeometry::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let text = encode_feature(&polygon, JsonObject::new()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["properties"], serde_json::json!({}));

        assert_eq!(decode_geometry(&text).unwrap(), polygon);
    }

    #[test]
    fn test_decode_polygon_drops_holes() {
        let text = r#"{"type":"Polygon","coordinates":[
            [[0,0],[4,0],[4,4],[0,4],[0,0]],
            [[1,1],[2,1],[2,2],[1,1]]
        ]}"#;
        let polygon = decode_geometry(text).unwrap();
        assert_eq!(polygon.vertices().len(), 5);
        assert_eq!(polygon.vertices()[1], [4.0, 0.0]);
    }

    #[test]
    fn test_decode_polygon_without_rings() {
        let text = r#"{"type":"Polygon","coordinates":[]}"#;
        assert!(matches!(decode_geometry(text), Err(LandplotError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_split_feature_collection() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"North field"},"geometry":{"type":"Point","coordinates":[1.0,2.0]}},
            {"type":"Feature","properties":null,"geometry":{"type":"MultiPoint","coordinates":[[1.0,2.0]]}}
        ]}"#;
        let features = split_features(text).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name.as_deref(), Some("North field"));
        assert!(features[1].name.is_none());
        assert!(decode_geometry(&features[1].text).is_err());
    }
}
