//! KML placemark export and namespace-agnostic import

use landplot_core::error::{LandplotError, Result};
use landplot_core::models::{CanonicalGeometry, GeometryRecord};
use landplot_geo::metrics::compute_metrics;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::export::{ExportOutcome, ExportedFile};
use crate::import::ImportedGeometry;
use crate::xml::{parse_document, Element};

pub const MEDIA_TYPE: &str = "application/vnd.google-earth.kml+xml";

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Name given to placemarks without a `name` element
pub const DEFAULT_IMPORT_NAME: &str = "Imported (KML)";

const LINE_COLOR: &str = "ff0000ff";
const LINE_WIDTH: &str = "3";
const POLY_COLOR: &str = "7f00ff00";

fn kml_error(e: impl ToString) -> LandplotError {
    LandplotError::format("KML", e)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export a record as a single-placemark KML document
pub fn export_kml(record: &GeometryRecord) -> Result<ExportOutcome> {
    let geometry = match record.geometry() {
        Ok(geometry) => geometry,
        Err(LandplotError::UnsupportedGeometry { geometry_type }) => {
            return Ok(ExportOutcome::Unsupported { geometry_type })
        }
        Err(e) => return Err(e),
    };

    Ok(ExportOutcome::Exported(ExportedFile {
        file_name: format!("{}.kml", record.name),
        media_type: MEDIA_TYPE,
        bytes: write_placemark(&record.name, &geometry)?,
    }))
}

/// Render one named geometry as a KML document
///
/// Vertices are written exactly as given; polygon rings are not closed.
pub fn write_placemark(name: &str, geometry: &CanonicalGeometry) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(kml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)])))
        .map_err(kml_error)?;
    start(&mut writer, "Placemark")?;
    text_element(&mut writer, "name", name)?;
    write_style(&mut writer)?;
    write_geometry(&mut writer, geometry)?;
    end(&mut writer, "Placemark")?;
    end(&mut writer, "kml")?;

    Ok(writer.into_inner())
}

fn start<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag))).map_err(kml_error)
}

fn end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag))).map_err(kml_error)
}

fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    start(writer, tag)?;
    writer.write_event(Event::Text(BytesText::new(text))).map_err(kml_error)?;
    end(writer, tag)
}

fn write_style<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    start(writer, "Style")?;
    start(writer, "LineStyle")?;
    text_element(writer, "color", LINE_COLOR)?;
    text_element(writer, "width", LINE_WIDTH)?;
    end(writer, "LineStyle")?;
    start(writer, "PolyStyle")?;
    text_element(writer, "color", POLY_COLOR)?;
    end(writer, "PolyStyle")?;
    end(writer, "Style")
}

fn format_coordinates(coords: &[[f64; 2]]) -> String {
    coords.iter().map(|[lon, lat]| format!("{},{},0", lon, lat)).collect::<Vec<_>>().join(" ")
}

fn write_geometry<W: Write>(writer: &mut Writer<W>, geometry: &CanonicalGeometry) -> Result<()> {
    match geometry {
        CanonicalGeometry::Point { coordinates } => {
            start(writer, "Point")?;
            text_element(writer, "coordinates", &format_coordinates(&[*coordinates]))?;
            end(writer, "Point")
        }
        CanonicalGeometry::LineString { coordinates } => {
            start(writer, "LineString")?;
            text_element(writer, "coordinates", &format_coordinates(coordinates))?;
            end(writer, "LineString")
        }
        CanonicalGeometry::Polygon { coordinates } => {
            start(writer, "Polygon")?;
            start(writer, "outerBoundaryIs")?;
            start(writer, "LinearRing")?;
            text_element(writer, "coordinates", &format_coordinates(coordinates))?;
            end(writer, "LinearRing")?;
            end(writer, "outerBoundaryIs")?;
            end(writer, "Polygon")
        }
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse a KML coordinate string into `[lon, lat]` pairs
///
/// Tuples are whitespace separated and components comma separated; altitude
/// is ignored and tuples that do not start with two numbers are dropped.
pub fn parse_coordinates(text: &str) -> Vec<[f64; 2]> {
    text.replace(['\n', '\t'], " ")
        .split(' ')
        .filter(|token| !token.trim().is_empty())
        .filter_map(|token| {
            let mut parts = token.split(',');
            let lon = parts.next()?.trim().parse::<f64>().ok()?;
            let lat = parts.next()?.trim().parse::<f64>().ok()?;
            Some([lon, lat])
        })
        .collect()
}

/// The geometry kinds a placemark can contribute
#[derive(Debug, Clone, PartialEq)]
enum PlacemarkGeometry {
    Polygon(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    Point([f64; 2]),
}

impl PlacemarkGeometry {
    /// Read a geometry element, or `None` if it has too few valid vertices
    fn from_element(element: &Element) -> Option<Self> {
        let coordinates = |e: &Element| e.find("coordinates").map(|c| parse_coordinates(&c.text));

        match element.name.as_str() {
            "Polygon" => {
                let ring = element
                    .find("outerBoundaryIs")
                    .and_then(coordinates)
                    .or_else(|| coordinates(element))?;
                (ring.len() > 2).then_some(PlacemarkGeometry::Polygon(ring))
            }
            "LineString" => {
                let path = coordinates(element)?;
                (path.len() > 1).then_some(PlacemarkGeometry::LineString(path))
            }
            "Point" => coordinates(element)?.first().copied().map(PlacemarkGeometry::Point),
            _ => None,
        }
    }

    fn into_canonical(self) -> CanonicalGeometry {
        match self {
            PlacemarkGeometry::Polygon(ring) => CanonicalGeometry::polygon(ring),
            PlacemarkGeometry::LineString(path) => CanonicalGeometry::line_string(path),
            PlacemarkGeometry::Point([lon, lat]) => CanonicalGeometry::point(lon, lat),
        }
    }
}

/// Read one placemark: the last non-empty `name` and the first valid geometry
fn read_placemark(placemark: &Element) -> Option<ImportedGeometry> {
    let mut name = DEFAULT_IMPORT_NAME.to_string();
    let mut geometry: Option<PlacemarkGeometry> = None;

    for element in placemark.descendants().skip(1) {
        if element.is("name") {
            let text = element.trimmed_text();
            if !text.is_empty() {
                name = text.to_string();
            }
        } else if geometry.is_none() {
            geometry = PlacemarkGeometry::from_element(element);
        }
    }

    let geometry = geometry?.into_canonical();
    let metrics = compute_metrics(&geometry);
    Some(ImportedGeometry { name, geometry, metrics })
}

/// Import every placemark with a usable geometry from a KML document
///
/// A document that cannot be parsed yields no geometries.
pub fn import_kml(bytes: &[u8]) -> Vec<ImportedGeometry> {
    let Some(root) = parse_document(bytes) else {
        tracing::warn!("KML document could not be parsed, nothing imported");
        return Vec::new();
    };

    let placemarks: Vec<&Element> = root.descendants().filter(|e| e.is("Placemark")).collect();
    let imported: Vec<ImportedGeometry> =
        placemarks.iter().filter_map(|placemark| read_placemark(placemark)).collect();

    tracing::debug!(
        placemarks = placemarks.len(),
        imported = imported.len(),
        "Read KML document"
    );
    imported
}
