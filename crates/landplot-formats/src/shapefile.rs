//! Zipped shapefile bundle export and import
//!
//! Export writes a single-record `.shp/.shx/.dbf/.prj` group into a scratch
//! directory and packs it into a zip archive. Import extracts an uploaded
//! archive, reads the first `.shp` it contains and turns every usable shape
//! into a measured geometry.

use ::shapefile::dbase::{
    self, FieldInfo, FieldName, FieldType, FieldValue, Record, TableWriterBuilder,
};
use ::shapefile::{
    Point, PointM, PointZ, Polygon, PolygonRing, Polyline, Shape, ShapeReader, Writer,
};
use landplot_core::error::{LandplotError, Result};
use landplot_core::models::{CanonicalGeometry, GeometryMetrics, GeometryRecord};
use landplot_geo::metrics::compute_metrics;
use landplot_geo::validation::validate_geometry;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::{ExportOutcome, ExportedFile};
use crate::import::ImportedGeometry;
use crate::scratch::ScratchDir;

pub const MEDIA_TYPE: &str = "application/zip";

/// Name given to shapes whose record holds no text value
pub const DEFAULT_IMPORT_NAME: &str = "Imported (SHP)";

/// Geographic WGS 84 definition written to every exported `.prj`
pub const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]]"#;

const EXPORT_BASENAME: &str = "export";
const BUNDLE_EXTENSIONS: [&str; 4] = ["shp", "shx", "dbf", "prj"];

const NAME_FIELD: &str = "NAME";
const AREA_FIELD: &str = "AREA_HA";
const LENGTH_FIELD: &str = "COMP_KM";
const NAME_FIELD_LENGTH: u8 = 100;
const NUMERIC_FIELD_LENGTH: u8 = 19;
const NUMERIC_FIELD_DECIMALS: u8 = 4;

fn shp_error(e: impl ToString) -> LandplotError {
    LandplotError::format("Shapefile", e)
}

fn zip_error(e: impl ToString) -> LandplotError {
    LandplotError::format("Zip", e)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export a record as a zipped shapefile bundle
pub fn export_shapefile(record: &GeometryRecord) -> Result<ExportOutcome> {
    let geometry = match record.geometry() {
        Ok(geometry) => geometry,
        Err(LandplotError::UnsupportedGeometry { geometry_type }) => {
            return Ok(ExportOutcome::Unsupported { geometry_type })
        }
        Err(e) => return Err(e),
    };
    validate_geometry(&geometry).into_result(geometry.kind().as_str())?;

    let scratch = ScratchDir::new()?;
    let base = scratch.join(EXPORT_BASENAME);
    write_bundle(&base, &record.name, &geometry, &record.metrics)?;
    let bytes = pack_bundle(&base, &record.name)?;

    Ok(ExportOutcome::Exported(ExportedFile {
        file_name: format!("{}_shp.zip", record.name),
        media_type: MEDIA_TYPE,
        bytes,
    }))
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(shp_error)
}

fn attribute_table() -> Result<TableWriterBuilder> {
    Ok(TableWriterBuilder::new()
        .add_character_field(field_name(NAME_FIELD)?, NAME_FIELD_LENGTH)
        .add_numeric_field(field_name(AREA_FIELD)?, NUMERIC_FIELD_LENGTH, NUMERIC_FIELD_DECIMALS)
        .add_numeric_field(field_name(LENGTH_FIELD)?, NUMERIC_FIELD_LENGTH, NUMERIC_FIELD_DECIMALS))
}

/// Cut a name to the character field width without splitting a character
fn fit_name(name: &str) -> String {
    let limit = usize::from(NAME_FIELD_LENGTH);
    if name.len() <= limit {
        return name.to_string();
    }
    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

fn shape_points(coords: &[[f64; 2]]) -> Vec<Point> {
    coords.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

/// Write `<base>.shp/.shx/.dbf/.prj` holding one shape and one record
pub fn write_bundle(
    base: &Path,
    name: &str,
    geometry: &CanonicalGeometry,
    metrics: &GeometryMetrics,
) -> Result<()> {
    let mut record = Record::default();
    record.insert(NAME_FIELD.to_string(), FieldValue::Character(Some(fit_name(name))));
    record.insert(AREA_FIELD.to_string(), FieldValue::Numeric(Some(metrics.area_ha)));
    record.insert(LENGTH_FIELD.to_string(), FieldValue::Numeric(Some(metrics.length_km)));

    {
        let mut writer =
            Writer::from_path(base.with_extension("shp"), attribute_table()?).map_err(shp_error)?;
        match geometry {
            CanonicalGeometry::Point { coordinates: [x, y] } => {
                writer.write_shape_and_record(&Point::new(*x, *y), &record)
            }
            CanonicalGeometry::LineString { coordinates } => {
                writer.write_shape_and_record(&Polyline::new(shape_points(coordinates)), &record)
            }
            CanonicalGeometry::Polygon { coordinates } => writer.write_shape_and_record(
                &Polygon::new(PolygonRing::Outer(shape_points(coordinates))),
                &record,
            ),
        }
        .map_err(shp_error)?;
    }

    fs::write(base.with_extension("prj"), WGS84_WKT)?;
    Ok(())
}

/// Zip whichever bundle files exist, renamed to `{name}.{ext}`
pub fn pack_bundle(base: &Path, name: &str) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for extension in BUNDLE_EXTENSIONS {
        let path = base.with_extension(extension);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Bundle file missing, not packed");
            continue;
        }
        zip.start_file(format!("{}.{}", name, extension), options).map_err(zip_error)?;
        zip.write_all(&fs::read(&path)?)?;
    }

    Ok(zip.finish().map_err(zip_error)?.into_inner())
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Point types that carry a planar position
trait PlanarPoint {
    fn lon_lat(&self) -> [f64; 2];
}

impl PlanarPoint for Point {
    fn lon_lat(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl PlanarPoint for PointM {
    fn lon_lat(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl PlanarPoint for PointZ {
    fn lon_lat(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

fn positions<P: PlanarPoint>(points: &[P]) -> Vec<[f64; 2]> {
    points.iter().map(PlanarPoint::lon_lat).collect()
}

fn single_part<P: PlanarPoint>(parts: &[Vec<P>]) -> Result<CanonicalGeometry> {
    match parts {
        [part] => Ok(CanonicalGeometry::line_string(positions(part))),
        _ => Err(LandplotError::UnsupportedGeometry {
            geometry_type: format!("Polyline with {} parts", parts.len()),
        }),
    }
}

/// First outer ring, or the first ring when the winding marks none as outer
fn outer_ring<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Result<CanonicalGeometry> {
    rings
        .iter()
        .find(|ring| matches!(ring, PolygonRing::Outer(_)))
        .or_else(|| rings.first())
        .map(|ring| CanonicalGeometry::polygon(positions(ring.points())))
        .ok_or_else(|| LandplotError::InvalidGeometry {
            geometry_type: "Polygon".to_string(),
            reason: "polygon has no rings".to_string(),
        })
}

/// Canonical geometry of one shape
pub fn shape_geometry(shape: &Shape) -> Result<CanonicalGeometry> {
    match shape {
        Shape::Point(p) => Ok(CanonicalGeometry::point(p.x, p.y)),
        Shape::PointM(p) => Ok(CanonicalGeometry::point(p.x, p.y)),
        Shape::PointZ(p) => Ok(CanonicalGeometry::point(p.x, p.y)),
        Shape::Polyline(line) => single_part(line.parts()),
        Shape::PolylineM(line) => single_part(line.parts()),
        Shape::PolylineZ(line) => single_part(line.parts()),
        Shape::Polygon(polygon) => outer_ring(polygon.rings()),
        Shape::PolygonM(polygon) => outer_ring(polygon.rings()),
        Shape::PolygonZ(polygon) => outer_ring(polygon.rings()),
        other => Err(LandplotError::UnsupportedGeometry {
            geometry_type: format!("{:?}", other.shapetype()),
        }),
    }
}

/// Names of the text columns of a `.dbf`, in column order
fn text_columns(fields: &[FieldInfo]) -> Vec<String> {
    fields
        .iter()
        .filter(|field| matches!(field.field_type(), FieldType::Character | FieldType::Memo))
        .map(|field| field.name().to_string())
        .collect()
}

/// Value of the first text column that holds one
fn record_name(record: &Record, text_columns: &[String]) -> Option<String> {
    text_columns.iter().find_map(|column| {
        let text = match record.get(column)? {
            FieldValue::Character(Some(text)) => text,
            FieldValue::Memo(text) => text,
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

/// Bundle member next to `path`, lower-case extension first
fn sibling(path: &Path, extension: &str) -> PathBuf {
    let lower = path.with_extension(extension);
    if lower.exists() {
        return lower;
    }
    path.with_extension(extension.to_ascii_uppercase())
}

/// Open the shapes of a bundle, indexed through its `.shx` when present
fn open_shapes(shp: &Path) -> Result<ShapeReader<BufReader<File>>> {
    let source = BufReader::new(File::open(shp)?);
    let shx = sibling(shp, "shx");
    let reader = if shx.exists() {
        ShapeReader::with_shx(source, BufReader::new(File::open(&shx)?))
    } else {
        ShapeReader::new(source)
    };
    reader.map_err(shp_error)
}

fn read_feature(shape: &Shape, record: &Record, text_columns: &[String]) -> Result<ImportedGeometry> {
    let geometry = shape_geometry(shape)?;
    let name = record_name(record, text_columns).unwrap_or_else(|| DEFAULT_IMPORT_NAME.to_string());
    let metrics = compute_metrics(&geometry);
    Ok(ImportedGeometry { name, geometry, metrics })
}

fn read_archive(bytes: &[u8]) -> Result<Vec<ImportedGeometry>> {
    let scratch = ScratchDir::new()?;
    scratch.extract_zip(bytes)?;

    let Some(shp) = scratch.find_first("shp")? else {
        tracing::warn!("Archive contains no .shp file");
        return Ok(Vec::new());
    };

    // Members are resolved one by one so upper-case extensions are found too
    let table = dbase::Reader::from_path(sibling(&shp, "dbf")).map_err(shp_error)?;
    let columns = text_columns(table.fields());
    let mut reader = ::shapefile::Reader::new(open_shapes(&shp)?, table);
    let mut imported = Vec::new();

    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let feature = item
            .map_err(shp_error)
            .and_then(|(shape, record)| read_feature(&shape, &record, &columns));
        match feature {
            Ok(geometry) => imported.push(geometry),
            Err(e) => tracing::warn!(feature = index, error = %e, "Skipping shapefile feature"),
        }
    }

    tracing::debug!(path = %shp.display(), imported = imported.len(), "Read shapefile");
    Ok(imported)
}

/// Import every usable shape from a zipped shapefile bundle
///
/// An archive that cannot be opened or read yields no geometries.
pub fn import_shapefile(bytes: &[u8]) -> Vec<ImportedGeometry> {
    match read_archive(bytes) {
        Ok(imported) => imported,
        Err(e) => {
            tracing::warn!(error = %e, "Shapefile archive could not be read, nothing imported");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landplot_core::models::GeometryKind;

    #[test]
    fn test_fit_name() {
        assert_eq!(fit_name("Plot"), "Plot");
        let long = "é".repeat(60);
        let fitted = fit_name(&long);
        assert_eq!(fitted.len(), 100);
        assert!(long.starts_with(&fitted));
    }

    #[test]
    fn test_shape_geometry_points() {
        let shape = Shape::PointZ(PointZ::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(shape_geometry(&shape).unwrap(), CanonicalGeometry::point(1.0, 2.0));
    }

    #[test]
    fn test_shape_geometry_multi_part_polyline() {
        let shape = Shape::Polyline(Polyline::with_parts(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            vec![Point::new(2.0, 2.0), Point::new(3.0, 3.0)],
        ]));
        assert!(matches!(
            shape_geometry(&shape),
            Err(LandplotError::UnsupportedGeometry { .. })
        ));
    }

    #[test]
    fn test_polygon_without_outer_ring_uses_first_ring() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let shape = Shape::Polygon(Polygon::with_rings(vec![PolygonRing::Inner(ring)]));

        let geometry = shape_geometry(&shape).unwrap();
        assert_eq!(geometry.kind(), GeometryKind::Polygon);
        assert_eq!(geometry.vertices().len(), 4);
    }

    #[test]
    fn test_shape_geometry_null_shape() {
        assert!(shape_geometry(&Shape::NullShape).is_err());
    }

    #[test]
    fn test_record_name_uses_first_text_column_with_value() {
        let mut record = Record::default();
        record.insert("ID".to_string(), FieldValue::Numeric(Some(7.0)));
        record.insert("CODE".to_string(), FieldValue::Character(Some("  ".to_string())));
        record.insert("LABEL".to_string(), FieldValue::Character(Some("East pasture".to_string())));
        record.insert("OWNER".to_string(), FieldValue::Character(Some("Someone".to_string())));

        let columns = vec!["CODE".to_string(), "LABEL".to_string(), "OWNER".to_string()];
        assert_eq!(record_name(&record, &columns).as_deref(), Some("East pasture"));
        assert_eq!(record_name(&record, &[]), None);
    }

    #[test]
    fn test_written_bundle_reads_back() {
        let scratch = ScratchDir::new().unwrap();
        let base = scratch.join("export");
        let line = CanonicalGeometry::line_string(vec![[-47.0, -15.0], [-47.1, -15.1], [-47.2, -15.0]]);
        let metrics = GeometryMetrics::new(0.0, 12.5, GeometryKind::LineString);

        write_bundle(&base, "Track", &line, &metrics).unwrap();

        let mut reader = ::shapefile::Reader::from_path(base.with_extension("shp")).unwrap();
        let features: Vec<_> = reader.iter_shapes_and_records().map(|r| r.unwrap()).collect();
        assert_eq!(features.len(), 1);

        let (shape, record) = &features[0];
        assert_eq!(shape_geometry(shape).unwrap(), line);
        assert_eq!(record.get("NAME"), Some(&FieldValue::Character(Some("Track".to_string()))));
        assert_eq!(record.get("COMP_KM"), Some(&FieldValue::Numeric(Some(12.5))));
        assert_eq!(fs::read_to_string(base.with_extension("prj")).unwrap(), WGS84_WKT);
    }
}
