//! Per-vertex coordinate table export
//!
//! One row per vertex of the record's geometry with geographic, DMS and UTM
//! coordinates. The table is `;`-separated with CRLF line endings and starts
//! with a UTF-8 byte-order mark so spreadsheet tools pick up the encoding.

use ::csv::{Terminator, WriterBuilder};
use landplot_core::error::{LandplotError, Result};
use landplot_core::models::{CanonicalGeometry, GeometryRecord};
use landplot_geo::dms::{decimal_to_dms, Axis};
use landplot_geo::projection::utm_point;

use crate::export::{ExportOutcome, ExportedFile};

pub const MEDIA_TYPE: &str = "text/csv";

const HEADER: [&str; 8] =
    ["Point", "Latitude", "Longitude", "Lat DMS", "Lon DMS", "Metric-X", "Metric-Y", "Zone"];

const BYTE_ORDER_MARK: &[u8] = "\u{feff}".as_bytes();

/// One row of the coordinate table
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRow {
    /// 1-based vertex index
    pub index: usize,
    pub lat: f64,
    pub lon: f64,
    pub lat_dms: String,
    pub lon_dms: String,
    pub easting: f64,
    pub northing: f64,
    pub zone: String,
}

impl VertexRow {
    fn fields(&self, decimal_separator: char) -> [String; 8] {
        let number = |value: f64, decimals: usize| {
            localize(&format!("{:.*}", decimals, value), decimal_separator)
        };
        [
            self.index.to_string(),
            number(self.lat, 8),
            number(self.lon, 8),
            self.lat_dms.clone(),
            self.lon_dms.clone(),
            number(self.easting, 3),
            number(self.northing, 3),
            self.zone.clone(),
        ]
    }
}

fn localize(formatted: &str, decimal_separator: char) -> String {
    if decimal_separator == '.' {
        formatted.to_string()
    } else {
        formatted.replace('.', &decimal_separator.to_string())
    }
}

/// Vertices listed in the table: the point itself, the path, or the outer ring
pub fn table_vertices(geometry: &CanonicalGeometry) -> &[[f64; 2]] {
    geometry.vertices()
}

/// Build the table rows, projecting every vertex into its own UTM zone
pub fn vertex_rows(geometry: &CanonicalGeometry) -> Result<Vec<VertexRow>> {
    table_vertices(geometry)
        .iter()
        .enumerate()
        .map(|(i, &[lon, lat])| {
            let utm = utm_point(lon, lat)?;
            Ok(VertexRow {
                index: i + 1,
                lat,
                lon,
                lat_dms: decimal_to_dms(lat, Axis::Latitude).to_string(),
                lon_dms: decimal_to_dms(lon, Axis::Longitude).to_string(),
                easting: utm.easting,
                northing: utm.northing,
                zone: utm.zone_label(),
            })
        })
        .collect()
}

/// Render rows as table bytes
pub fn write_table(rows: &[VertexRow], decimal_separator: char) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::CRLF)
        .from_writer(BYTE_ORDER_MARK.to_vec());

    writer.write_record(HEADER).map_err(|e| LandplotError::format("CSV", e))?;
    for row in rows {
        writer
            .write_record(row.fields(decimal_separator))
            .map_err(|e| LandplotError::format("CSV", e))?;
    }

    writer.into_inner().map_err(|e| LandplotError::format("CSV", e))
}

/// Export a record as a coordinate table
pub fn export_csv(record: &GeometryRecord, decimal_separator: char) -> Result<ExportOutcome> {
    let geometry = match record.geometry() {
        Ok(geometry) => geometry,
        Err(LandplotError::UnsupportedGeometry { geometry_type }) => {
            return Ok(ExportOutcome::Unsupported { geometry_type })
        }
        Err(e) => return Err(e),
    };

    let rows = vertex_rows(&geometry)?;
    let bytes = write_table(&rows, decimal_separator)?;

    Ok(ExportOutcome::Exported(ExportedFile {
        file_name: format!("{}_points.csv", record.name),
        media_type: MEDIA_TYPE,
        bytes,
    }))
}
