//! Landplot Formats - Exchange formats for land-plot geometries
//!
//! Exporters turn one stored record into a downloadable file (CSV vertex
//! table, KML placemark, zipped shapefile bundle). Importers read KML
//! documents and zipped shapefiles back into measured geometries, and the
//! import pipeline hands them to a `GeometryStore` in one batch.

pub mod csv;
pub mod export;
pub mod import;
pub mod kml;
pub mod scratch;
pub mod shapefile;
pub mod xml;

pub use export::{export_record, ExportFormat, ExportOptions, ExportOutcome, ExportedFile};
pub use import::{ImportPipeline, ImportSummary, ImportedGeometry};
