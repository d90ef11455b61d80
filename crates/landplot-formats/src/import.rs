//! Import pipeline: uploaded file → measured geometries → one stored batch

use geojson::JsonObject;
use landplot_core::canonical;
use landplot_core::config::LayeredConfig;
use landplot_core::error::{LandplotError, Result};
use landplot_core::models::{
    CanonicalGeometry, GeometryMetrics, GeometryRecord, OwnerToken, RecordId, IMPORT_COLOR,
};
use landplot_core::ports::GeometryStore;
use serde::Serialize;
use std::path::Path;

/// A geometry read from an uploaded file, already measured
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedGeometry {
    pub name: String,
    pub geometry: CanonicalGeometry,
    pub metrics: GeometryMetrics,
}

impl ImportedGeometry {
    /// Canonical Feature text with empty properties
    pub fn to_feature_json(&self) -> Result<String> {
        canonical::encode_feature(&self.geometry, JsonObject::new())
    }

    /// Turn the geometry into an unsaved record with the given color
    pub fn into_record(self, color: &str) -> Result<GeometryRecord> {
        let feature = self.to_feature_json()?;
        Ok(GeometryRecord::new(self.name, color, feature, self.metrics))
    }
}

/// One stored record produced by an import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRecord {
    pub id: RecordId,
    pub name: String,
    pub metrics: GeometryMetrics,
}

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub count: usize,
    pub records: Vec<ImportedRecord>,
}

impl ImportSummary {
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }
}

/// Whether an uploaded file is a zipped shapefile bundle
pub fn is_archive(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Reads uploaded files and stores what they contain
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    import_color: String,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new(IMPORT_COLOR)
    }
}

impl From<&LayeredConfig> for ImportPipeline {
    fn from(config: &LayeredConfig) -> Self {
        Self::new(config.import_color.value.clone())
    }
}

impl ImportPipeline {
    pub fn new(import_color: impl Into<String>) -> Self {
        Self { import_color: import_color.into() }
    }

    pub fn import_color(&self) -> &str {
        &self.import_color
    }

    /// Read every usable geometry from an uploaded file
    ///
    /// `.zip` uploads are read as shapefile bundles, anything else as KML.
    pub fn read(&self, filename: &str, bytes: &[u8]) -> Vec<ImportedGeometry> {
        if is_archive(filename) {
            crate::shapefile::import_shapefile(bytes)
        } else {
            crate::kml::import_kml(bytes)
        }
    }

    /// Read an uploaded file and store its geometries as one batch
    ///
    /// Nothing is stored when the file holds no usable geometry.
    pub fn run<S>(
        &self,
        store: &S,
        owner: &OwnerToken,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportSummary>
    where
        S: GeometryStore + ?Sized,
    {
        let imported = self.read(filename, bytes);
        if imported.is_empty() {
            return Err(LandplotError::NothingToImport { filename: filename.to_string() });
        }

        let records = imported
            .into_iter()
            .map(|geometry| geometry.into_record(&self.import_color))
            .collect::<Result<Vec<_>>>()?;
        let summaries: Vec<(String, GeometryMetrics)> =
            records.iter().map(|r| (r.name.clone(), r.metrics)).collect();

        let ids = store.create_many(owner, records)?;

        let records: Vec<ImportedRecord> = ids
            .into_iter()
            .zip(summaries)
            .map(|(id, (name, metrics))| ImportedRecord { id, name, metrics })
            .collect();

        tracing::info!(
            filename = %filename,
            owner = %owner.as_str(),
            count = records.len(),
            "Imported geometries"
        );

        Ok(ImportSummary { count: records.len(), records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landplot_core::models::GeometryKind;

    #[test]
    fn test_is_archive() {
        assert!(is_archive("plots.zip"));
        assert!(is_archive("PLOTS.ZIP"));
        assert!(!is_archive("plots.kml"));
        assert!(!is_archive("zip"));
        assert!(!is_archive("plots.zip.kml"));
    }

    #[test]
    fn test_into_record_uses_color_and_feature() {
        let imported = ImportedGeometry {
            name: "Spring".to_string(),
            geometry: CanonicalGeometry::point(-47.0, -15.0),
            metrics: GeometryMetrics::new(0.0, 0.0, GeometryKind::Point),
        };
        let record = imported.into_record(IMPORT_COLOR).unwrap();

        assert_eq!(record.name, "Spring");
        assert_eq!(record.color, "#3388ff");
        assert!(record.id.is_none());

        let value: serde_json::Value = serde_json::from_str(&record.feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["properties"], serde_json::json!({}));
        assert_eq!(value["geometry"]["coordinates"], serde_json::json!([-47.0, -15.0]));
    }

    #[test]
    fn test_pipeline_color_from_config() {
        let mut config = LayeredConfig::default();
        config.import_color.value = "#112233".to_string();
        assert_eq!(ImportPipeline::from(&config).import_color(), "#112233");
        assert_eq!(ImportPipeline::default().import_color(), IMPORT_COLOR);
    }
}
