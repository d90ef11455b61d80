//! Reading GeoJSON input files

use anyhow::{Context, Result};
use landplot_core::canonical::{split_features, CanonicalFeature};
use std::fs;
use std::path::Path;

/// Read every feature of a GeoJSON file
pub fn read_features(path: &Path) -> Result<Vec<CanonicalFeature>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let features =
        split_features(&text).with_context(|| format!("{} is not valid GeoJSON", path.display()))?;

    if features.is_empty() {
        anyhow::bail!("{} contains no features", path.display());
    }
    Ok(features)
}

/// Record name for the feature at `index` (0-based) out of `count`
///
/// An explicit name gets a 1-based suffix when several features share it.
pub fn record_name(
    explicit: Option<&str>,
    feature: &CanonicalFeature,
    index: usize,
    count: usize,
) -> Option<String> {
    match explicit {
        Some(name) if count > 1 => Some(format!("{}_{}", name, index + 1)),
        Some(name) => Some(name.to_string()),
        None => feature.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_feature_collection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","properties":{{"name":"A"}},"geometry":{{"type":"Point","coordinates":[1,2]}}}},
                {{"type":"Feature","properties":null,"geometry":{{"type":"Point","coordinates":[3,4]}}}}
            ]}}"#
        )
        .unwrap();

        let features = read_features(file.path()).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name.as_deref(), Some("A"));
        assert_eq!(features[1].name, None);
    }

    #[test]
    fn test_empty_collection_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type":"FeatureCollection","features":[]}}"#).unwrap();
        assert!(read_features(file.path()).is_err());
    }

    #[test]
    fn test_record_name() {
        let feature = CanonicalFeature { name: Some("From file".to_string()), text: String::new() };
        assert_eq!(record_name(None, &feature, 0, 1).as_deref(), Some("From file"));
        assert_eq!(record_name(Some("Plot"), &feature, 0, 1).as_deref(), Some("Plot"));
        assert_eq!(record_name(Some("Plot"), &feature, 1, 3).as_deref(), Some("Plot_2"));
    }
}
