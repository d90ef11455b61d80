use anyhow::Result;
use landplot_core::models::{GeometryKind, DEFAULT_NAME};
use landplot_geo::metrics::metrics_for_feature;
use serde::Serialize;

use crate::cli::MetricsArgs;
use crate::input::read_features;
use crate::output::OutputWriter;

#[derive(Debug, Serialize)]
struct FeatureMetrics {
    name: String,
    kind: GeometryKind,
    area_ha: f64,
    length_km: f64,
}

pub fn execute(args: MetricsArgs, output: &OutputWriter) -> Result<()> {
    let features = read_features(&args.file)?;

    let rows: Vec<FeatureMetrics> = features
        .iter()
        .map(|feature| {
            let metrics = metrics_for_feature(&feature.text);
            FeatureMetrics {
                name: feature.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
                kind: metrics.kind,
                area_ha: metrics.area_ha,
                length_km: metrics.length_km,
            }
        })
        .collect();

    if output.is_json() {
        return output.result(&rows);
    }

    for (i, row) in rows.iter().enumerate() {
        output.section(format!("{}. {}", i + 1, row.name));
        output.kv("Kind", row.kind);
        output.kv("Area", format!("{:.4} ha", row.area_ha));
        output.kv("Length", format!("{:.4} km", row.length_km));
    }

    let unknown = rows.iter().filter(|r| r.kind == GeometryKind::Unknown).count();
    if unknown > 0 {
        output.warning(format!(
            "{} feature(s) could not be measured and are reported as Unknown",
            unknown
        ));
    }
    Ok(())
}
