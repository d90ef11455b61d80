use anyhow::{Context, Result};
use landplot_core::config::LayeredConfig;
use landplot_core::models::OwnerToken;
use landplot_formats::ImportPipeline;
use landplot_store::MemoryGeometryStore;
use std::fs;

use crate::cli::ImportArgs;
use crate::output::OutputWriter;

const CLI_OWNER: &str = "cli";

pub fn execute(args: ImportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let store = MemoryGeometryStore::new();
    let summary = ImportPipeline::from(config).run(
        &store,
        &OwnerToken::new(CLI_OWNER),
        &filename,
        &bytes,
    )?;

    if !output.is_json() {
        output.success(format!("Imported {} geometries from {}", summary.count, filename));
    }
    for record in &summary.records {
        output.section(format!("#{} {}", record.id, record.name));
        output.kv("Kind", record.metrics.kind);
        output.kv("Area", format!("{:.4} ha", record.metrics.area_ha));
        output.kv("Length", format!("{:.4} km", record.metrics.length_km));
    }

    output.result(&summary)
}
