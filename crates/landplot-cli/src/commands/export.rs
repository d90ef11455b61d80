use anyhow::{Context, Result};
use landplot_core::config::LayeredConfig;
use landplot_formats::{export_record, ExportFormat, ExportOptions};
use landplot_geo::metrics::measured_record;
use serde::Serialize;
use std::fs;

use crate::cli::ExportArgs;
use crate::input::{read_features, record_name};
use crate::output::OutputWriter;

#[derive(Debug, Serialize)]
struct WrittenFile {
    name: String,
    path: String,
    media_type: &'static str,
    size: usize,
}

pub fn execute(args: ExportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let features = read_features(&args.file)?;
    let format = ExportFormat::from(args.format);
    let options = ExportOptions::from(config);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let mut written = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let record = measured_record(
            record_name(args.name.as_deref(), feature, i, features.len()),
            Some(config.default_color.value.clone()),
            feature.text.clone(),
        );

        let file = export_record(&record, format, &options)?
            .into_file()
            .with_context(|| format!("Cannot export '{}' as {}", record.name, format))?;

        let path = args.output.join(&file.file_name);
        fs::write(&path, &file.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if !output.is_json() {
            output.success(format!("Wrote {} ({} bytes)", path.display(), file.bytes.len()));
        }
        written.push(WrittenFile {
            name: record.name,
            path: path.display().to_string(),
            media_type: file.media_type,
            size: file.bytes.len(),
        });
    }

    output.result(&written)
}
