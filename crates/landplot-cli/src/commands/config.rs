use anyhow::Result;
use landplot_core::config::LayeredConfig;
use serde::Serialize;

use crate::output::OutputWriter;

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
    source: String,
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source: format!("{:?}", source) })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    output.section("Configuration");
    for entry in &entries {
        output.kv(&entry.key, format!("{} ({})", entry.value, entry.source));
    }

    output.result(&entries)
}
