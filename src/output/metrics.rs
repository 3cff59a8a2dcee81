//! Writes the post-run metrics summary to `output/metrics.json`.

use crate::crawler::MetricsSummary;
use std::path::Path;

const DEFAULT_PATH: &str = "output/metrics.json";

pub fn write_metrics(summary: &MetricsSummary) -> crate::Result<()> {
    write_metrics_to(summary, DEFAULT_PATH)
}

pub fn write_metrics_to(summary: &MetricsSummary, path: impl AsRef<Path>) -> crate::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
