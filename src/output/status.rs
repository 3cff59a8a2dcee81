//! Writes the `dump-status` snapshot: `output/status.json` and a static,
//! self-refreshing `output/dashboard.html`.

use crate::kv::{Frontier, Visited};
use crate::storage::Storage;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

const DEFAULT_JSON_PATH: &str = "output/status.json";
const DEFAULT_HTML_PATH: &str = "output/dashboard.html";

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub frontier: u64,
    pub visited: u64,
    pub pages: u64,
    pub ts: String,
}

pub async fn load_status(frontier: &Frontier, visited: &Visited, storage: &dyn Storage) -> crate::Result<StatusSnapshot> {
    Ok(StatusSnapshot {
        frontier: frontier.size().await?,
        visited: visited.count().await?,
        pages: storage.count_pages().await?,
        ts: Utc::now().to_rfc3339(),
    })
}

pub fn write_status(snapshot: &StatusSnapshot) -> crate::Result<()> {
    write_status_to(snapshot, DEFAULT_JSON_PATH, DEFAULT_HTML_PATH)
}

pub fn write_status_to(snapshot: &StatusSnapshot, json_path: impl AsRef<Path>, html_path: impl AsRef<Path>) -> crate::Result<()> {
    let json_path = json_path.as_ref();
    let html_path = html_path.as_ref();
    if let Some(parent) = json_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = html_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(json_path, json)?;
    std::fs::write(html_path, render_dashboard(snapshot))?;
    Ok(())
}

fn render_dashboard(snapshot: &StatusSnapshot) -> String {
    format!(
        r#"<html><head><meta charset="utf-8"><title>Crawler Dashboard</title>
<meta http-equiv="refresh" content="15">
<style>body{{font-family:Arial;margin:1.5rem;}}table{{border-collapse:collapse}}td,th{{padding:4px 8px;border:1px solid #ddd}}</style></head><body>
<h1>Crawler Dashboard Snapshot</h1>
<table><tr><th>Frontier</th><th>Visited</th><th>Pages Stored</th><th>Timestamp (UTC)</th></tr>
<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></table>
<p>Refresh after running <code>dump-status</code> again for updated numbers.</p>
</body></html>"#,
        snapshot.frontier, snapshot.visited, snapshot.pages, snapshot.ts
    )
}
