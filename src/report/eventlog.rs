//! CN-015: Append-only JSONL run log.
//!
//! One line per pipeline event, written beside the charts. Appends are
//! best-effort at call sites; a failed append never affects the run.

use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::types::{PipelineEvent, TimestampedEvent};

/// ISO 8601 UTC timestamp, second precision.
pub fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// The run log lives with the charts it describes.
pub fn event_log_path(chart_dir: &Path) -> PathBuf {
    chart_dir.join("events.jsonl")
}

/// Append one timestamped event.
pub fn append_event(chart_dir: &Path, event: PipelineEvent) -> Result<(), String> {
    let path = event_log_path(chart_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("cannot create chart dir: {}", e))?;
    }

    let te = TimestampedEvent {
        ts: now_iso8601(),
        event,
    };
    let json = serde_json::to_string(&te).map_err(|e| format!("JSON serialize error: {}", e))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("cannot open event log {}: {}", path.display(), e))?;

    writeln!(file, "{}", json).map_err(|e| format!("write error: {}", e))?;

    Ok(())
}
