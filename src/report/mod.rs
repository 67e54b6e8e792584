//! CN-011: Output artifacts — directory layout, preview CSV, README.
//!
//! The preview CSV and README are byte-deterministic for identical inputs;
//! chart images may differ only in encoding metadata.

pub mod eventlog;

use std::path::{Path, PathBuf};

use crate::core::aggregate::NamedCount;
use crate::core::types::RunSummary;

/// Chart directory under the output root.
pub fn chart_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("charts")
}

/// User-analytics chart directory.
pub fn user_chart_dir(out_dir: &Path) -> PathBuf {
    chart_dir(out_dir).join("users")
}

/// Create the full output tree. This is the pipeline's one fatal setup
/// step — without a writable tree no artifact is recoverable.
pub fn ensure_output_tree(out_dir: &Path) -> Result<(), String> {
    let user_dir = user_chart_dir(out_dir);
    std::fs::create_dir_all(&user_dir)
        .map_err(|e| format!("cannot create output tree {}: {}", user_dir.display(), e))
}

/// Write the top-ingredients preview: `ingredient,count` header plus the
/// same truncated rows the bar chart shows.
pub fn write_preview_csv(path: &Path, rows: &[NamedCount]) -> Result<(), String> {
    let mut text = String::from("ingredient,count\n");
    for row in rows {
        text.push_str(&format!("{},{}\n", csv_field(&row.name), row.count));
    }
    std::fs::write(path, text).map_err(|e| format!("cannot write {}: {}", path.display(), e))
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the plain-text README enumerating what this run produced.
pub fn write_readme(path: &Path, summary: &RunSummary) -> Result<(), String> {
    let mut lines = Vec::new();

    if summary.synthetic {
        lines.push("NOTE: Missing CSVs — synthetic fallback data used for demo charts.".to_string());
    } else {
        lines.push("Charts generated from ETL CSV files in output/.".to_string());
    }

    lines.push(String::new());
    lines.push("Charts produced:".to_string());
    for chart in &summary.charts {
        lines.push(format!("- {}", chart.name));
    }

    if !summary.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Not produced:".to_string());
        for skip in &summary.skipped {
            lines.push(format!("- {} ({})", skip.chart, skip.reason));
        }
    }

    if !summary.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed:".to_string());
        for failure in &summary.failures {
            lines.push(format!("- {} ({})", failure.chart, failure.error));
        }
    }

    lines.push(String::new());
    std::fs::write(path, lines.join("\n"))
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))
}
