//! Debug bundle writer for inspecting a session's inputs and derived views.
//!
//! The TUI owns the terminal, so there is nowhere to print diagnostics while
//! it runs; pressing `d` instead drops a Markdown bundle under `debug/` with
//! everything needed to reproduce what is on screen, including the selection
//! state as machine-readable JSON.

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::ViewOutput;
use crate::domain::{Dataset, SelectionState};
use crate::error::AppError;
use crate::io::ingest::IngestReport;

pub fn write_debug_bundle(
    dataset: &Dataset,
    ingest: &IngestReport,
    selection: &SelectionState,
    view: &ViewOutput,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    fs::create_dir_all(&dir)
        .map_err(|e| AppError::runtime(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("rates_debug_{ts}.md"));

    let selection_json = serde_json::to_string_pretty(selection)
        .map_err(|e| AppError::runtime(format!("Failed to serialize selection state: {e}")))?;

    let mut out = String::new();
    out.push_str("# rates debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", dataset.source()));
    out.push_str(&format!(
        "- rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_skipped()
    ));
    let stats = dataset.stats();
    out.push_str(&format!(
        "- dataset: n={} years=[{}, {}] value=[{:.2}, {:.2}]\n",
        stats.n_records, stats.year_min, stats.year_max, stats.value_min, stats.value_max
    ));

    out.push_str("\n## Selection state\n");
    out.push_str("```json\n");
    out.push_str(&selection_json);
    out.push_str("\n```\n");

    out.push_str("\n## Filtered view\n");
    match &view.stats {
        Some(stats) => out.push_str(&format!(
            "n={} years=[{}, {}] value=[{:.2}, {:.2}]\n",
            stats.n_records, stats.year_min, stats.year_max, stats.value_min, stats.value_max
        )),
        None => out.push_str("no records match the current filters\n"),
    }

    out.push_str("\n## Statistics by risk level\n");
    out.push_str("| group | n | mean | median | std | min | max |\n");
    out.push_str("| - | - | - | - | - | - | - |\n");
    for s in &view.risk_stats {
        out.push_str(&format!(
            "| {} | {} | {:.3} | {:.3} | {} | {:.3} | {:.3} |\n",
            s.key,
            s.n,
            s.mean,
            s.median,
            fmt_opt(s.std_dev),
            s.min,
            s.max
        ));
    }

    out.push_str("\n## Statistics by rate type\n");
    out.push_str("| group | n | mean | median | std | min | max |\n");
    out.push_str("| - | - | - | - | - | - | - |\n");
    for s in &view.rate_stats {
        out.push_str(&format!(
            "| {} | {} | {:.3} | {:.3} | {} | {:.3} | {:.3} |\n",
            s.key,
            s.n,
            s.mean,
            s.median,
            fmt_opt(s.std_dev),
            s.min,
            s.max
        ));
    }

    out.push_str("\n## Records per year by risk level\n");
    out.push_str("| year | low | medium | high |\n");
    out.push_str("| - | - | - | - |\n");
    for (year, counts) in view.risk_mix.years.iter().zip(&view.risk_mix.counts) {
        out.push_str(&format!(
            "| {year} | {} | {} | {} |\n",
            counts[0], counts[1], counts[2]
        ));
    }

    out.push_str(&format!("\n## Rate comparison for {}\n", view.compare_year));
    out.push_str("| group | n | mean | median | std | min | max |\n");
    out.push_str("| - | - | - | - | - | - | - |\n");
    for s in &view.compare {
        out.push_str(&format!(
            "| {} | {} | {:.3} | {:.3} | {} | {:.3} | {:.3} |\n",
            s.key,
            s.n,
            s.mean,
            s.median,
            fmt_opt(s.std_dev),
            s.min,
            s.max
        ));
    }

    out.push_str(&format!("\n## Histogram ({})\n", view.hist_label));
    out.push_str("| lower | upper | count |\n");
    out.push_str("| - | - | - |\n");
    for bin in &view.histogram {
        out.push_str(&format!(
            "| {:.3} | {:.3} | {} |\n",
            bin.lower, bin.upper, bin.count
        ));
    }

    if !ingest.row_errors.is_empty() {
        out.push_str("\n## Row errors (first 20)\n");
        for err in ingest.row_errors.iter().take(20) {
            out.push_str(&format!("- line {}: {}\n", err.line, err.message));
        }
    }

    fs::write(&path, out)
        .map_err(|e| AppError::runtime(format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn fmt_opt(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else {
        "-".to_string()
    }
}
