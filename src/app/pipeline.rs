//! Shared view pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> filter -> aggregate views
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Every interaction re-runs `build_view` in full; there is no incremental
//! update, so the views can never drift out of sync with each other.

use std::path::PathBuf;

use crate::agg::{
    self, Agg, CategoryCount, Field, GroupStats, HistogramBin, PivotTable, RiskCountTable,
};
use crate::data::generate_sample;
use crate::domain::{compute_stats, Dataset, DatasetStats, RateRecord, SelectionState, ViewConfig};
use crate::error::AppError;
use crate::filter;
use crate::io::ingest::{load_dataset, IngestReport};

/// All derived views for one selection, computed in a single pass.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub filtered: Vec<RateRecord>,
    /// Stats over the filtered subset; `None` when the subset is empty.
    pub stats: Option<DatasetStats>,

    pub rate_stats: Vec<GroupStats>,
    pub risk_stats: Vec<GroupStats>,
    pub year_stats: Vec<GroupStats>,

    /// Mean value per (year, rate type); feeds the trend chart and heatmap.
    pub trend: PivotTable,
    pub risk_mix: RiskCountTable,
    pub risk_counts: Vec<CategoryCount>,
    pub sector_counts: Vec<CategoryCount>,

    pub histogram: Vec<HistogramBin>,
    /// Which rows the histogram covers (a single rate or all selected).
    pub hist_label: String,

    /// Per-rate statistics for the comparison focus year.
    pub compare: Vec<GroupStats>,
    pub compare_year: i32,
}

/// Resolve the dataset source and load it.
pub fn load(config: &ViewConfig) -> Result<(Dataset, IngestReport), AppError> {
    if config.sample {
        let dataset = generate_sample(config.sample_seed)?;
        let n = dataset.records().len();
        return Ok((
            dataset,
            IngestReport {
                rows_read: n,
                rows_used: n,
                row_errors: Vec::new(),
            },
        ));
    }

    let path = config
        .csv_path
        .clone()
        .or_else(|| std::env::var("RATES_CSV").ok().map(PathBuf::from));
    let Some(path) = path else {
        return Err(AppError::input(
            "No dataset source: pass --csv <PATH>, set RATES_CSV, or use --sample.",
        ));
    };

    load_dataset(&path)
}

/// Run the filter engine and derive every view the front-ends render.
pub fn build_view(dataset: &Dataset, selection: &SelectionState) -> ViewOutput {
    let filtered = filter::apply(dataset.records(), selection);
    let stats = compute_stats(&filtered);

    let (hist_records, hist_label): (Vec<RateRecord>, String) = match &selection.hist_rate {
        Some(rate) => (
            filtered
                .iter()
                .filter(|r| &r.description == rate)
                .cloned()
                .collect(),
            rate.clone(),
        ),
        None => (filtered.clone(), "all selected rates".to_string()),
    };

    ViewOutput {
        rate_stats: agg::group_stats(&filtered, Field::Description),
        risk_stats: agg::group_stats(&filtered, Field::Risk),
        year_stats: agg::group_stats(&filtered, Field::Year),
        trend: agg::pivot(&filtered, Field::Year, Field::Description, Agg::Mean),
        risk_mix: agg::yearly_risk_counts(&filtered),
        risk_counts: agg::value_counts(&filtered, Field::Risk),
        sector_counts: agg::value_counts(&filtered, Field::Sector),
        histogram: agg::histogram_bins(&hist_records, selection.bins),
        hist_label,
        compare: agg::year_comparison(&filtered, selection.compare_year),
        compare_year: selection.compare_year,
        stats,
        filtered,
    }
}
