//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be:
//!
//! - used in-memory by the filter/aggregation pipeline
//! - embedded in debug bundles for reproducing a session
//! - displayed by both the CLI reports and the TUI

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lower bound (inclusive) for the histogram bin-count control.
pub const BIN_MIN: usize = 5;
/// Upper bound (inclusive) for the histogram bin-count control.
pub const BIN_MAX: usize = 50;
/// Default histogram bin count.
pub const DEFAULT_BINS: usize = 20;

/// Risk classification derived from a rate value.
///
/// Thresholds are fixed: `< 10` is Low, `10..20` is Medium, `>= 20` is High.
/// The three bands are mutually exclusive and cover every finite value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Classify a rate value (percent) into its risk band.
    pub fn classify(value: f64) -> RiskLevel {
        if value < 10.0 {
            RiskLevel::Low
        } else if value < 20.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Sector classification derived from a rate description.
///
/// Descriptions mentioning treasury instruments ("TREASURY" or "BILL",
/// case-insensitive) are Public; everything else is Private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorType {
    Public,
    Private,
}

impl SectorType {
    pub const ALL: [SectorType; 2] = [SectorType::Public, SectorType::Private];

    /// Classify a rate description into its sector.
    pub fn classify(description: &str) -> SectorType {
        let upper = description.to_ascii_uppercase();
        if upper.contains("TREASURY") || upper.contains("BILL") {
            SectorType::Public
        } else {
            SectorType::Private
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SectorType::Public => "Public",
            SectorType::Private => "Private",
        }
    }
}

/// One observation of the source dataset plus its derived categories.
///
/// Records are immutable after load; the derived fields are pure functions of
/// `value` / `description`, so re-deriving them always reproduces the same
/// classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub country: String,
    pub year: i32,
    pub description: String,
    pub value: f64,
    pub risk: RiskLevel,
    pub sector: SectorType,
}

impl RateRecord {
    /// Build a record, applying both derivations.
    pub fn new(country: String, year: i32, description: String, value: f64) -> Self {
        let risk = RiskLevel::classify(value);
        let sector = SectorType::classify(&description);
        Self {
            country,
            year,
            description,
            value,
            risk,
            sector,
        }
    }
}

/// Summary stats over a record set (the full dataset or a filtered view).
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_records: usize,
    pub year_min: i32,
    pub year_max: i32,
    pub value_min: f64,
    pub value_max: f64,
}

/// Fold a record slice into summary stats. `None` for an empty slice.
pub fn compute_stats(records: &[RateRecord]) -> Option<DatasetStats> {
    let mut year_min = i32::MAX;
    let mut year_max = i32::MIN;
    let mut value_min = f64::INFINITY;
    let mut value_max = f64::NEG_INFINITY;

    for r in records {
        year_min = year_min.min(r.year);
        year_max = year_max.max(r.year);
        value_min = value_min.min(r.value);
        value_max = value_max.max(r.value);
    }

    if records.is_empty() || !value_min.is_finite() || !value_max.is_finite() {
        return None;
    }

    Some(DatasetStats {
        n_records: records.len(),
        year_min,
        year_max,
        value_min,
        value_max,
    })
}

/// The immutable dataset handle.
///
/// Constructed once at startup and passed by reference to every component; no
/// downstream code can mutate records in place. Also caches the sorted
/// distinct description list and the summary stats, which every view needs.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    records: Vec<RateRecord>,
    descriptions: Vec<String>,
    stats: DatasetStats,
}

impl Dataset {
    /// Wrap a loaded record set. Fails (exit code 3) if no records survived
    /// ingest.
    pub fn new(source: String, records: Vec<RateRecord>) -> Result<Self, AppError> {
        let stats = compute_stats(&records).ok_or_else(|| {
            AppError::empty(format!("Dataset '{source}' contains no usable rows."))
        })?;

        let mut descriptions: Vec<String> = records.iter().map(|r| r.description.clone()).collect();
        descriptions.sort();
        descriptions.dedup();

        Ok(Self {
            source,
            records,
            descriptions,
            stats,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    /// Sorted distinct rate descriptions present in the dataset.
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn year_min(&self) -> i32 {
        self.stats.year_min
    }

    pub fn year_max(&self) -> i32 {
        self.stats.year_max
    }

    pub fn has_description(&self, description: &str) -> bool {
        self.descriptions
            .binary_search_by(|d| d.as_str().cmp(description))
            .is_ok()
    }
}

/// Current selection driving the filtered view.
///
/// This is an explicit value object owned by the session front-end (CLI run
/// or TUI); it is only ever mutated through its methods, and the filter and
/// aggregation engines read it by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionState {
    /// Explicit rate multi-select. Ignored while `all_rates` is on.
    pub rates: BTreeSet<String>,
    /// Select-all toggle. When on, every description in the dataset is
    /// included regardless of the explicit list.
    pub all_rates: bool,
    /// Risk-level multi-select. Empty means nothing passes, like `rates`.
    pub risk_levels: BTreeSet<RiskLevel>,
    /// Inclusive year bounds; `year_min <= year_max` always holds.
    pub year_min: i32,
    pub year_max: i32,
    /// Rate the value histogram focuses on; `None` uses all filtered rows.
    pub hist_rate: Option<String>,
    /// Histogram bin count, kept within `BIN_MIN..=BIN_MAX` by the callers.
    pub bins: usize,
    /// Focus year for the by-year rate comparison.
    pub compare_year: i32,
}

impl SelectionState {
    /// Fresh session state: everything selected over the full year span.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            rates: dataset.descriptions().iter().cloned().collect(),
            all_rates: false,
            risk_levels: RiskLevel::ALL.into_iter().collect(),
            year_min: dataset.year_min(),
            year_max: dataset.year_max(),
            hist_rate: None,
            bins: DEFAULT_BINS,
            compare_year: dataset.year_max(),
        }
    }

    /// Build the selection a CLI invocation asked for, validating against the
    /// loaded dataset.
    pub fn from_config(dataset: &Dataset, config: &ViewConfig) -> Result<Self, AppError> {
        if !(BIN_MIN..=BIN_MAX).contains(&config.bins) {
            return Err(AppError::input(format!(
                "Histogram bin count must be between {BIN_MIN} and {BIN_MAX} (got {}).",
                config.bins
            )));
        }

        for rate in &config.rates {
            ensure_known_rate(dataset, rate)?;
        }
        if let Some(rate) = &config.hist_rate {
            ensure_known_rate(dataset, rate)?;
        }

        let year_min = config
            .year_min
            .unwrap_or(dataset.year_min())
            .clamp(dataset.year_min(), dataset.year_max());
        let year_max = config
            .year_max
            .unwrap_or(dataset.year_max())
            .clamp(dataset.year_min(), dataset.year_max());
        if year_min > year_max {
            return Err(AppError::input(format!(
                "Year range is inverted ({year_min} > {year_max})."
            )));
        }

        // A run with no explicit --rate list means "show everything"; the
        // empty-selection state only arises interactively.
        let rates: BTreeSet<String> = if config.rates.is_empty() {
            dataset.descriptions().iter().cloned().collect()
        } else {
            config.rates.iter().cloned().collect()
        };
        let all_rates = config.all_rates;

        let risk_levels: BTreeSet<RiskLevel> = if config.risks.is_empty() {
            RiskLevel::ALL.into_iter().collect()
        } else {
            config.risks.iter().copied().collect()
        };

        let compare_year = config
            .compare_year
            .unwrap_or(dataset.year_max())
            .clamp(dataset.year_min(), dataset.year_max());

        Ok(Self {
            rates,
            all_rates,
            risk_levels,
            year_min,
            year_max,
            hist_rate: config.hist_rate.clone(),
            bins: config.bins,
            compare_year,
        })
    }

    /// Whether a description passes the rate selection. The select-all toggle
    /// fully overrides the explicit list.
    pub fn rate_selected(&self, description: &str) -> bool {
        self.all_rates || self.rates.contains(description)
    }

    pub fn risk_selected(&self, risk: RiskLevel) -> bool {
        self.risk_levels.contains(&risk)
    }

    /// True when the rate controls select nothing at all.
    pub fn no_rates_selected(&self) -> bool {
        !self.all_rates && self.rates.is_empty()
    }

    /// Update the year bounds. An inverted pair is rejected as a no-op (the
    /// previous valid range is retained) and `false` is returned.
    pub fn set_year_range(&mut self, year_min: i32, year_max: i32) -> bool {
        if year_min > year_max {
            return false;
        }
        self.year_min = year_min;
        self.year_max = year_max;
        true
    }

    pub fn toggle_rate(&mut self, description: &str) {
        if !self.rates.remove(description) {
            self.rates.insert(description.to_string());
        }
    }

    pub fn toggle_risk(&mut self, risk: RiskLevel) {
        if !self.risk_levels.remove(&risk) {
            self.risk_levels.insert(risk);
        }
    }
}

fn ensure_known_rate(dataset: &Dataset, rate: &str) -> Result<(), AppError> {
    if dataset.has_description(rate) {
        return Ok(());
    }
    Err(AppError::input(format!(
        "Unknown rate type '{rate}'. Available: {}.",
        dataset.descriptions().join(", ")
    )))
}

/// Top-level pages. Pure navigation: switching pages never touches the
/// selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Summary,
    About,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Summary, Page::About];

    pub fn next(self) -> Page {
        match self {
            Page::Dashboard => Page::Summary,
            Page::Summary => Page::About,
            Page::About => Page::Dashboard,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Summary => "Summary",
            Page::About => "About",
        }
    }
}

/// Chart tabs on the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTab {
    Trends,
    Heatmap,
    Compare,
    RiskMix,
    Distribution,
    Records,
}

impl ChartTab {
    pub const ALL: [ChartTab; 6] = [
        ChartTab::Trends,
        ChartTab::Heatmap,
        ChartTab::Compare,
        ChartTab::RiskMix,
        ChartTab::Distribution,
        ChartTab::Records,
    ];

    pub fn next(self) -> ChartTab {
        match self {
            ChartTab::Trends => ChartTab::Heatmap,
            ChartTab::Heatmap => ChartTab::Compare,
            ChartTab::Compare => ChartTab::RiskMix,
            ChartTab::RiskMix => ChartTab::Distribution,
            ChartTab::Distribution => ChartTab::Records,
            ChartTab::Records => ChartTab::Trends,
        }
    }

    pub fn prev(self) -> ChartTab {
        match self {
            ChartTab::Trends => ChartTab::Records,
            ChartTab::Heatmap => ChartTab::Trends,
            ChartTab::Compare => ChartTab::Heatmap,
            ChartTab::RiskMix => ChartTab::Compare,
            ChartTab::Distribution => ChartTab::RiskMix,
            ChartTab::Records => ChartTab::Distribution,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartTab::Trends => "Trends",
            ChartTab::Heatmap => "Heatmap",
            ChartTab::Compare => "By year",
            ChartTab::RiskMix => "Risk mix",
            ChartTab::Distribution => "Distribution",
            ChartTab::Records => "Records",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// CSV path; falls back to the `RATES_CSV` environment variable.
    pub csv_path: Option<PathBuf>,
    /// Use the built-in synthetic dataset instead of a CSV.
    pub sample: bool,
    pub sample_seed: u64,

    pub rates: Vec<String>,
    pub all_rates: bool,
    pub risks: Vec<RiskLevel>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,

    pub hist_rate: Option<String>,
    pub bins: usize,
    pub compare_year: Option<i32>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_classification_covers_the_boundaries() {
        assert_eq!(RiskLevel::classify(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(9.999), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(10.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(19.999), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(20.0), RiskLevel::High);
        assert_eq!(RiskLevel::classify(35.0), RiskLevel::High);
    }

    #[test]
    fn sector_match_is_case_insensitive() {
        assert_eq!(
            SectorType::classify("Treasury Bill Rate"),
            SectorType::Public
        );
        assert_eq!(SectorType::classify("91-DAY BILL"), SectorType::Public);
        assert_eq!(
            SectorType::classify("SAVINGS DEPOSIT RATE"),
            SectorType::Private
        );
    }

    fn dataset() -> Dataset {
        Dataset::new(
            "test".to_string(),
            vec![
                RateRecord::new("PH".to_string(), 2000, "T-BILL".to_string(), 5.0),
                RateRecord::new("PH".to_string(), 2005, "LENDING".to_string(), 15.0),
            ],
        )
        .unwrap()
    }

    fn config() -> ViewConfig {
        ViewConfig {
            csv_path: None,
            sample: false,
            sample_seed: 0,
            rates: Vec::new(),
            all_rates: false,
            risks: Vec::new(),
            year_min: None,
            year_max: None,
            hist_rate: None,
            bins: DEFAULT_BINS,
            compare_year: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        }
    }

    #[test]
    fn from_config_defaults_select_everything() {
        let dataset = dataset();
        let selection = SelectionState::from_config(&dataset, &config()).unwrap();

        assert_eq!(selection.rates.len(), dataset.descriptions().len());
        assert!(!selection.all_rates);
        assert_eq!(selection.risk_levels.len(), RiskLevel::ALL.len());
        assert_eq!(selection.year_min, 2000);
        assert_eq!(selection.year_max, 2005);
        assert_eq!(selection.compare_year, 2005);
    }

    #[test]
    fn from_config_rejects_inverted_year_range() {
        let mut cfg = config();
        cfg.year_min = Some(2004);
        cfg.year_max = Some(2001);
        let err = SelectionState::from_config(&dataset(), &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn from_config_rejects_unknown_rate() {
        let mut cfg = config();
        cfg.rates = vec!["OVERNIGHT REPO".to_string()];
        let err = SelectionState::from_config(&dataset(), &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("OVERNIGHT REPO"));
    }

    #[test]
    fn from_config_rejects_out_of_range_bins() {
        let mut cfg = config();
        cfg.bins = BIN_MAX + 1;
        let err = SelectionState::from_config(&dataset(), &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn from_config_clamps_compare_year_to_dataset_bounds() {
        let mut cfg = config();
        cfg.compare_year = Some(1980);
        let selection = SelectionState::from_config(&dataset(), &cfg).unwrap();
        assert_eq!(selection.compare_year, 2000);
    }
}
