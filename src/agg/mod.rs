//! Aggregation views over a filtered record set.
//!
//! Every function here is pure and side-effect free: it takes the
//! already-filtered records, never the selection, so the same subset always
//! yields the same tables no matter which view asks. Empty input produces an
//! empty/neutral result, not an error; the "no data" rendering is the
//! caller's job.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{RateRecord, RiskLevel, SectorType};

/// Grouping keys the generic aggregations understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Country,
    Year,
    Description,
    Risk,
    Sector,
}

impl Field {
    /// Extract the grouping key for one record.
    pub fn key_of(self, record: &RateRecord) -> String {
        match self {
            Field::Country => record.country.clone(),
            Field::Year => record.year.to_string(),
            Field::Description => record.description.clone(),
            Field::Risk => record.risk.display_name().to_string(),
            Field::Sector => record.sector.display_name().to_string(),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Field::Country => "Country",
            Field::Year => "Year",
            Field::Description => "Rate type",
            Field::Risk => "Risk level",
            Field::Sector => "Sector",
        }
    }

    /// Natural ordering for this field's keys: years numerically, the derived
    /// categories in their band order, everything else lexically.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Field::Year => match (a.parse::<i64>(), b.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.cmp(b),
            },
            Field::Risk => risk_rank(a).cmp(&risk_rank(b)).then_with(|| a.cmp(b)),
            Field::Sector => sector_rank(a).cmp(&sector_rank(b)).then_with(|| a.cmp(b)),
            Field::Country | Field::Description => a.cmp(b),
        }
    }
}

fn risk_rank(key: &str) -> usize {
    RiskLevel::ALL
        .iter()
        .position(|r| r.display_name() == key)
        .unwrap_or(usize::MAX)
}

fn sector_rank(key: &str) -> usize {
    SectorType::ALL
        .iter()
        .position(|s| s.display_name() == key)
        .unwrap_or(usize::MAX)
}

/// Cell reducer for pivots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agg {
    Mean,
    Sum,
    Count,
    Min,
    Max,
}

impl Agg {
    /// Reduce a non-empty value list to one cell value.
    fn reduce(self, values: &[f64]) -> f64 {
        match self {
            Agg::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Agg::Sum => values.iter().sum(),
            Agg::Count => values.len() as f64,
            Agg::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Agg::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// One line-chart series derived from a pivot column.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub label: String,
    /// (x, value) points; rows with no observations are skipped, not plotted
    /// as zero.
    pub points: Vec<(f64, f64)>,
}

/// A rectangular two-dimensional aggregation.
///
/// Every observed row key has a cell for every observed column key. Cells
/// with no observations hold 0.0 with a count of 0; the count matrix lets
/// presentation distinguish "no data" from a genuine zero so one computation
/// serves the heatmap and the trend chart without inconsistencies.
#[derive(Debug, Clone)]
pub struct PivotTable {
    pub row_field: Field,
    pub col_field: Field,
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    pub cells: Vec<Vec<f64>>,
    pub counts: Vec<Vec<usize>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() || self.col_keys.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    pub fn count(&self, row: usize, col: usize) -> usize {
        self.counts[row][col]
    }

    /// Min/max over populated cells only. `None` when nothing is populated.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (row, counts) in self.cells.iter().zip(&self.counts) {
            for (&v, &n) in row.iter().zip(counts) {
                if n > 0 {
                    lo = lo.min(v);
                    hi = hi.max(v);
                }
            }
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// One sparse series per column, with the row key parsed as the x value.
    /// Rows whose key is not numeric are skipped (only used with numeric row
    /// fields, i.e. Year).
    pub fn series_by_col(&self) -> Vec<TrendSeries> {
        self.col_keys
            .iter()
            .enumerate()
            .map(|(j, label)| {
                let mut points = Vec::new();
                for (i, key) in self.row_keys.iter().enumerate() {
                    let Ok(x) = key.parse::<f64>() else { continue };
                    if self.counts[i][j] > 0 {
                        points.push((x, self.cells[i][j]));
                    }
                }
                TrendSeries {
                    label: label.clone(),
                    points,
                }
            })
            .collect()
    }
}

/// Group by (row, col) and reduce the value field into a rectangular table.
pub fn pivot(records: &[RateRecord], row_field: Field, col_field: Field, agg: Agg) -> PivotTable {
    let mut groups: HashMap<(String, String), Vec<f64>> = HashMap::new();
    for r in records {
        groups
            .entry((row_field.key_of(r), col_field.key_of(r)))
            .or_default()
            .push(r.value);
    }

    let mut row_keys: Vec<String> = groups.keys().map(|(r, _)| r.clone()).collect();
    row_keys.sort_by(|a, b| row_field.compare(a, b));
    row_keys.dedup();

    let mut col_keys: Vec<String> = groups.keys().map(|(_, c)| c.clone()).collect();
    col_keys.sort_by(|a, b| col_field.compare(a, b));
    col_keys.dedup();

    let mut cells = Vec::with_capacity(row_keys.len());
    let mut counts = Vec::with_capacity(row_keys.len());
    for rk in &row_keys {
        let mut cell_row = Vec::with_capacity(col_keys.len());
        let mut count_row = Vec::with_capacity(col_keys.len());
        for ck in &col_keys {
            match groups.get(&(rk.clone(), ck.clone())) {
                Some(values) => {
                    cell_row.push(agg.reduce(values));
                    count_row.push(values.len());
                }
                None => {
                    cell_row.push(0.0);
                    count_row.push(0);
                }
            }
        }
        cells.push(cell_row);
        counts.push(count_row);
    }

    PivotTable {
        row_field,
        col_field,
        row_keys,
        col_keys,
        cells,
        counts,
    }
}

/// Descriptive statistics for one group.
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub key: String,
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n-1 denominator); NaN for a single record,
    /// because a spread of one observation is undefined, not zero.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-group descriptive statistics over the value field, sorted by key.
pub fn group_stats(records: &[RateRecord], key_field: Field) -> Vec<GroupStats> {
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for r in records {
        groups.entry(key_field.key_of(r)).or_default().push(r.value);
    }

    let mut keys: Vec<String> = groups.keys().cloned().collect();
    keys.sort_by(|a, b| key_field.compare(a, b));

    keys.into_iter()
        .map(|key| {
            let mut values = groups.remove(&key).unwrap_or_default();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            let n = values.len();
            let mean = values.iter().sum::<f64>() / n as f64;
            GroupStats {
                n,
                mean,
                median: median_of_sorted(&values),
                std_dev: sample_std(&values, mean),
                min: values[0],
                max: values[n - 1],
                key,
            }
        })
        .collect()
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// One category's frequency in a value-count table.
#[derive(Debug, Clone)]
pub struct CategoryCount {
    pub key: String,
    pub count: usize,
    /// Fraction of the total record count, for proportion views.
    pub share: f64,
}

/// Frequency table over a categorical field, sorted by key.
pub fn value_counts(records: &[RateRecord], key_field: Field) -> Vec<CategoryCount> {
    let mut groups: HashMap<String, usize> = HashMap::new();
    for r in records {
        *groups.entry(key_field.key_of(r)).or_default() += 1;
    }

    let total = records.len();
    let mut keys: Vec<String> = groups.keys().cloned().collect();
    keys.sort_by(|a, b| key_field.compare(a, b));

    keys.into_iter()
        .map(|key| {
            let count = groups[&key];
            CategoryCount {
                share: count as f64 / total as f64,
                count,
                key,
            }
        })
        .collect()
}

/// Record counts per (year, risk level), dense over the observed years.
///
/// Columns follow `RiskLevel::ALL` order; years with no records of some band
/// carry an explicit zero, which stacked/area time series need.
#[derive(Debug, Clone)]
pub struct RiskCountTable {
    pub years: Vec<i32>,
    pub counts: Vec<[usize; 3]>,
}

impl RiskCountTable {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Largest per-year total, for chart scaling.
    pub fn max_total(&self) -> usize {
        self.counts
            .iter()
            .map(|c| c.iter().sum::<usize>())
            .max()
            .unwrap_or(0)
    }
}

pub fn yearly_risk_counts(records: &[RateRecord]) -> RiskCountTable {
    let mut by_year: BTreeMap<i32, [usize; 3]> = BTreeMap::new();
    for r in records {
        let slot = match r.risk {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        };
        by_year.entry(r.year).or_default()[slot] += 1;
    }

    let mut years = Vec::with_capacity(by_year.len());
    let mut counts = Vec::with_capacity(by_year.len());
    for (year, row) in by_year {
        years.push(year);
        counts.push(row);
    }
    RiskCountTable { years, counts }
}

/// Per-rate statistics for one focus year, for the side-by-side comparison
/// bar chart. Empty when the year has no records in the input.
pub fn year_comparison(records: &[RateRecord], year: i32) -> Vec<GroupStats> {
    let subset: Vec<RateRecord> = records
        .iter()
        .filter(|r| r.year == year)
        .cloned()
        .collect();
    group_stats(&subset, Field::Description)
}

/// One equal-width histogram bin.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning the observed value range.
///
/// The top edge is inclusive in the last bin, so the bin counts always sum to
/// the record count. The bin count itself is caller-validated (the CLI/TUI
/// keep it within the control's range); the engine only guards against zero.
/// When every value is identical the span is widened to 1.0 so the bins stay
/// well-formed; all records then land in the first bin.
pub fn histogram_bins(records: &[RateRecord], bin_count: usize) -> Vec<HistogramBin> {
    if records.is_empty() {
        return Vec::new();
    }
    let bin_count = bin_count.max(1);

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for r in records {
        lo = lo.min(r.value);
        hi = hi.max(r.value);
    }

    let span = if hi > lo { hi - lo } else { 1.0 };
    let width = span / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for r in records {
        let idx = (((r.value - lo) / width) as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, description: &str, value: f64) -> RateRecord {
        RateRecord::new("PH".to_string(), year, description.to_string(), value)
    }

    fn worked_example() -> Vec<RateRecord> {
        vec![
            record(2000, "T-BILL", 5.0),
            record(2000, "T-BILL", 25.0),
            record(2001, "T-BILL", 15.0),
        ]
    }

    #[test]
    fn pivot_is_rectangular_and_zero_filled() {
        // LENDING has no 2001 observation; the cell must still exist.
        let records = vec![
            record(2000, "T-BILL", 5.0),
            record(2001, "T-BILL", 15.0),
            record(2000, "LENDING", 10.0),
        ];

        let table = pivot(&records, Field::Year, Field::Description, Agg::Mean);
        assert_eq!(table.row_keys, ["2000", "2001"]);
        assert_eq!(table.col_keys, ["LENDING", "T-BILL"]);
        assert_eq!(table.cells.len(), 2);
        assert!(table.cells.iter().all(|row| row.len() == 2));

        assert_eq!(table.count(1, 0), 0);
        assert_eq!(table.get(1, 0), 0.0);
        assert!((table.get(0, 1) - 5.0).abs() < 1e-12);
        assert!((table.get(1, 1) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn pivot_mean_reduces_duplicate_cells() {
        let table = pivot(&worked_example(), Field::Year, Field::Description, Agg::Mean);
        assert!((table.get(0, 0) - 15.0).abs() < 1e-12);
        assert_eq!(table.count(0, 0), 2);
    }

    #[test]
    fn pivot_supports_other_reducers() {
        let table = pivot(&worked_example(), Field::Year, Field::Description, Agg::Count);
        assert!((table.get(0, 0) - 2.0).abs() < 1e-12);
        assert!((table.get(1, 0) - 1.0).abs() < 1e-12);

        let table = pivot(&worked_example(), Field::Year, Field::Description, Agg::Max);
        assert!((table.get(0, 0) - 25.0).abs() < 1e-12);

        let table = pivot(&worked_example(), Field::Year, Field::Description, Agg::Sum);
        assert!((table.get(0, 0) - 30.0).abs() < 1e-12);

        let table = pivot(&worked_example(), Field::Year, Field::Description, Agg::Min);
        assert!((table.get(0, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn trend_series_skip_unpopulated_cells() {
        let records = vec![
            record(2000, "T-BILL", 5.0),
            record(2002, "T-BILL", 15.0),
            record(2001, "LENDING", 10.0),
        ];
        let table = pivot(&records, Field::Year, Field::Description, Agg::Mean);
        let series = table.series_by_col();

        let tbill = series.iter().find(|s| s.label == "T-BILL").unwrap();
        assert_eq!(tbill.points, [(2000.0, 5.0), (2002.0, 15.0)]);

        let lending = series.iter().find(|s| s.label == "LENDING").unwrap();
        assert_eq!(lending.points, [(2001.0, 10.0)]);
    }

    #[test]
    fn group_stats_worked_example() {
        let stats = group_stats(&worked_example(), Field::Year);
        assert_eq!(stats.len(), 2);

        let y2000 = &stats[0];
        assert_eq!(y2000.key, "2000");
        assert_eq!(y2000.n, 2);
        assert!((y2000.mean - 15.0).abs() < 1e-12);
        assert!((y2000.min - 5.0).abs() < 1e-12);
        assert!((y2000.max - 25.0).abs() < 1e-12);
        assert!((y2000.std_dev - 14.142135623730951).abs() < 1e-9);
    }

    #[test]
    fn group_stats_singleton_has_nan_std_dev() {
        let stats = group_stats(&worked_example(), Field::Year);
        let y2001 = &stats[1];
        assert_eq!(y2001.n, 1);
        assert!((y2001.mean - 15.0).abs() < 1e-12);
        assert!((y2001.median - 15.0).abs() < 1e-12);
        assert!(y2001.std_dev.is_nan());
    }

    #[test]
    fn median_handles_even_sized_groups() {
        let records = vec![
            record(2000, "X", 1.0),
            record(2000, "X", 2.0),
            record(2000, "X", 3.0),
            record(2000, "X", 10.0),
        ];
        let stats = group_stats(&records, Field::Description);
        assert!((stats[0].median - 2.5).abs() < 1e-12);
    }

    #[test]
    fn risk_keys_sort_in_band_order() {
        let records = vec![
            record(2000, "X", 25.0), // High
            record(2000, "X", 5.0),  // Low
            record(2000, "X", 15.0), // Medium
        ];
        let stats = group_stats(&records, Field::Risk);
        let keys: Vec<&str> = stats.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["Low", "Medium", "High"]);
    }

    #[test]
    fn value_counts_shares_sum_to_one() {
        let counts = value_counts(&worked_example(), Field::Risk);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 3);
        let share_total: f64 = counts.iter().map(|c| c.share).sum();
        assert!((share_total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn yearly_risk_counts_are_dense() {
        let table = yearly_risk_counts(&worked_example());
        assert_eq!(table.years, [2000, 2001]);
        // 2000: one Low, one High; 2001: one Medium.
        assert_eq!(table.counts[0], [1, 0, 1]);
        assert_eq!(table.counts[1], [0, 1, 0]);
        assert_eq!(table.max_total(), 2);
    }

    #[test]
    fn histogram_partitions_the_range() {
        let records: Vec<RateRecord> = (0..=100)
            .map(|i| record(2000, "X", i as f64))
            .collect();
        let bins = histogram_bins(&records, 10);

        assert_eq!(bins.len(), 10);
        for (i, bin) in bins.iter().enumerate() {
            assert!((bin.upper - bin.lower - 10.0).abs() < 1e-9);
            if i > 0 {
                assert!((bin.lower - bins[i - 1].upper).abs() < 1e-9);
            }
        }
        assert!((bins[0].lower - 0.0).abs() < 1e-9);
        assert!((bins[9].upper - 100.0).abs() < 1e-9);
        // The maximum lands in the last bin, so every record is counted.
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), records.len());
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn histogram_degenerate_span_stays_well_formed() {
        let records = vec![record(2000, "X", 7.0), record(2001, "X", 7.0)];
        let bins = histogram_bins(&records, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn year_comparison_covers_only_the_focus_year() {
        let records = vec![
            record(2000, "T-BILL", 5.0),
            record(2000, "LENDING", 11.0),
            record(2001, "T-BILL", 15.0),
        ];

        let compare = year_comparison(&records, 2000);
        let keys: Vec<&str> = compare.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["LENDING", "T-BILL"]);
        assert!((compare[1].mean - 5.0).abs() < 1e-12);

        assert!(year_comparison(&records, 1999).is_empty());
    }

    #[test]
    fn empty_input_yields_neutral_results() {
        let none: Vec<RateRecord> = Vec::new();
        assert!(pivot(&none, Field::Year, Field::Description, Agg::Mean).is_empty());
        assert!(group_stats(&none, Field::Year).is_empty());
        assert!(value_counts(&none, Field::Risk).is_empty());
        assert!(yearly_risk_counts(&none).is_empty());
        assert!(year_comparison(&none, 2000).is_empty());
        assert!(histogram_bins(&none, 10).is_empty());
    }
}
