//! Formatted terminal output for the CLI report commands.
//!
//! We keep formatting code in one place so:
//! - the filter/aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::agg::{CategoryCount, GroupStats, HistogramBin, RiskCountTable};
use crate::domain::{Dataset, RateRecord, RiskLevel, SelectionState};
use crate::io::ingest::IngestReport;
use crate::app::pipeline::ViewOutput;

/// Format the run header: source, ingest counts, selection, filtered stats.
pub fn format_view_summary(
    dataset: &Dataset,
    ingest: &IngestReport,
    selection: &SelectionState,
    view: &ViewOutput,
) -> String {
    let mut out = String::new();

    out.push_str("=== rates - Historical Interest Rates Explorer ===\n");
    out.push_str(&format!("Source: {}\n", dataset.source()));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_skipped()
    ));
    out.push_str(&format!(
        "Dataset: n={} | years=[{}, {}] | value=[{:.2}, {:.2}]%\n",
        dataset.stats().n_records,
        dataset.year_min(),
        dataset.year_max(),
        dataset.stats().value_min,
        dataset.stats().value_max
    ));

    out.push_str(&format!(
        "Selection: rates={} | risk={} | years=[{}, {}]\n",
        describe_rates(selection, dataset),
        describe_risks(selection),
        selection.year_min,
        selection.year_max
    ));

    match &view.stats {
        Some(stats) => out.push_str(&format!(
            "Filtered: n={} | years=[{}, {}] | value=[{:.2}, {:.2}]%\n",
            stats.n_records, stats.year_min, stats.year_max, stats.value_min, stats.value_max
        )),
        None => out.push_str("Filtered: no records match the current filters.\n"),
    }

    out
}

fn describe_rates(selection: &SelectionState, dataset: &Dataset) -> String {
    if selection.all_rates || selection.rates.len() == dataset.descriptions().len() {
        "all".to_string()
    } else {
        format!("{} of {}", selection.rates.len(), dataset.descriptions().len())
    }
}

fn describe_risks(selection: &SelectionState) -> String {
    if selection.risk_levels.len() == RiskLevel::ALL.len() {
        return "all".to_string();
    }
    if selection.risk_levels.is_empty() {
        return "none".to_string();
    }
    let names: Vec<&str> = selection
        .risk_levels
        .iter()
        .map(|r| r.display_name())
        .collect();
    names.join("+")
}

/// Format the filtered record table. Callers pass display-sorted records.
pub fn format_records_table(records: &[RateRecord]) -> String {
    if records.is_empty() {
        return "No records match the current filters.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:<32} {:>8} {:<8} {:<8} {:<16}\n",
        "year", "description", "value", "risk", "sector", "country"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<32} {:-<8} {:-<8} {:-<8} {:-<16}\n",
        "", "", "", "", "", ""
    ));

    for r in records {
        out.push_str(&format!(
            "{:>6} {:<32} {:>8.2} {:<8} {:<8} {:<16}\n",
            r.year,
            truncate(&r.description, 32),
            r.value,
            r.risk.display_name(),
            r.sector.display_name(),
            truncate(&r.country, 16),
        ));
    }

    out
}

/// Format one group-statistics table.
pub fn format_group_stats(title: &str, stats: &[GroupStats]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));

    if stats.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<32} {:>5} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "group", "n", "mean", "median", "std", "min", "max"
    ));
    out.push_str(&format!(
        "{:-<32} {:-<5} {:-<8} {:-<8} {:-<8} {:-<8} {:-<8}\n",
        "", "", "", "", "", "", ""
    ));

    for s in stats {
        out.push_str(&format!(
            "{:<32} {:>5} {:>8.2} {:>8.2} {:>8} {:>8.2} {:>8.2}\n",
            truncate(&s.key, 32),
            s.n,
            s.mean,
            s.median,
            fmt_stat(s.std_dev),
            s.min,
            s.max,
        ));
    }

    out
}

/// Format a frequency table with shares.
pub fn format_value_counts(title: &str, counts: &[CategoryCount]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));

    if counts.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    for c in counts {
        out.push_str(&format!(
            "  {:<16} {:>6}  {:>5.1}%\n",
            truncate(&c.key, 16),
            c.count,
            c.share * 100.0
        ));
    }

    out
}

/// Format the yearly risk-mix counts.
pub fn format_risk_mix(table: &RiskCountTable) -> String {
    let mut out = String::new();
    out.push_str("Records per year by risk level:\n");

    if table.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    out.push_str(&format!(
        "{:>6} {:>6} {:>8} {:>6} {:>6}\n",
        "year", "low", "medium", "high", "total"
    ));
    for (year, counts) in table.years.iter().zip(&table.counts) {
        out.push_str(&format!(
            "{:>6} {:>6} {:>8} {:>6} {:>6}\n",
            year,
            counts[0],
            counts[1],
            counts[2],
            counts.iter().sum::<usize>()
        ));
    }

    out
}

/// Format the value histogram as a table.
pub fn format_histogram(label: &str, bins: &[HistogramBin]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Value distribution ({label}):\n"));

    if bins.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    for bin in bins {
        out.push_str(&format!(
            "  [{:>7.2}, {:>7.2})  {:>6}\n",
            bin.lower, bin.upper, bin.count
        ));
    }

    out
}

/// Undefined statistics (NaN std-dev of a singleton group) print as `-`.
fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        format!("{:>8}", "-")
    } else {
        format!("{v:>8.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::{group_stats, Field};
    use crate::report::sort_for_display;

    fn record(year: i32, description: &str, value: f64) -> RateRecord {
        RateRecord::new("PH".to_string(), year, description.to_string(), value)
    }

    #[test]
    fn singleton_std_dev_renders_as_dash() {
        let records = vec![record(2001, "T-BILL", 15.0)];
        let stats = group_stats(&records, Field::Year);
        let txt = format_group_stats("By year", &stats);
        assert!(txt.contains("2001"));
        assert!(txt.contains(" - "));
        assert!(!txt.to_lowercase().contains("nan"));
    }

    #[test]
    fn records_table_is_sorted_and_labeled() {
        let records = sort_for_display(&[
            record(2001, "T-BILL", 15.0),
            record(2000, "LENDING", 25.0),
        ]);
        let txt = format_records_table(&records);

        let lending_pos = txt.find("LENDING").unwrap();
        let tbill_pos = txt.find("T-BILL").unwrap();
        assert!(lending_pos < tbill_pos);
        assert!(txt.contains("High"));
        assert!(txt.contains("Medium"));
        assert!(txt.contains("Private"));
        assert!(txt.contains("Public"));
    }

    #[test]
    fn empty_table_renders_no_data_notice() {
        let txt = format_records_table(&[]);
        assert!(txt.contains("No records match"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = "A VERY LONG DESCRIPTION THAT GOES PAST THE COLUMN WIDTH";
        let records = vec![record(2000, long, 5.0)];
        let txt = format_records_table(&records);
        assert!(!txt.contains(long));
        assert!(txt.contains("A VERY LONG"));
    }
}
