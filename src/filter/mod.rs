//! Row filtering over the immutable dataset.
//!
//! The engine is a pure predicate composition: same records + same selection
//! always produce the same subset. An empty result is a normal outcome (the
//! user deselected everything), never an error; callers render a "no data"
//! notice instead. Output keeps the input order; sorting for tabular display
//! is a presentation concern handled by the report layer.

use crate::domain::{RateRecord, SelectionState};

/// Whether a single record passes the current selection.
///
/// A record passes iff:
/// - its description is selected (the select-all toggle fully overrides the
///   explicit list)
/// - its risk level is selected
/// - its year falls inside the inclusive `[year_min, year_max]` range
pub fn matches(record: &RateRecord, selection: &SelectionState) -> bool {
    selection.rate_selected(&record.description)
        && selection.risk_selected(record.risk)
        && record.year >= selection.year_min
        && record.year <= selection.year_max
}

/// Produce the filtered subset for the current selection.
pub fn apply(records: &[RateRecord], selection: &SelectionState) -> Vec<RateRecord> {
    records
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, RiskLevel};

    fn record(year: i32, description: &str, value: f64) -> RateRecord {
        RateRecord::new("PH".to_string(), year, description.to_string(), value)
    }

    fn dataset() -> Dataset {
        Dataset::new(
            "test".to_string(),
            vec![
                record(2000, "T-BILL", 5.0),
                record(2000, "T-BILL", 25.0),
                record(2001, "T-BILL", 15.0),
                record(2001, "LENDING", 9.0),
                record(2002, "LENDING", 21.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn full_selection_is_identity() {
        let dataset = dataset();
        let selection = SelectionState::initial(&dataset);
        let filtered = apply(dataset.records(), &selection);
        assert_eq!(filtered.as_slice(), dataset.records());
    }

    #[test]
    fn empty_rate_selection_yields_empty_result() {
        let dataset = dataset();
        let mut selection = SelectionState::initial(&dataset);
        selection.rates.clear();
        assert!(selection.no_rates_selected());
        assert!(apply(dataset.records(), &selection).is_empty());
    }

    #[test]
    fn select_all_toggle_overrides_explicit_list() {
        let dataset = dataset();

        let mut with_list = SelectionState::initial(&dataset);
        with_list.rates.clear();
        with_list.rates.insert("T-BILL".to_string());
        with_list.all_rates = true;

        let mut without_list = SelectionState::initial(&dataset);
        without_list.rates.clear();
        without_list.all_rates = true;

        let a = apply(dataset.records(), &with_list);
        let b = apply(dataset.records(), &without_list);
        assert_eq!(a, b);
        assert_eq!(a.len(), dataset.records().len());
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let dataset = dataset();
        let mut selection = SelectionState::initial(&dataset);
        assert!(selection.set_year_range(2001, 2001));

        let filtered = apply(dataset.records(), &selection);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.year == 2001));
    }

    #[test]
    fn inverted_year_range_is_rejected_as_noop() {
        let dataset = dataset();
        let mut selection = SelectionState::initial(&dataset);
        assert!(!selection.set_year_range(2005, 2001));
        assert_eq!(selection.year_min, 2000);
        assert_eq!(selection.year_max, 2002);
    }

    #[test]
    fn risk_selection_filters_bands() {
        let dataset = dataset();
        let mut selection = SelectionState::initial(&dataset);
        selection.risk_levels.clear();
        selection.risk_levels.insert(RiskLevel::High);

        let filtered = apply(dataset.records(), &selection);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.risk == RiskLevel::High));
    }

    #[test]
    fn worked_example_single_record() {
        // records: (2000, T-BILL, 5.0) Low, (2000, T-BILL, 25.0) High,
        //          (2001, T-BILL, 15.0) Medium
        let dataset = Dataset::new(
            "test".to_string(),
            vec![
                record(2000, "T-BILL", 5.0),
                record(2000, "T-BILL", 25.0),
                record(2001, "T-BILL", 15.0),
            ],
        )
        .unwrap();

        let risks: Vec<RiskLevel> = dataset.records().iter().map(|r| r.risk).collect();
        assert_eq!(risks, [RiskLevel::Low, RiskLevel::High, RiskLevel::Medium]);

        let mut selection = SelectionState::initial(&dataset);
        assert!(selection.set_year_range(2001, 2001));
        let filtered = apply(dataset.records(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].year, 2001);
        assert_eq!(filtered[0].risk, RiskLevel::Medium);
        assert!((filtered[0].value - 15.0).abs() < 1e-12);
    }
}
