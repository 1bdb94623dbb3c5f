//! Reporting utilities: display ordering and formatted terminal output.

use crate::domain::RateRecord;

pub mod format;

pub use format::*;

/// Order records for tabular display: Year, then Description.
///
/// Sorting lives here rather than in the filter engine because it is purely a
/// presentation concern; the filtered subset itself carries no order
/// guarantee.
pub fn sort_for_display(records: &[RateRecord]) -> Vec<RateRecord> {
    let mut out = records.to_vec();
    out.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.description.cmp(&b.description))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, description: &str, value: f64) -> RateRecord {
        RateRecord::new("PH".to_string(), year, description.to_string(), value)
    }

    #[test]
    fn sorts_by_year_then_description() {
        let records = vec![
            record(2001, "B", 1.0),
            record(2000, "B", 2.0),
            record(2000, "A", 3.0),
        ];
        let sorted = sort_for_display(&records);
        let keys: Vec<(i32, &str)> = sorted
            .iter()
            .map(|r| (r.year, r.description.as_str()))
            .collect();
        assert_eq!(keys, [(2000, "A"), (2000, "B"), (2001, "B")]);
    }
}
