//! CSV ingest and validation.
//!
//! This module turns the source CSV into the immutable `Dataset` handle.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic derivation** (risk/sector are pure functions of the row)
//! - **Separation of concerns**: no filtering or aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, RateRecord};
use crate::error::AppError;

/// Columns the source file must provide (header match is case-insensitive).
const REQUIRED_COLUMNS: [&str; 4] = ["country", "year", "description", "value"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// What happened during ingest, alongside the dataset itself.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

impl IngestReport {
    pub fn rows_skipped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_used)
    }
}

/// Load the dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> Result<(Dataset, IngestReport), AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_dataset(path.display().to_string(), file)
}

/// Load the dataset from any reader (lets tests feed CSV text directly).
pub fn read_dataset<R: Read>(source: String, input: R) -> Result<(Dataset, IngestReport), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(rate) => records.push(rate),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = records.len();
    let dataset = Dataset::new(source, records)?;

    Ok((
        dataset,
        IngestReport {
            rows_read,
            rows_used,
            row_errors,
        },
    ))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Country"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::input(format!(
                "Missing required column: `{column}`"
            )));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RateRecord, String> {
    let country = get_required(record, header_map, "country")?.to_string();

    let year_raw = get_required(record, header_map, "year")?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|_| format!("Invalid `year` '{year_raw}' (expected an integer)."))?;

    let description = get_required(record, header_map, "description")?.to_string();

    let value_raw = get_required(record, header_map, "value")?;
    let value = value_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid `value` '{value_raw}' (expected a finite number)."))?;

    Ok(RateRecord::new(country, year, description, value))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskLevel, SectorType};
    use std::io::Cursor;

    fn load(csv_text: &str) -> Result<(Dataset, IngestReport), AppError> {
        read_dataset("test".to_string(), Cursor::new(csv_text.to_string()))
    }

    #[test]
    fn loads_rows_and_derives_categories() {
        let (dataset, report) = load(
            "Country,Year,Description,Value\n\
             PH,2000,TREASURY BILL RATE,5.0\n\
             PH,2000,LENDING RATE,25.0\n\
             PH,2001,SAVINGS DEPOSIT RATE,15.0\n",
        )
        .unwrap();

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_used, 3);
        assert!(report.row_errors.is_empty());

        let records = dataset.records();
        assert_eq!(records[0].risk, RiskLevel::Low);
        assert_eq!(records[0].sector, SectorType::Public);
        assert_eq!(records[1].risk, RiskLevel::High);
        assert_eq!(records[1].sector, SectorType::Private);
        assert_eq!(records[2].risk, RiskLevel::Medium);

        assert_eq!(dataset.year_min(), 2000);
        assert_eq!(dataset.year_max(), 2001);
        assert_eq!(dataset.descriptions().len(), 3);
    }

    #[test]
    fn missing_column_fails_fast() {
        let err = load("Country,Year,Description\nPH,2000,X\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`value`"));
    }

    #[test]
    fn bad_rows_are_skipped_with_line_numbers() {
        let (dataset, report) = load(
            "Country,Year,Description,Value\n\
             PH,2000,TREASURY BILL RATE,5.0\n\
             PH,not-a-year,TREASURY BILL RATE,6.0\n\
             PH,2002,TREASURY BILL RATE,oops\n\
             PH,2003,TREASURY BILL RATE,7.0\n",
        )
        .unwrap();

        assert_eq!(dataset.records().len(), 2);
        assert_eq!(report.rows_skipped(), 2);
        assert_eq!(report.row_errors[0].line, 3);
        assert!(report.row_errors[0].message.contains("`year`"));
        assert_eq!(report.row_errors[1].line, 4);
        assert!(report.row_errors[1].message.contains("`value`"));
    }

    #[test]
    fn bom_prefixed_header_is_tolerated() {
        let (dataset, _) =
            load("\u{feff}Country,Year,Description,Value\nPH,2000,TREASURY BILL RATE,5.0\n")
                .unwrap();
        assert_eq!(dataset.records().len(), 1);
    }

    #[test]
    fn no_usable_rows_is_exit_code_three() {
        let err = load("Country,Year,Description,Value\nPH,bad,X,bad\n").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn derivation_is_idempotent() {
        let (dataset, _) =
            load("Country,Year,Description,Value\nPH,2000,TREASURY BILL RATE,12.5\n").unwrap();
        let r = &dataset.records()[0];
        assert_eq!(RiskLevel::classify(r.value), r.risk);
        assert_eq!(SectorType::classify(&r.description), r.sector);
    }
}
