//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - source records and their derived categories (`RateRecord`, `RiskLevel`,
//!   `SectorType`)
//! - the immutable dataset handle (`Dataset`) and summary stats
//! - session state (`SelectionState`, `Page`, `ChartTab`)
//! - per-run configuration (`ViewConfig`)

pub mod types;

pub use types::*;
