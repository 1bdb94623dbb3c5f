//! Command-line parsing for the interest-rates explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the filtering/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{RiskLevel, DEFAULT_BINS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rates",
    version,
    about = "Historical interest-rates exploration dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the filtered record table, per-rate statistics, and a trend chart.
    Show(ViewArgs),
    /// Print the summary statistics tables only (useful for scripting).
    Stats(ViewArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same underlying filter/aggregation pipeline as
    /// `rates show`, but renders results in a terminal UI using Ratatui.
    Tui(ViewArgs),
}

/// Common options for all views.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Path to the rates CSV (defaults to $RATES_CSV, which may come from .env).
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Use the built-in synthetic sample dataset instead of a CSV.
    #[arg(long)]
    pub sample: bool,

    /// Seed for the synthetic sample dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Rate description to include (repeat for multiple; default: all).
    #[arg(short = 'r', long = "rate", value_name = "DESCRIPTION")]
    pub rates: Vec<String>,

    /// Include every rate type, overriding any explicit --rate list.
    #[arg(long)]
    pub all_rates: bool,

    /// Risk level to include (repeat for multiple; default: all).
    #[arg(long = "risk", value_enum)]
    pub risks: Vec<RiskLevel>,

    /// Lower year bound, inclusive (default: dataset minimum).
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Upper year bound, inclusive (default: dataset maximum).
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Rate the value histogram focuses on (default: all filtered rows).
    #[arg(long, value_name = "DESCRIPTION")]
    pub hist_rate: Option<String>,

    /// Histogram bin count (5-50).
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Focus year for the by-year rate comparison (default: dataset maximum).
    #[arg(long, value_name = "YEAR")]
    pub compare_year: Option<i32>,

    /// Render the ASCII trend chart (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the trend chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
