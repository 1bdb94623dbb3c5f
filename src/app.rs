//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset (CSV or built-in sample)
//! - builds the selection state and runs the view pipeline
//! - prints reports/plots or hands off to the TUI

use clap::Parser;

use crate::cli::{Command, ViewArgs};
use crate::domain::{SelectionState, ViewConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `rates` binary.
pub fn run() -> Result<(), AppError> {
    // A `.env` file may provide RATES_CSV; absence is fine.
    let _ = dotenvy::dotenv();

    // We want bare `rates` (and `rates --sample`) to behave like `rates tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_view(args, OutputMode::Full),
        Command::Stats(args) => handle_view(args, OutputMode::StatsOnly),
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    StatsOnly,
}

fn handle_view(args: ViewArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = view_config_from_args(&args);
    let (dataset, ingest) = pipeline::load(&config)?;
    let selection = SelectionState::from_config(&dataset, &config)?;
    let view = pipeline::build_view(&dataset, &selection);

    println!(
        "{}",
        crate::report::format_view_summary(&dataset, &ingest, &selection, &view)
    );

    match mode {
        OutputMode::Full => {
            let sorted = crate::report::sort_for_display(&view.filtered);
            println!("{}", crate::report::format_records_table(&sorted));
            println!(
                "{}",
                crate::report::format_group_stats("Statistics by rate type", &view.rate_stats)
            );

            if config.plot && !view.filtered.is_empty() {
                let series = view.trend.series_by_col();
                println!(
                    "{}",
                    crate::plot::render_trend_plot(&series, config.plot_width, config.plot_height)
                );
            }
        }
        OutputMode::StatsOnly => {
            println!(
                "{}",
                crate::report::format_group_stats("Statistics by rate type", &view.rate_stats)
            );
            println!(
                "{}",
                crate::report::format_group_stats("Statistics by risk level", &view.risk_stats)
            );
            println!(
                "{}",
                crate::report::format_group_stats("Statistics by year", &view.year_stats)
            );
            println!(
                "{}",
                crate::report::format_value_counts("Risk level counts", &view.risk_counts)
            );
            println!(
                "{}",
                crate::report::format_value_counts("Sector counts", &view.sector_counts)
            );
            println!("{}", crate::report::format_risk_mix(&view.risk_mix));
            println!(
                "{}",
                crate::report::format_group_stats(
                    &format!("Rate comparison for {}", view.compare_year),
                    &view.compare
                )
            );
            println!(
                "{}",
                crate::report::format_histogram(&view.hist_label, &view.histogram)
            );
        }
    }

    Ok(())
}

pub fn view_config_from_args(args: &ViewArgs) -> ViewConfig {
    ViewConfig {
        csv_path: args.csv.clone(),
        sample: args.sample,
        sample_seed: args.seed,
        rates: args.rates.clone(),
        all_rates: args.all_rates,
        risks: args.risks.clone(),
        year_min: args.year_min,
        year_max: args.year_max,
        hist_rate: args.hist_rate.clone(),
        bins: args.bins,
        compare_year: args.compare_year,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

/// Rewrite argv so `rates` defaults to `rates tui`.
///
/// Rules:
/// - `rates`                      -> `rates tui`
/// - `rates --sample ...`         -> `rates tui --sample ...`
/// - `rates --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "stats" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
