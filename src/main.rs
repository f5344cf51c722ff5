//! filecensus - Concurrent per-directory file counts and sizes.
//!
//! Usage:
//!   fcount [PATH]                  Count every file, one row per directory
//!   fcount [PATH] -t video -d      Videos only, largest counts first
//!   fcount [PATH] -g               Collapse rows into parent directories
//!   fcount [PATH] -o               Single summary row for the whole tree
//!   fcount [PATH] -v[=ANCHOR]      Only files below directories named ANCHOR
//!   fcount --help                  Show help

mod progress;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use strum::IntoEnumIterator;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use filecensus_scan::{
    CensusScanner, DEFAULT_SCOPE_ANCHOR, FileCategory, GroupingMode, ScanConfig, ScanResult,
    SortColumn, SortDirection,
};

use crate::progress::BarProgress;
use crate::render::{render_json, render_table};

#[derive(Parser)]
#[command(
    name = "filecensus",
    version,
    about = "Count files and their sizes per directory",
    long_about = "filecensus walks a directory tree in parallel and reports, per \
                  directory, how many matching files it holds and how much space \
                  they take."
)]
struct Cli {
    /// Root directory to process (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    #[arg(
        short = 't',
        long,
        default_value = "any",
        value_parser = FileCategory::from_str,
        help = category_help()
    )]
    file_type: FileCategory,

    /// Only count files whose path contains this text (case-insensitive)
    #[arg(short = 'n', long, conflicts_with = "only_video_root")]
    filter_name: Option<String>,

    /// Report a single row for the whole tree
    #[arg(short = 'o', long, conflicts_with_all = ["group_parent", "only_video_root"])]
    only_root: bool,

    /// Group files under the parent of their directory
    #[arg(short = 'g', long)]
    group_parent: bool,

    /// Only count files below directories with this name (`-v=NAME`)
    #[arg(
        short = 'v',
        long,
        value_name = "ANCHOR",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_SCOPE_ANCHOR
    )]
    only_video_root: Option<String>,

    /// Column to sort by (name, count, size)
    #[arg(short = 's', long, default_value = "count", value_parser = SortColumn::from_str)]
    sort_column: SortColumn,

    /// Sort in descending order
    #[arg(short = 'd', long)]
    sort_descending: bool,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Clear the terminal before printing results
    #[arg(long)]
    clear: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn category_help() -> String {
    let choices: Vec<String> = FileCategory::iter().map(|c| c.to_string()).collect();
    format!("File type to count ({})", choices.join(", "))
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    debug!(?config, "parsed configuration");

    let progress = match cli.format {
        OutputFormat::Text => BarProgress::new(),
        OutputFormat::Json => BarProgress::hidden(),
    };
    let scanned = CensusScanner::new().scan_with_progress(&config, &progress);
    progress.finish();
    let result = scanned.with_context(|| format!("Scan of {} failed", config.root.display()))?;

    if cli.clear {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
            .context("Failed to clear terminal")?;
    }

    match cli.format {
        OutputFormat::Text => print_text(&result)?,
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json(&result))?);
        }
    }

    Ok(report_outcome(&result))
}

/// Warn about a partial scan and pick the exit status.
fn report_outcome(result: &ScanResult) -> ExitCode {
    if !result.is_partial() {
        return ExitCode::SUCCESS;
    }
    if let Some(err) = &result.error {
        eprintln!("warning: {err}");
    }
    ExitCode::FAILURE
}

/// Install the stderr subscriber; `RUST_LOG` overrides the default level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Translate command-line flags into a validated scan configuration.
fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let grouping = if cli.only_root {
        GroupingMode::RootSummary
    } else if cli.group_parent {
        GroupingMode::ParentCollapsed
    } else {
        GroupingMode::PerDirectory
    };

    let mut builder = ScanConfig::builder();
    builder
        .root(cli.path.clone())
        .category(cli.file_type)
        .grouping(grouping)
        .sort_column(cli.sort_column)
        .sort_direction(SortDirection::from_descending(cli.sort_descending))
        .threads(cli.threads)
        .include_hidden(!cli.no_hidden);

    if let Some(name) = cli.filter_name.as_deref() {
        builder.name_filter(name);
    }
    if let Some(anchor) = cli.only_video_root.as_deref() {
        builder.scope_anchor(anchor);
    }

    builder.build().context("Invalid options")
}

fn print_text(result: &ScanResult) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    write!(stdout, "{}", render_table(result))?;
    writeln!(
        stdout,
        " Scanned {} in {:.2}s",
        result.root_path.display(),
        result.scan_duration.as_secs_f64()
    )?;
    stdout.flush()?;
    Ok(())
}
