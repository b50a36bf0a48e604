use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use bomdash::analyzer::Snapshot;
use bomdash::config::DashConfig;
use bomdash::error::DashError;
use bomdash::export::{self, ExportFormat};
use bomdash::filter::FilterSelection;
use bomdash::ingest::{self, LoadedTable};
use bomdash::logging::{init_logging, LoggingConfig};
use bomdash::report;

#[derive(Parser)]
#[command(name = "bomdash")]
#[command(about = "Component test & availability dashboard for BOM exports")]
struct Cli {
    /// Input file (.csv or .xlsx)
    input: PathBuf,

    /// Print a plain-text report instead of launching the dashboard
    #[arg(short, long)]
    report: bool,

    /// Export the filtered table to this path and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Restrict to one Section
    #[arg(long)]
    section: Option<String>,

    /// Restrict to one Category (uppercased heading label)
    #[arg(long)]
    category: Option<String>,

    /// Restrict to rows available ("A") in this test-stage column
    #[arg(long)]
    stage: Option<String>,

    /// Config file (TOML); otherwise defaults + BOMDASH_* env overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DashError>() {
                Some(dash) => eprintln!("{}", dash.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let interactive = !cli.report && cli.export.is_none();

    // In TUI mode logs go to a file; console output would corrupt the screen
    let _guard = init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        file_only: interactive,
        ..Default::default()
    })?;

    let config = match &cli.config {
        Some(path) => DashConfig::load_from_file(path)?,
        None => DashConfig::load_from_env(),
    };

    let table = ingest::load_table(&cli.input, &config)?;
    let selection = build_selection(&cli, &table)?;

    if let Some(output) = &cli.export {
        let snapshot = Snapshot::compute(&table, &selection, &config);
        export::export_rows(&snapshot.rows, &snapshot.stage_names, output, cli.format)?;
        println!(
            "Exported {} rows to {}",
            snapshot.rows.len(),
            output.display()
        );
        return Ok(());
    }

    if cli.report {
        let snapshot = Snapshot::compute(&table, &selection, &config);
        print!("{}", report::render(&snapshot, &selection, &config));
        return Ok(());
    }

    run_tui(table, config, &cli)
}

#[cfg(feature = "tui")]
fn run_tui(table: LoadedTable, config: DashConfig, cli: &Cli) -> Result<()> {
    let source_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.input.display().to_string());
    bomdash::tui::run_dashboard(table, config, source_name)
}

#[cfg(not(feature = "tui"))]
fn run_tui(_table: LoadedTable, _config: DashConfig, _cli: &Cli) -> Result<()> {
    anyhow::bail!("built without the 'tui' feature; use --report or --export")
}

/// Resolve CLI filter flags against the loaded table. The stage flag matches
/// a test-stage column by exact name or by name prefix.
fn build_selection(cli: &Cli, table: &LoadedTable) -> Result<FilterSelection> {
    let stage_column = match &cli.stage {
        None => None,
        Some(name) => {
            let position = table
                .columns
                .stage_columns
                .iter()
                .position(|c| c.name == *name || c.name.starts_with(name.as_str()));
            match position {
                Some(i) => {
                    info!("Stage filter resolved to column '{}'", table.columns.stage_columns[i].name);
                    Some(i)
                }
                None => {
                    return Err(DashError::UnknownStageColumn { name: name.clone() }.into());
                }
            }
        }
    };

    Ok(FilterSelection {
        section: cli.section.clone(),
        stage_column,
        category: cli.category.clone().map(|c| c.to_uppercase()),
    })
}
