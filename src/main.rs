use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use emboss_consolidator::config::{DEFAULT_OUTPUT_CSV, DEFAULT_REFERENCE_DIR};
use emboss_consolidator::logging;
use emboss_consolidator::outcome::count_by_class;
use emboss_consolidator::table::{export, ConsolidatedTable, SortOrder, TableFilter};
use emboss_consolidator::{
    consolidate, merge_by_date, merge_by_date_range, merge_by_product, EngineConfig, EngineError,
    ErrorClass, MergeReport, Warning,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "emboss-consolidator")]
#[command(about = "Card embossing file consolidator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Consolidate(ConsolidateArgs),
    MergeDate(MergeArgs),
    MergeProduct(MergeArgs),
    MergeRange(MergeRangeArgs),
    Export(ExportArgs),
}

#[derive(Parser)]
struct ConsolidateArgs {
    #[arg(long, default_value = "./inputfiles")]
    source: PathBuf,
    #[arg(long, default_value = DEFAULT_REFERENCE_DIR)]
    reference_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_OUTPUT_CSV)]
    output: PathBuf,
}

#[derive(Parser)]
struct MergeArgs {
    #[arg(long, default_value = "./inputfiles")]
    source: PathBuf,
    /// Parent directory for the merge output folder (defaults to the source)
    #[arg(long)]
    output_root: Option<PathBuf>,
}

#[derive(Parser)]
struct MergeRangeArgs {
    #[command(flatten)]
    merge: MergeArgs,
    /// Inclusive start date, YYYY-MM-DD
    #[arg(long)]
    start: NaiveDate,
    /// Inclusive end date, YYYY-MM-DD
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Parser)]
struct ExportArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT_CSV)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    #[arg(long)]
    product: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    sort_column: Option<usize>,
    #[arg(long, default_value_t = false)]
    descending: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("emboss-consolidator")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Consolidate(args) => run_consolidate(args),
        Command::MergeDate(args) => {
            let config = merge_config(&args);
            run_merge(|| merge_by_date(&args.source, &config))
        }
        Command::MergeProduct(args) => {
            let config = merge_config(&args);
            run_merge(|| merge_by_product(&args.source, &config))
        }
        Command::MergeRange(args) => {
            let config = merge_config(&args.merge);
            run_merge(|| merge_by_date_range(&args.merge.source, args.start, args.end, &config))
        }
        Command::Export(args) => run_export(args),
    }
}

fn merge_config(args: &MergeArgs) -> EngineConfig {
    EngineConfig {
        merge_root: args.output_root.clone(),
        ..EngineConfig::default()
    }
}

fn run_consolidate(args: ConsolidateArgs) -> Result<(), String> {
    let config = EngineConfig {
        reference_dir: args.reference_dir,
        output_csv: args.output,
        merge_root: None,
    };

    let start = Instant::now();
    let report = consolidate(&args.source, &config).map_err(describe_failure)?;
    emit_warnings(&report.warnings);
    emit_info_line(&format!(
        "Consolidated {} record(s) from {} of {} file(s) ({} skipped)",
        report.records_written,
        report.files_contributing,
        report.files_scanned,
        report.files_skipped()
    ));
    emit_info_line(&format!("Consolidation time: {} ms", start.elapsed().as_millis()));
    emit_info_line(&report.status_message());
    Ok(())
}

fn run_merge<F>(merge: F) -> Result<(), String>
where
    F: FnOnce() -> Result<MergeReport, EngineError>,
{
    let report = merge().map_err(describe_failure)?;
    emit_warnings(&report.warnings);
    for path in &report.outputs {
        emit_info_line(&format!("Merged output: {}", path.display()));
    }
    emit_info_line(&report.status_message());
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let mut table = ConsolidatedTable::load(&args.input).map_err(describe_failure)?;
    if let Some(column) = args.sort_column {
        let order = if args.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        table.sort_by(column, order);
    }

    let filter = TableFilter {
        product: args.product,
        branch: args.branch,
        district: args.district,
        search: args.search,
    };
    let rows = table.filtered(&filter);
    let written = export(&args.output, &rows).map_err(describe_failure)?;
    emit_info_line(&format!(
        "Data successfully saved to {} ({} of {} row(s))",
        written.display(),
        rows.len(),
        table.len()
    ));
    Ok(())
}

/// Directory conditions already carry the operator-facing text.
fn describe_failure(err: EngineError) -> String {
    if err.class() == ErrorClass::Io {
        format!("Input/output failure: {err}")
    } else {
        err.to_string()
    }
}

fn emit_warnings(warnings: &[Warning]) {
    for warning in warnings {
        log::warn!("{}", warning.message());
    }

    let classes = [
        ("skipped files", ErrorClass::PerFile),
        ("unreadable files", ErrorClass::Io),
        ("reference data", ErrorClass::Reference),
    ];
    for (label, class) in classes {
        let count = count_by_class(warnings, class);
        if count > 0 {
            emit_info_line(&format!("Warnings ({label}): {count}"));
        }
    }
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
