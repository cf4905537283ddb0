// ==========================================
// Wood QC Report - Command line entry
// ==========================================
// Subcommands:
//   render  - build the certificate PDF for one sample (or every row)
//   inspect - print the resolved fields, metrics and findings as JSON
// ==========================================

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use wood_qc_report::domain::CanonicalField;
use wood_qc_report::{archive, logging, EngineConfig, RawRecord, RecordLoader, RecordSelector, ReportEngine};

#[derive(Parser, Debug)]
#[command(
    name = "wood-qc-report",
    version,
    about = "Treated-wood retention analysis and certificate generation"
)]
struct Cli {
    /// Configuration file (defaults to $WOOD_QC_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Render(RenderArgs),
    Inspect(SourceArgs),
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Spreadsheet (.xlsx), CSV or JSON file holding the sample rows
    #[arg(long)]
    input: PathBuf,

    /// Worksheet name for Excel input
    #[arg(long)]
    sheet: Option<String>,

    /// Sample identifier to report on
    #[arg(long, conflicts_with = "row")]
    sample: Option<String>,

    /// 1-based data row to report on
    #[arg(long)]
    row: Option<usize>,
}

impl SourceArgs {
    fn selector(&self) -> RecordSelector {
        match (&self.sample, self.row) {
            (Some(id), _) => RecordSelector::Sample(id.clone()),
            (None, Some(row)) => RecordSelector::Row(row),
            (None, None) => RecordSelector::First,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// File reports under <root>/<year>/<month> by entry date instead of --out
    #[arg(long)]
    archive_root: Option<PathBuf>,

    /// Render every row of the input
    #[arg(long, default_value_t = false, conflicts_with_all = ["sample", "row"])]
    all: bool,
}

fn main() {
    let cli = Cli::parse();
    match cli.log_format {
        LogFormat::Text => logging::init(),
        LogFormat::Json => logging::init_json(),
    }

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    info!(version = wood_qc_report::VERSION, "{}", wood_qc_report::APP_NAME);

    match cli.command {
        Commands::Render(args) => render(config, &args),
        Commands::Inspect(args) => inspect(config, &args),
    }
}

fn render(config: EngineConfig, args: &RenderArgs) -> Result<()> {
    let records = {
        let loader = RecordLoader::new(&config, args.source.sheet.as_deref());
        let records = loader
            .load(&args.source.input)
            .with_context(|| format!("failed to read {}", args.source.input.display()))?;
        if args.all {
            records
        } else {
            vec![loader.select(records, &args.source.selector())?]
        }
    };

    let fallback_stem = config.report.fallback_file_stem.clone();
    let engine = ReportEngine::new(config);
    for (index, raw) in records.iter().enumerate() {
        let stem = archive::batch_fallback_stem(&fallback_stem, index, args.all);
        let path = render_one(&engine, raw, &stem, args)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn render_one(engine: &ReportEngine, raw: &RawRecord, fallback_stem: &str, args: &RenderArgs) -> Result<PathBuf> {
    let report = engine.generate_named(raw, fallback_stem);

    match &args.archive_root {
        Some(root) => {
            let today = Local::now().date_naive();
            let entry_date = report.fields.get(CanonicalField::EntryDate);
            Ok(archive::archive_document(root, &report.file_name, &report.bytes, entry_date, today)?)
        }
        None => write_to(&args.out, &report.file_name, &report.bytes),
    }
}

fn write_to(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(file_name);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn inspect(config: EngineConfig, args: &SourceArgs) -> Result<()> {
    let raw = RecordLoader::new(&config, args.sheet.as_deref())
        .load_one(&args.input, &args.selector())
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let analysis = ReportEngine::new(config).analyze(&raw);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
