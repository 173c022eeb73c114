// casklabels: Generate cask labels on pre-printed label sheets

use casklabels::config::{create_field_file, create_label_file, read_fields, read_label_types};
use casklabels::page::find_page_size;
use casklabels::{expand, CsvRecords, LabelError, LabelSheetRenderer, PdfCanvas};
use clap::{ArgGroup, Parser, ValueEnum};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::{warn, Dispatch};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Title written into the PDF metadata
const DOCUMENT_TITLE: &str = "Cask Labels";

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Timestamp, level, target and message
    Full,
    /// Shorter single-line records
    Compact,
}

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate cask labels on pre-printed label sheets")]
#[command(group(ArgGroup::new("log_level").args(["debug", "info", "warn", "error"])))]
struct Args {
    /// Create an empty CSV file for label types
    #[arg(long = "newlabelfile", value_name = "PATH", conflicts_with_all = ["label_type", "output_file"])]
    new_label_file: Option<PathBuf>,

    /// CSV file defining the label types
    #[arg(long = "labelfile", value_name = "PATH", default_value = "labeltypes.csv")]
    label_file: PathBuf,

    /// Name of the label type to be used (defaults to the first in the file)
    #[arg(long = "labeltype", value_name = "NAME")]
    label_type: Option<String>,

    /// Create an empty CSV file for label fields
    #[arg(long = "newfieldfile", value_name = "PATH", conflicts_with_all = ["label_type", "output_file"])]
    new_field_file: Option<PathBuf>,

    /// CSV file defining the label fields
    #[arg(long = "fieldfile", value_name = "PATH", default_value = "labelfields.csv")]
    field_file: PathBuf,

    /// CSV file containing data for labels
    #[arg(
        long = "datafile",
        value_name = "PATH",
        required_unless_present_any = ["new_label_file", "new_field_file"]
    )]
    data_file: Option<PathBuf>,

    /// Name of PDF file to be created
    #[arg(
        long = "outputfile",
        value_name = "PATH",
        required_unless_present_any = ["new_label_file", "new_field_file"]
    )]
    output_file: Option<PathBuf>,

    /// Column holding the number of casks of each beer
    #[arg(long, value_name = "COLUMN")]
    quantity: Option<String>,

    /// Generated column for the cask number
    #[arg(long = "enum", value_name = "COLUMN")]
    counter: Option<String>,

    /// Page size when the label type does not name one
    #[arg(long = "pagesize", value_name = "NAME", default_value = "A4")]
    page_size: String,

    /// Turn on debug logging
    #[arg(long)]
    debug: bool,

    /// Turn on info logging
    #[arg(long)]
    info: bool,

    /// Turn on warning logging (default)
    #[arg(long)]
    warn: bool,

    /// Turn on error logging
    #[arg(long)]
    error: bool,

    /// Format of log messages
    #[arg(long = "logformat", value_enum, default_value_t = LogFormat::Full)]
    log_format: LogFormat,

    /// Log file, stderr by default
    #[arg(long = "logfile", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match (self.debug, self.info, self.warn, self.error) {
            (true, _, _, _) => LevelFilter::DEBUG,
            (_, true, _, _) => LevelFilter::INFO,
            (_, _, true, _) => LevelFilter::WARN,
            (_, _, _, true) => LevelFilter::ERROR,
            _ => LevelFilter::WARN,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();

    let dispatch = match log_dispatch(&args) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = tracing::dispatcher::with_default(&dispatch, || run(&args));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), LabelError> {
    if args.new_label_file.is_some() || args.new_field_file.is_some() {
        return create_template_files(args);
    }
    create_labels(args)
}

// ============================================================================
// Logging
// ============================================================================

/// Subscriber for this run. `RUST_LOG` directives refine the chosen level.
fn log_dispatch(args: &Args) -> Result<Dispatch, LabelError> {
    let filter = EnvFilter::builder()
        .with_default_directive(args.log_level().into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let dispatch = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_writer(Mutex::new(file)).with_ansi(false);
            match args.log_format {
                LogFormat::Full => Dispatch::new(builder.finish()),
                LogFormat::Compact => Dispatch::new(builder.compact().finish()),
            }
        }
        None => {
            let builder = builder.with_writer(std::io::stderr);
            match args.log_format {
                LogFormat::Full => Dispatch::new(builder.finish()),
                LogFormat::Compact => Dispatch::new(builder.compact().finish()),
            }
        }
    };

    Ok(dispatch)
}

// ============================================================================
// Commands
// ============================================================================

/// Both files are attempted even if the first one fails.
fn create_template_files(args: &Args) -> Result<(), LabelError> {
    let mut outcome = Ok(());

    if let Some(path) = &args.new_label_file {
        match create_label_file(path) {
            Ok(()) => println!("✓ Created: {}", path.display()),
            Err(e) => outcome = outcome.and(Err(e)),
        }
    }
    if let Some(path) = &args.new_field_file {
        match create_field_file(path) {
            Ok(()) => println!("✓ Created: {}", path.display()),
            Err(e) => outcome = outcome.and(Err(e)),
        }
    }

    outcome
}

fn create_labels(args: &Args) -> Result<(), LabelError> {
    let (Some(data_file), Some(output_file)) = (&args.data_file, &args.output_file) else {
        return Err(LabelError::UsageError(
            "--datafile and --outputfile are required to create labels".to_string(),
        ));
    };

    if args.quantity.is_some() != args.counter.is_some() {
        warn!("--quantity and --enum only take effect together, printing one label per row");
    }

    let default_page = find_page_size(&args.page_size)?;
    let label_types = read_label_types(&args.label_file, default_page)?;
    let label_type = label_types.get(args.label_type.as_deref())?;
    for problem in label_type.geometry.fit_problems() {
        warn!("label type '{}': {}", label_type.name, problem);
    }
    let fields = read_fields(&args.field_file, &label_type.geometry)?;

    let records = expand(
        CsvRecords::open(data_file)?,
        args.quantity.as_deref(),
        args.counter.as_deref(),
    );

    let mut canvas = PdfCanvas::new(DOCUMENT_TITLE, output_file, default_page);
    let summary = LabelSheetRenderer::new(&label_type.geometry, &fields).render(&mut canvas, records)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Label type: {}", label_type.name);
    println!("  Labels: {}", summary.labels);
    println!("  Pages: {}", summary.pages);

    Ok(())
}
