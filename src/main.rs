use std::path::PathBuf;
use std::time::Duration;

use aideon_catalog::aideon::catalog::io::xml_read;
use aideon_catalog::aideon::catalog::preview::{self, DEFAULT_PREVIEW_ROWS};
use aideon_catalog::aideon::catalog::publish::ClientConfig;
use aideon_catalog::aideon::catalog::sync;
use aideon_catalog::{CatalogError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CatalogError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert(args) => execute_convert(args),
        Command::Preview(args) => execute_preview(args),
        Command::Publish(args) => execute_publish(args),
    }
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CatalogError::MissingInput(args.input));
    }

    match (args.from, args.to) {
        (DataFormat::Xml, DataFormat::Csv) => sync::xml_to_csv(&args.input, &args.output),
        (DataFormat::Xml, DataFormat::Excel) => sync::xml_to_excel(&args.input, &args.output),
        (DataFormat::Xml, DataFormat::Xml) => sync::xml_to_xml(&args.input, &args.output),
        (DataFormat::Csv, DataFormat::Xml) => sync::csv_to_xml(&args.input, &args.output),
        (DataFormat::Excel, DataFormat::Xml) => sync::excel_to_xml(&args.input, &args.output),
        _ => Err(CatalogError::UnsupportedConversion {
            from: args.from.to_string(),
            to: args.to.to_string(),
        }),
    }
}

fn execute_preview(args: PreviewArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CatalogError::MissingInput(args.input));
    }

    let table = xml_read::read_catalog(&args.input)?;
    print!("{}", preview::render(&table, args.rows));
    Ok(())
}

fn execute_publish(args: PublishArgs) -> Result<()> {
    for path in [&args.input, &args.credentials] {
        if !path.exists() {
            return Err(CatalogError::MissingInput(path.clone()));
        }
    }

    let config = ClientConfig {
        timeout: Duration::from_secs(args.timeout),
        ..ClientConfig::default()
    };
    let summary = sync::publish_xml(&args.input, &args.sheet_url, &args.credentials, &config)?;
    println!(
        "uploaded {} rows to worksheet '{}' of spreadsheet {}",
        summary.rows_written, summary.worksheet, summary.sheet_id
    );
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert a book catalog between XML, CSV, and Excel, and publish it to Google Sheets."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the catalog from one representation to another.
    Convert(ConvertArgs),
    /// Print the first records of a catalog document.
    Preview(PreviewArgs),
    /// Replace the first worksheet of a Google sheet with the catalog.
    Publish(PublishArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Source representation.
    #[arg(long, value_enum)]
    from: DataFormat,

    /// Input file path.
    #[arg(long)]
    input: PathBuf,

    /// Target representation.
    #[arg(long, value_enum)]
    to: DataFormat,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Catalog document to read.
    #[arg(long)]
    input: PathBuf,

    /// Number of records to show.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    rows: usize,
}

#[derive(clap::Args)]
struct PublishArgs {
    /// Catalog document to publish.
    #[arg(long)]
    input: PathBuf,

    /// URL of the target Google sheet.
    #[arg(long)]
    sheet_url: String,

    /// Service-account credentials JSON file. The service account needs editor
    /// access to the sheet.
    #[arg(long)]
    credentials: PathBuf,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DataFormat {
    Xml,
    Csv,
    Excel,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Xml => write!(f, "xml"),
            DataFormat::Csv => write!(f, "csv"),
            DataFormat::Excel => write!(f, "xlsx"),
        }
    }
}
