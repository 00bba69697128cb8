//! shipdoc - ingest one shipment document and print the canonical JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use shipdoc_core::{HttpOcrProvider, IngestError, Ingestor, InputError, OcrConfig, SourceType};

/// Ingest a shipment document (PDF, XLSX, CSV, DOCX) into canonical JSON
#[derive(Parser)]
#[command(name = "shipdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input document (.pdf, .xlsx, .csv, .docx)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the canonical JSON
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {}", style("error:").red().bold(), error);
            if let Some(details) = error.downcast_ref::<IngestError>().and_then(parse_details) {
                eprintln!(
                    "{} {}",
                    style("details:").yellow(),
                    serde_json::to_string_pretty(&details).unwrap_or_default()
                );
            }
            ExitCode::FAILURE
        }
    }
}

/// Structural violation details from a schema-gate failure, if any.
fn parse_details(error: &IngestError) -> Option<Vec<String>> {
    match error {
        IngestError::Parse(parse) => parse.details().map(|d| d.to_vec()),
        _ => None,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.input.exists() {
        anyhow::bail!("file not found: {}", cli.input.display());
    }

    let extension = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let file_type = SourceType::from_extension(&extension).ok_or_else(|| {
        InputError::UnsupportedFileType(format!(".{extension} (supported: pdf, xlsx, csv, docx)"))
    })?;

    let buffer = fs::read(&cli.input)?;

    let mut ingestor = Ingestor::new();
    let ocr_config = OcrConfig::from_env();
    if ocr_config.enabled {
        ingestor = ingestor.with_ocr(Box::new(HttpOcrProvider::new(&ocr_config)?));
    }

    let doc = ingestor.parse_file(&buffer, file_type).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("{} wrote {}", style("✓").green(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
