//! Radie CLI - Command-line interface
//!
//! Usage:
//!   radie extract [--xml-dir <dir>] [--output-dir <dir>] [--quiet]
//!   radie append [--extracted <file>] [--template <file>] [--out <file>]
//!   radie inspect <file>

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use radie_core::config::{AppConfig, LoggingConfig};
use radie_dataset::{
    read_records, write_dataset_file, DatasetMapper, DatasetSchema, JsonlRecords,
};
use radie_extractor::{ExtractionSummary, JsonlWriter, RecordBuilder};
use radie_parser::ParserRegistry;

#[derive(Parser)]
#[command(name = "radie")]
#[command(about = "Rule-based extraction of radiation-exposure parameters from papers")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); missing file means defaults
    #[arg(long, global = true, default_value = "radie.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one record per TEI document into extracted.jsonl
    Extract {
        /// Directory of TEI documents
        #[arg(long)]
        xml_dir: Option<PathBuf>,
        /// Directory receiving extracted.jsonl
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Hide the progress bar
        #[arg(long, short)]
        quiet: bool,
    },
    /// Map extracted records onto the dataset template
    Append {
        /// Extraction JSONL to read
        #[arg(long)]
        extracted: Option<PathBuf>,
        /// CSV template whose header defines the columns
        #[arg(long)]
        template: Option<PathBuf>,
        /// Dataset CSV to write
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Extract a single document and print its record
    Inspect {
        /// Document to extract
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .and_then(AppConfig::with_env_override)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract {
            xml_dir,
            output_dir,
            quiet,
        } => {
            let mut config = config;
            if let Some(dir) = output_dir {
                config.paths.output_dir = dir;
            }
            if let Some(dir) = xml_dir {
                config.paths.xml_dir = Some(dir);
            }
            run_extract(&config, quiet)
        }
        Commands::Append {
            extracted,
            template,
            out,
        } => {
            let extracted = extracted.unwrap_or_else(|| config.paths.extracted_jsonl());
            let out = out.unwrap_or_else(|| config.paths.dataset_csv());
            let template = match template {
                Some(template) => template,
                None => config
                    .paths
                    .dataset_template()
                    .context("use --template or RADIE_DATASET_TEMPLATE")?
                    .to_path_buf(),
            };
            run_append(&extracted, &template, &out)
        }
        Commands::Inspect { path } => run_inspect(&path),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_extract(config: &AppConfig, quiet: bool) -> anyhow::Result<()> {
    let xml_dir = config.paths.xml_dir();
    if !xml_dir.is_dir() {
        warn!(path = %xml_dir.display(), "Input directory not found, nothing to extract");
        return Ok(());
    }

    let documents = list_documents(&xml_dir, &config.extraction.input_suffix)?;
    info!(
        path = %xml_dir.display(),
        documents = documents.len(),
        "Starting extraction"
    );

    std::fs::create_dir_all(&config.paths.output_dir).with_context(|| {
        format!("creating output directory {}", config.paths.output_dir.display())
    })?;
    let output = config.paths.extracted_jsonl();
    let mut writer = JsonlWriter::create(&output)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(documents.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let registry = ParserRegistry::with_defaults();
    let builder = RecordBuilder::new();
    let mut summary = ExtractionSummary::new();

    for path in &documents {
        let name = file_name(path);
        progress.set_message(name.clone());

        let text = registry.parse(path).map(|doc| {
            debug!(
                source_file = %name,
                words = doc.word_count(),
                paragraphs = doc.metadata.paragraph_count,
                partial = doc.metadata.recovered_error.is_some(),
                "Document parsed"
            );
            doc.content
        });
        if let Some(record) = builder.process_document(&name, text, &mut summary) {
            writer.write_record(&record)?;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let written = writer.written();
    writer.finish()?;

    info!(path = %output.display(), records = written, "Wrote extraction output");
    info!("{}", summary.report());
    Ok(())
}

fn run_append(extracted: &Path, template: &Path, out: &Path) -> anyhow::Result<()> {
    let schema = DatasetSchema::from_template(template)
        .with_context(|| format!("reading dataset template {}", template.display()))?;
    let input = if extracted.exists() {
        read_records(extracted)
            .with_context(|| format!("reading extracted records {}", extracted.display()))?
    } else {
        warn!(path = %extracted.display(), "Extracted records not found, writing an empty dataset");
        JsonlRecords::default()
    };

    if input.skipped_lines > 0 {
        warn!(
            path = %extracted.display(),
            skipped = input.skipped_lines,
            "Some lines were not valid records"
        );
    }

    let rows = DatasetMapper::new(schema.clone()).map_records(&input.records);
    write_dataset_file(out, &schema, &rows)
        .with_context(|| format!("writing dataset {}", out.display()))?;

    info!(rows = rows.len(), columns = schema.len(), "Dataset mapped");
    Ok(())
}

fn run_inspect(path: &Path) -> anyhow::Result<()> {
    let doc = ParserRegistry::with_defaults()
        .parse(path)
        .with_context(|| format!("parsing {}", path.display()))?;
    let record = RecordBuilder::new().build(&file_name(path), &doc.content)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Files in `dir` ending with `suffix`, sorted by path
fn list_documents(dir: &Path, suffix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && file_name(&path).ends_with(suffix) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
