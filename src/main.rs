use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use chisel::config::{Config, RunConfig};
use chisel::contingency::CountUnit;
use chisel::corpus::reader::{self, ReadReport};
use chisel::output::{self, OutputFormat};
use chisel::runtime::local::LocalSubstrate;

/// Chisel: chi-squared term selection per category.
///
/// Reads a JSON-lines corpus of labeled reviews and reports, for every
/// category, the terms whose presence is most strongly associated with it.
#[derive(Parser)]
#[command(name = "chisel", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a corpus.
#[derive(Args)]
struct CorpusArgs {
    /// JSON-lines corpus (one review object per line)
    input: PathBuf,

    /// Stopword file, one word per line (default: built-in English list)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Count documents or individual token occurrences
    #[arg(long, value_enum)]
    count_unit: Option<CountUnit>,

    /// Number of map partitions (default: available cores)
    #[arg(long)]
    partitions: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the top-K discriminative terms for every category
    Select {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Terms to keep per category (default: 75)
        #[arg(short, long, allow_negative_numbers = true)]
        k: Option<i64>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip collecting the vocabulary of scored terms
        #[arg(long)]
        no_vocabulary: bool,
    },

    /// Show the contingency table and score for one category/term pair
    Inspect {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Category label, exactly as it appears in the corpus
        category: String,

        /// Term (case-folded before lookup)
        term: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chisel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            corpus,
            k,
            format,
            output: out_path,
            no_vocabulary,
        } => {
            let config = load_config(&corpus, k)?;
            let run_config = config
                .run_config()?
                .with_vocabulary(!no_vocabulary)
                .with_progress(format == OutputFormat::Table);
            let substrate = LocalSubstrate::new(config.partitions)?;
            let documents = read_corpus(&corpus)?;

            let report =
                chisel::pipeline::chi_squared::run(&substrate, &documents.documents, &run_config)?;

            match out_path {
                Some(path) => {
                    output::write_report(&report, format, &path)?;
                    println!(
                        "{}",
                        format!("Results saved to: {}", path.display()).bold()
                    );
                }
                None if format == OutputFormat::Table => {
                    output::terminal::display_report(&report)
                }
                None => print!("{}", output::render(&report, format)?),
            }
        }

        Commands::Inspect {
            corpus,
            category,
            term,
        } => {
            let config = load_config(&corpus, None)?;
            let run_config: RunConfig = config.run_config()?.with_vocabulary(false);
            let substrate = LocalSubstrate::new(config.partitions)?;
            let documents = read_corpus(&corpus)?;

            let cell = chisel::pipeline::chi_squared::inspect(
                &substrate,
                &documents.documents,
                &run_config,
                &category,
                &term,
            )?;

            match cell {
                Some(cell) => {
                    output::terminal::display_cell(&cell.pair, &cell.counts, &cell.table, cell.score);
                }
                None => {
                    println!(
                        "{} never occurs in category {}; nothing to score.",
                        term.to_ascii_lowercase().bold(),
                        category.bold()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Environment first, then CLI flags on top.
fn load_config(corpus: &CorpusArgs, k: Option<i64>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(k) = k {
        config.k = k;
    }
    if let Some(path) = &corpus.stopwords {
        config.stopwords_path = Some(path.clone());
    }
    if let Some(unit) = corpus.count_unit {
        config.count_unit = unit;
    }
    if let Some(partitions) = corpus.partitions {
        config.partitions = partitions;
    }
    config.validate()?;
    Ok(config)
}

fn read_corpus(corpus: &CorpusArgs) -> Result<ReadReport> {
    info!(path = %corpus.input.display(), "Reading corpus");
    let report = reader::read_path(&corpus.input)
        .with_context(|| format!("Failed to read corpus {}", corpus.input.display()))?;
    if !report.rejected.is_empty() {
        warn!(
            rejected = report.rejected.len(),
            "Some records were malformed and skipped"
        );
    }
    Ok(report)
}
