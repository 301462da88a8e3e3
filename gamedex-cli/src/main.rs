//! CLI for the gamedex catalog query engine.
//!
//! Loads a dataset once per invocation and runs a single query against it.
//! Diagnostics go to stderr; set `RUST_LOG=debug` for load details.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gamedex::{DatasetConfig, Engine, GameRecord, PriceAverage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// gamedex: tag and release-date queries over a game catalog.
#[derive(Parser)]
#[command(name = "gamedex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Dataset location and layout, shared by every command.
#[derive(Args)]
struct DatasetArgs {
    /// Path to the delimited dataset file.
    dataset: PathBuf,

    /// JSON file describing the column layout, separators, and date format.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "csv")]
    format: OutputFormat,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Summarize a dataset: record and tag counts, date span, skipped rows.
    Info {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// List games with a tag released in a given year.
    Year {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Tag to match (case-insensitive).
        tag: String,

        /// Release year.
        year: i32,
    },

    /// List games with a tag released between two dates, inclusive.
    Range {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Tag to match (case-insensitive).
        tag: String,

        /// Earliest release date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        from: NaiveDate,

        /// Latest release date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        to: NaiveDate,
    },

    /// List games with a tag released on or before a date.
    UpTo {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Tag to match (case-insensitive).
        tag: String,

        /// Latest release date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Rank games by original_price, release_date, name, or all_reviews.
    Top {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Attribute to rank by.
        attribute: String,

        /// Number of games to return.
        #[arg(short, long, default_value = "10")]
        k: usize,
    },

    /// Average original price of games released between two dates.
    Avg {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Earliest release date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        from: NaiveDate,

        /// Latest release date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        to: NaiveDate,

        /// Only average games carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
}

/// Output format for query results.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON.
    Json,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Info { dataset } => cmd_info(&dataset),
        Commands::Year { dataset, tag, year } => {
            let engine = open(&dataset)?;
            print_names(&engine.by_exact_year(Some(&tag), Some(year)), dataset.format)
        }
        Commands::Range {
            dataset,
            tag,
            from,
            to,
        } => {
            let engine = open(&dataset)?;
            print_names(
                &engine.by_date_range(Some(&tag), Some(from), Some(to)),
                dataset.format,
            )
        }
        Commands::UpTo { dataset, tag, date } => {
            let engine = open(&dataset)?;
            print_names(&engine.up_to_date(Some(&tag), Some(date)), dataset.format)
        }
        Commands::Top {
            dataset,
            attribute,
            k,
        } => {
            let engine = open(&dataset)?;
            let ranked = engine.top_k_by(&attribute, k)?;
            print_records(&ranked, dataset.format)
        }
        Commands::Avg {
            dataset,
            from,
            to,
            tag,
        } => {
            let engine = open(&dataset)?;
            let average = match tag.as_deref() {
                Some(tag) => engine.average_price_for_tag(Some(from), Some(to), Some(tag))?,
                None => engine.average_price(Some(from), Some(to))?,
            };
            print_average(average, dataset.format)
        }
    }
}

/// Reads the optional config file, defaulting to the Steam export layout.
fn dataset_config(path: Option<&Path>) -> Result<DatasetConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(DatasetConfig::from_json_file(path)?),
        None => Ok(DatasetConfig::default()),
    }
}

fn load(args: &DatasetArgs) -> Result<(Engine, gamedex::LoadReport), Box<dyn std::error::Error>> {
    let config = dataset_config(args.config.as_deref())?;
    let (engine, report) = Engine::load_csv(&args.dataset, config)?;
    info!(
        dataset = %args.dataset.display(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        price_fallbacks = report.price_fallbacks,
        "dataset ready"
    );
    Ok((engine, report))
}

fn open(args: &DatasetArgs) -> Result<Engine, Box<dyn std::error::Error>> {
    load(args).map(|(engine, _)| engine)
}

/// Implements `gamedex info <dataset>`.
fn cmd_info(args: &DatasetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, report) = load(args)?;
    let stats = engine.stats();

    match args.format {
        OutputFormat::Csv => {
            println!("Dataset: {}", args.dataset.display());
            println!();
            println!("Records: {}", stats.records);
            println!("Tags: {}", stats.tags);
            println!("Index buckets: {}", stats.buckets);
            if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
                println!("Released: {earliest} to {latest}");
            }
            println!("Price fallbacks: {}", report.price_fallbacks);
            println!("Blank lines: {}", report.blank_lines);
            println!("Lines with invalid UTF-8: {}", report.lossy_lines);
            println!("Skipped rows: {}", report.skipped.len());
            for (line, reason) in report.skipped.iter().take(10) {
                println!("  - line {line}: {reason}");
            }
            if report.skipped.len() > 10 {
                println!("  ... and {} more", report.skipped.len() - 10);
            }
        }
        OutputFormat::Json => {
            let skipped: Vec<serde_json::Value> = report
                .skipped
                .iter()
                .map(|(line, reason)| {
                    serde_json::json!({
                        "line": line,
                        "reason": reason.to_string(),
                    })
                })
                .collect();

            let output = serde_json::json!({
                "dataset": args.dataset.display().to_string(),
                "stats": stats,
                "price_fallbacks": report.price_fallbacks,
                "blank_lines": report.blank_lines,
                "lossy_lines": report.lossy_lines,
                "skipped": skipped,
            });

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_names(names: &[String], format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => {
            println!("name");
            for name in names {
                println!("{}", csv_field(name));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
    }
    Ok(())
}

fn print_records(
    records: &[std::sync::Arc<GameRecord>],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => {
            println!("name,release_date,original_price,review_score");
            for record in records {
                println!(
                    "{},{},{:.2},{}",
                    csv_field(record.name()),
                    record.release_date(),
                    record.original_price(),
                    record.review_score()
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = records
                .iter()
                .map(|record| {
                    serde_json::json!({
                        "name": record.name(),
                        "release_date": record.release_date(),
                        "original_price": record.original_price(),
                        "review_score": record.review_score(),
                        "tags": record.tags(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn print_average(
    average: Option<PriceAverage>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match (format, average) {
        (OutputFormat::Csv, Some(avg)) => {
            println!("average_price,count");
            println!("{avg},{}", avg.count);
        }
        (OutputFormat::Csv, None) => println!("No games found in the given range"),
        (OutputFormat::Json, avg) => {
            let output = serde_json::json!({
                "average_price": avg.map(|a| a.formatted()),
                "count": avg.map_or(0, |a| a.count),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` date argument.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Quotes a CSV field when it contains a comma, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
