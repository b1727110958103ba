//! wirebench - MongoDB wire compression benchmark
//!
//! Inserts one multi-megabyte synthetic document per compressor (snappy,
//! zlib, zstd) and compares the storage size the server reports, the insert
//! latency, and the projected bandwidth and transfer cost.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wirebench_cli::output::{format_size, rule, Status};
use wirebench_cli::progress;
use wirebench_core::config::BenchConfig;
use wirebench_core::document::TestDocument;
use wirebench_core::error::exit_codes;
use wirebench_core::metrics::Analysis;
use wirebench_core::size::Payload;
use wirebench_engine::{Deadline, Orchestrator, RunEvent};
use wirebench_store::{MongoBackend, StoreConfig};

mod report;

/// Output format for the benchmark report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Measure MongoDB wire compression with a synthetic 4.7MB document
#[derive(Parser)]
#[command(name = "wirebench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MongoDB connection string (falls back to MONGODB_URI)
    #[arg(long, env = "WIREBENCH_URI")]
    uri: Option<String>,

    /// Database holding the per-algorithm collections
    #[arg(long, env = "WIREBENCH_DATABASE")]
    database: Option<String>,

    /// Overall deadline in seconds
    #[arg(long, value_name = "SECS", env = "WIREBENCH_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Configuration file (defaults to ./wirebench.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("wirebench=debug,wirebench_engine=debug,wirebench_store=debug,wirebench_core=debug")
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Exit status for an error, taken from its code when it carries one
fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<wirebench_core::Error>()
        .map_or(exit_codes::FAILURE, |e| exit_codes::for_code(e.code));
    u8::try_from(code).unwrap_or(1)
}

/// Resolve configuration: file, then environment, then flags
fn resolve_config(cli: &Cli) -> wirebench_core::Result<(BenchConfig, StoreConfig)> {
    let mut bench = BenchConfig::load(cli.config.as_deref())?;
    if let Some(database) = &cli.database {
        bench = bench.with_database(database.clone());
    }
    if let Some(secs) = cli.timeout {
        bench = bench.with_deadline(Duration::from_secs(secs));
    }
    bench.validate()?;

    let mut store = StoreConfig::from_env();
    if let Some(uri) = &cli.uri {
        store = store.with_uri(uri.clone());
    }
    store.validate()?;

    Ok((bench, store))
}

async fn run(cli: Cli) -> Result<()> {
    let (config, store_config) = resolve_config(&cli)?;
    let text = cli.format == OutputFormat::Text;

    // The deadline covers synthesis too
    let deadline = Deadline::after(config.deadline);
    let backend = MongoBackend::with_config(store_config).map_err(wirebench_core::Error::from)?;

    if text {
        println!("{}", "🚀 MongoDB Wire Compression Benchmark".bold());
        println!("Target: {}", backend.config().redacted_uri().dimmed());
        println!();
    }

    let spinner = text.then(|| progress::spinner("Generating test document..."));
    let document = TestDocument::generate(&config.document);
    let payload = match Payload::from_test_document(&document) {
        Ok(payload) => payload,
        Err(err) => {
            if let Some(spinner) = &spinner {
                progress::finish_error(spinner, "Could not encode test document");
            }
            return Err(err.into());
        }
    };
    if let Some(spinner) = &spinner {
        progress::finish_success(
            spinner,
            &format!("Generated document: {:.2}MB", payload.original_size_mb()),
        );
        println!();
    }

    let orchestrator = Orchestrator::new(backend, config, deadline);
    let total = orchestrator.config().algorithms.len();

    if text {
        println!("🧪 Running compression tests...");
        println!("{}", rule('─', 40));
    }

    let result = orchestrator
        .run_all_with(&payload, |event| {
            if !text {
                return;
            }
            match event {
                RunEvent::Started { index, algorithm, .. } => {
                    Status::step(index + 1, total, &format!("Testing {} compression...", algorithm.name));
                }
                RunEvent::Finished { result, .. } => {
                    println!(
                        "      {} stored in {}",
                        result.algorithm,
                        format_size(result.compressed_size)
                    );
                }
            }
        })
        .await;

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            // Best effort; a failed run still leaves collections behind
            if !err.is_timeout() {
                let _ = orchestrator.teardown().await;
            }
            return Err(err.into());
        }
    };

    let analysis = Analysis::new(&report, &orchestrator.config().projection);

    match cli.format {
        OutputFormat::Json => {
            let json = report::JsonReport::new(orchestrator.run_id(), orchestrator.config(), &report, &analysis);
            println!("{}", json.to_json()?);
        }
        OutputFormat::Text => {
            print!("{}", report::render_results(&report, &analysis));
            print!("{}", report::render_reference());
        }
    }

    // Leftover collections do not invalidate the measurements
    if let Err(err) = orchestrator.teardown().await {
        Status::warning(&format!("Could not drop database: {}", err));
    }

    if text {
        println!();
        Status::success("Benchmark completed successfully!");
    }
    Ok(())
}
