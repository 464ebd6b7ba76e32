//! apiseek CLI
//!
//! Command-line interface for searching API description documents:
//! - `search`: rank operations for a plain-language query
//! - `resolve`: direct `METHOD /path` lookup
//! - `inspect`: index statistics for a spec directory
//! - `repl`: interactive loop, optionally reloading when specs change

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use apiseek_core::{
    parse_direct_query, select_confident, ConfigSource, SearchConfig, SearchEngine, SearchOptions,
};
use apiseek_cli::loader::{load_directory, reload, LoadSummary};
use apiseek_cli::output::{self, SearchReport};
use apiseek_cli::watch::SpecWatcher;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// apiseek - find the API operation you mean
#[derive(Parser)]
#[command(name = "apiseek")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search OpenAPI and Swagger documents in plain language")]
#[command(long_about = "apiseek ranks the operations of a directory of OpenAPI 3 / Swagger 2 JSON documents \
against a natural-language query, using BM25 with synonym expansion and optional hashed embeddings.\n\n\
Tuning flags override the APISEEK_* environment variables.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SpecArgs {
    /// Directory of *.json API description documents
    #[arg(long, default_value = "specs")]
    specs: PathBuf,
}

#[derive(Args, Clone, Default)]
struct TuningArgs {
    /// Maximum candidates to return
    #[arg(long)]
    top_k: Option<usize>,
    /// Minimum score a candidate needs
    #[arg(long)]
    threshold: Option<f64>,
    /// Fuse lexical scores with hashed embeddings
    #[arg(long)]
    embeddings: bool,
}

impl TuningArgs {
    /// Environment configuration unless a flag overrides it
    fn config_source(&self) -> ConfigSource {
        if self.top_k.is_none() && self.threshold.is_none() && !self.embeddings {
            return ConfigSource::Environment;
        }

        let mut config = SearchConfig::from_env();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(threshold) = self.threshold {
            config.score_threshold = threshold;
        }
        if self.embeddings {
            config.embeddings_enabled = true;
        }
        ConfigSource::Fixed(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank operations for a query
    Search {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[command(flatten)]
        specs: SpecArgs,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Look up an operation by method and path
    Resolve {
        /// HTTP method (GET, POST, ...)
        method: String,
        /// Path, templates may use any parameter names
        path: String,
        #[command(flatten)]
        specs: SpecArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show index statistics
    Inspect {
        #[command(flatten)]
        specs: SpecArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive search loop
    Repl {
        #[command(flatten)]
        specs: SpecArgs,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Reload documents when files in the spec directory change
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Search {
            query,
            specs,
            tuning,
            json,
        } => run_search(&query.join(" "), &specs.specs, &tuning, json).await,
        Commands::Resolve {
            method,
            path,
            specs,
            json,
        } => run_resolve(&method, &path, &specs.specs, json),
        Commands::Inspect { specs, json } => run_inspect(&specs.specs, json).await,
        Commands::Repl {
            specs,
            tuning,
            watch,
        } => run_repl(&specs.specs, &tuning, watch).await,
    }
}

/// Load a spec directory into a fresh engine
fn open_engine(dir: &Path, config: ConfigSource) -> anyhow::Result<(SearchEngine, LoadSummary)> {
    let loaded = load_directory(dir)?;
    if loaded.summary.loaded.is_empty() {
        tracing::warn!("No API description documents found in {}", dir.display());
    }
    let engine = SearchEngine::with_config(Arc::new(loaded.catalog), config);
    Ok((engine, loaded.summary))
}

/// Run one query against an engine and print it
async fn answer(engine: &SearchEngine, query: &str, json: bool) -> anyhow::Result<()> {
    if let Some(direct) = parse_direct_query(query) {
        let operations = engine.lookup(&direct.method, &direct.path)?;
        if !operations.is_empty() {
            if json {
                output::print_operations_json(&operations)?;
            } else {
                output::print_operations(&operations);
            }
            return Ok(());
        }
    }

    let candidates = engine
        .search(query, SearchOptions::default())
        .await
        .context("search failed")?;
    let config = engine.config();
    let report = SearchReport {
        query,
        candidates: &candidates,
        accepted: select_confident(&candidates, &config),
    };

    if json {
        output::print_json(&report)
    } else {
        output::print_report(&report);
        Ok(())
    }
}

async fn run_search(query: &str, dir: &Path, tuning: &TuningArgs, json: bool) -> anyhow::Result<()> {
    let (engine, _) = open_engine(dir, tuning.config_source())?;
    answer(&engine, query, json).await
}

fn run_resolve(method: &str, path: &str, dir: &Path, json: bool) -> anyhow::Result<()> {
    let (engine, _) = open_engine(dir, ConfigSource::default())?;
    let operations = engine.lookup(method, path)?;
    if json {
        output::print_operations_json(&operations)
    } else {
        output::print_operations(&operations);
        Ok(())
    }
}

async fn run_inspect(dir: &Path, json: bool) -> anyhow::Result<()> {
    let (engine, summary) = open_engine(dir, ConfigSource::default())?;
    let stats = engine.stats().await.context("index build failed")?;
    if json {
        output::print_json(&serde_json::json!({ "load": summary, "index": stats }))
    } else {
        output::print_stats(&stats, &summary);
        Ok(())
    }
}

async fn run_repl(dir: &Path, tuning: &TuningArgs, watch: bool) -> anyhow::Result<()> {
    let (engine, summary) = open_engine(dir, tuning.config_source())?;
    let reset = engine.reset_handle();
    output::print_load_summary(&summary);
    println!(
        "{}",
        "Type a query, METHOD /path, :reload, :reset, :stats or :quit".dimmed()
    );

    let mut watcher = if watch {
        Some(SpecWatcher::new(dir)?)
    } else {
        None
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let line = line.trim();
                match line {
                    "" => continue,
                    ":quit" | ":q" => break,
                    ":reload" => match reload(&engine, dir) {
                        Ok(summary) => output::print_load_summary(&summary),
                        Err(e) => eprintln!("{}: {:#}", "Reload failed".red().bold(), e),
                    },
                    ":reset" => {
                        reset.reset();
                        println!("{}", "Index will be rebuilt on the next query".dimmed());
                    }
                    ":stats" => match engine.stats().await {
                        Ok(stats) => println!(
                            "{} operations, {} properties, vocabulary {}",
                            stats.operations, stats.properties, stats.vocabulary
                        ),
                        Err(e) => eprintln!("{}: {}", "Index build failed".red().bold(), e),
                    },
                    query => {
                        if let Err(e) = answer(&engine, query, false).await {
                            eprintln!("{}: {:#}", "Error".red().bold(), e);
                        }
                    }
                }
            }
            Some(()) = next_change(&mut watcher) => {
                match reload(&engine, dir) {
                    Ok(summary) => {
                        print!("{} ", "Specs changed.".yellow());
                        output::print_load_summary(&summary);
                    }
                    Err(e) => eprintln!("{}: {:#}", "Reload failed".red().bold(), e),
                }
            }
        }
    }

    Ok(())
}

/// Next change from an optional watcher; pends forever without one
async fn next_change(watcher: &mut Option<SpecWatcher>) -> Option<()> {
    match watcher {
        Some(watcher) => watcher.changed().await,
        None => std::future::pending().await,
    }
}
