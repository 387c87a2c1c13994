//! funcsearch command-line entry point
//!
//! - `funcsearch` / `funcsearch run`: index the configured project, then run the configured query
//! - `funcsearch index [PATH]`: index only
//! - `funcsearch query TEXT`: search only
//! - `funcsearch stats`: count stored functions
//!
//! Logs go to stderr; results go to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use funcsearch::{Config, FuncSearchClient, FuncSearchError, IndexSummary, SearchHit};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "funcsearch")]
#[command(about = "Index a codebase function by function and search it in natural language")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Path to a TOML config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FUNCSEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Index the configured project, then run the configured query (default)
    Run,

    /// Index a project without querying
    Index {
        /// Project root (defaults to indexing.project_path)
        path: Option<PathBuf>,

        /// File extension to index, e.g. "py" or "rs"
        #[arg(short, long)]
        extension: Option<String>,

        /// Drop the collection before indexing
        #[arg(long)]
        reset: bool,
    },

    /// Search previously indexed functions
    Query {
        /// Natural-language query
        text: String,

        /// Number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show how many functions are stored
    Stats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = execute(cli).await {
        eprintln!("Error: {:#}", err);

        let err = FuncSearchError::from(err);
        let code = if err.is_user_error() {
            eprintln!("Check the configuration file, environment variables and arguments.");
            2
        } else {
            if err.is_retryable() {
                eprintln!("The failure may be transient; re-running may succeed.");
            }
            1
        };
        std::process::exit(code);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let client = FuncSearchClient::with_config(config).await?;
            let (summary, hits) = client.run().await?;
            print_summary(&summary);
            println!();
            println!("Query: {}", client.config().search.query);
            print_hits(&hits);
        }
        Command::Index {
            path,
            extension,
            reset,
        } => {
            let path = path.unwrap_or_else(|| config.indexing.project_path.clone());
            let extension = extension.unwrap_or_else(|| config.indexing.extension.clone());
            // Reset at open time so a collection built for another model can be replaced
            config.vector_db.reset_on_index |= reset;
            let reset = config.vector_db.reset_on_index;

            let client = FuncSearchClient::with_config(config).await?;
            let summary = client.index_project(&path, &extension, reset).await?;
            print_summary(&summary);
        }
        Command::Query { text, limit } => {
            let limit = limit.unwrap_or(config.search.limit);
            let client = FuncSearchClient::search_only(config).await?;
            print_hits(&client.query(&text, limit).await?);
        }
        Command::Stats => {
            let client = FuncSearchClient::search_only(config).await?;
            let stats = client.stats().await?;
            println!("{}: {} functions", stats.collection, stats.total_records);
        }
    }

    Ok(())
}

fn print_summary(summary: &IndexSummary) {
    println!(
        "Indexed {} functions from {} files in {} ms",
        summary.functions_indexed, summary.files_visited, summary.duration_ms
    );
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results.");
        return;
    }

    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} ({}) score {:.3}",
            rank + 1,
            hit.metadata.func_name,
            hit.metadata.file_path,
            hit.score
        );
        println!("   {}", hit.document.replace('\n', "\n   "));
    }
}
