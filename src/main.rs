//! Rentscraper main entry point
//!
//! This is the command-line interface for the Rentscraper listing crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rentscraper::config::{load_config_with_hash, Config, RendererKind};
use rentscraper::crawler::{run_to_completion, Coordinator, LogObserver};
use rentscraper::output::{print_digest, print_sources};
use rentscraper::render::build_loader;
use rentscraper::sources::build_extractor;
use rentscraper::storage::{JsonStore, RecordStore};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Rentscraper: incremental rental listing scraper
///
/// Crawls the listing feed of a rental site, visits listings it has not seen
/// before and keeps every record in a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "rentscraper")]
#[command(version = "1.0.0")]
#[command(about = "Rental property scraper for OLX and Airbnb", long_about = None)]
struct Cli {
    /// File to append logs to
    #[arg(short, long, global = true, default_value = "~/rentscraper-log.txt")]
    logfile: String,

    /// File to store records in
    #[arg(long, global = true, default_value = "~/rentscraper-db.json")]
    dbfile: String,

    /// Optional TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape new data from a site into the store
    Scrape {
        /// Site to scrape data from
        source: String,

        /// City of interest
        city: String,

        /// Check page 1 for new listings first and skip the crawl if there are none
        #[arg(long)]
        quick_check: bool,

        /// Page renderer: http or chrome
        #[arg(long)]
        renderer: Option<RendererKind>,
    },

    /// Print the newest records
    Digest {
        /// Number of records to print
        n: usize,
    },

    /// List all available sources
    Sources,

    /// Delete the log file and the store
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logfile = expand_tilde(&cli.logfile);
    let dbfile = expand_tilde(&cli.dbfile);

    match cli.command {
        Command::Scrape {
            source,
            city,
            quick_check,
            renderer,
        } => {
            setup_logging(cli.verbose, cli.quiet, Some(logfile.as_path()));
            let mut config = load_configuration(cli.config.as_deref())?;
            config.crawler.quick_check |= quick_check;
            if let Some(kind) = renderer {
                config.renderer.kind = kind;
            }
            handle_scrape(config, &source, &city, &dbfile).await
        }
        Command::Digest { n } => {
            setup_logging(cli.verbose, cli.quiet, None);
            let store = JsonStore::open(&dbfile)?;
            print_digest(&store, n);
            Ok(())
        }
        Command::Sources => {
            print_sources();
            Ok(())
        }
        Command::Clear => {
            setup_logging(cli.verbose, cli.quiet, None);
            handle_clear(&[logfile.as_path(), dbfile.as_path()])
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stdout and, when `logfile` is given, are also appended to it
/// without colors.
fn setup_logging(verbose: u8, quiet: bool, logfile: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("rentscraper=info,warn"),
                1 => EnvFilter::new("rentscraper=debug,info"),
                2 => EnvFilter::new("rentscraper=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    let file_layer = logfile.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();
}

/// Expands a leading `~` to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                PathBuf::from(home)
            } else {
                PathBuf::from(home).join(rest)
            }
        }
        _ => PathBuf::from(path),
    }
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the scrape command
///
/// The crawl races Ctrl-C and SIGTERM. Whichever way it ends (completion,
/// fatal error or signal) the store gets one final save before the process
/// exits.
async fn handle_scrape(config: Config, source: &str, city: &str, dbfile: &Path) -> anyhow::Result<()> {
    let extractor = match build_extractor(source) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("{}\n", e);
            print_sources();
            return Err(e.into());
        }
    };

    let mut store = JsonStore::open(dbfile)?;
    let loader = build_loader(&config.renderer)?;
    tracing::info!(
        "Scraping {} for '{}' with the {} renderer ({} records in store)",
        source,
        city,
        loader.name(),
        store.len()
    );

    let mut coordinator = Coordinator::new(
        config.crawler,
        extractor,
        loader,
        Box::new(LogObserver::new()),
        city,
    );

    match run_to_completion(&mut coordinator, &mut store, shutdown_signal()).await? {
        Some(report) => tracing::info!(
            "Done: {} records written, {} skipped, {} abandoned",
            report.records_written,
            report.skipped_existing,
            report.abandoned
        ),
        None => tracing::info!("Stopped early, progress saved"),
    }
    Ok(())
}

/// Completes on Ctrl-C, or on SIGTERM where the platform has it
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}

/// Handles the clear command
fn handle_clear(paths: &[&Path]) -> anyhow::Result<()> {
    for path in paths {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to delete {}", path.display()))?;
            tracing::info!("Deleted {}", path.display());
        }
    }
    Ok(())
}
