//! devdigest — per-author daily development digests (CLI).
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use devdigest::config;
use devdigest::env;
use devdigest::logging;
use devdigest::models;
use devdigest::pipeline;
use devdigest::source;
use devdigest::store;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Command, PreviewArgs, RunArgs, StoreAction, TrackErrorArgs};
use config::Config;
use env::Env;
use models::DigestReport;
use pipeline::{DigestError, DigestPipeline, RunRequest};
use source::github::GithubConnector;
use store::{FileStore, KvStore};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        process::exit(report_error(&err));
    }
}

/// Print `err` for the user and pick the exit status.
///
/// Upstream and storage detail goes to the log; the user sees a generic line.
fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DigestError>() {
        Some(e) if e.is_client_error() => {
            eprintln!("Error: {}", e.public_message());
            2
        }
        Some(e) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {}", e.public_message());
            1
        }
        None => {
            eprintln!("Error: {err:#}");
            1
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    logging::init(cli.verbose, &env);

    let work_dir = std::env::current_dir().ok();
    let config = Config::load(work_dir.as_deref(), &env).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Run(args) => run_digest(args, config).await,
        Command::Preview(args) => run_preview(args, config).await,
        Command::TrackError(args) => run_track_error(args, config).await,
        Command::Store { action } => run_store(action, &config),
    }
}

/// Build a pipeline over the configured file store and GitHub endpoint.
fn build_pipeline(config: &Config) -> Result<DigestPipeline> {
    let dir = config.store_dir()?;
    let store: Arc<dyn KvStore> = Arc::new(FileStore::new(dir));
    let connector = Arc::new(GithubConnector {
        api_url: config.source.api_url.clone(),
        user_agent: config.source.user_agent.clone(),
    });
    Ok(DigestPipeline::new(connector, store, config.source.fetch_options()))
}

/// Fetch, aggregate, store, and print one day's digest.
async fn run_digest(args: RunArgs, mut config: Config) -> Result<()> {
    // Layer 1: CLI flags
    if let Some(token) = args.token {
        config.source.token = Some(token);
    }
    if let Some(n) = args.max_concurrent {
        config.source.max_concurrent = n;
    }
    if let Some(secs) = args.timeout {
        config.source.timeout_secs = secs;
    }

    let pipeline = build_pipeline(&config)?;
    let report = pipeline
        .run(RunRequest {
            owner: args.repo.owner,
            repo: args.repo.repo,
            credential: config.source.token.clone().unwrap_or_default(),
            date: args.date,
        })
        .await?;

    print!("{}", args.format.render(&report));
    Ok(())
}

/// Print a stored digest without contacting GitHub.
async fn run_preview(args: PreviewArgs, config: Config) -> Result<()> {
    let pipeline = build_pipeline(&config)?;
    match pipeline.preview(args.to_request()).await? {
        Some(snapshot) => print!("{}", args.format.render(&DigestReport::from_stored(snapshot))),
        None => println!(
            "No digest stored for {}/{} on {}.",
            args.repo.owner, args.repo.repo, args.date
        ),
    }
    Ok(())
}

/// Append a failure to a commit's journal.
async fn run_track_error(args: TrackErrorArgs, config: Config) -> Result<()> {
    let pipeline = build_pipeline(&config)?;
    let sha = args.commit_sha.clone();
    let ack = pipeline.record_failure(args.into_report()).await?;
    println!("Recorded failure for {sha} ({} on record).", ack.count);
    Ok(())
}

/// Manage the local store.
fn run_store(action: StoreAction, config: &Config) -> Result<()> {
    let store = FileStore::new(config.store_dir()?);

    match action {
        StoreAction::Clear { group } => {
            let stats = store
                .clear(group.as_deref())
                .context("failed to clear store")?;
            println!(
                "Cleared {} stored entry/entries ({}).",
                stats.entries,
                stats.human_size(),
            );
        }
        StoreAction::Stats { group } => {
            let stats = store
                .stats(group.as_deref())
                .context("failed to read store stats")?;
            println!("Store entries: {}", stats.entries);
            println!("Store size:    {}", stats.human_size());
        }
        StoreAction::Path => println!("{}", store.path().display()),
    }

    Ok(())
}
