//! Clap argument types and their mapping onto pipeline requests.

use clap::{Parser, ValueEnum};

use devdigest::models::DigestReport;
use devdigest::pipeline::{FailureReport, PreviewRequest};

/// Per-author daily development digests for a GitHub repository.
#[derive(Parser, Debug)]
#[command(name = "devdigest", version = devdigest::constants::VERSION)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `DEVDIGEST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Fetch a day's activity, build the digest, and store it.
    Run(RunArgs),

    /// Show a previously stored digest without contacting GitHub.
    Preview(PreviewArgs),

    /// Record a runtime failure against a commit.
    TrackError(TrackErrorArgs),

    /// Manage the local digest store.
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Repository selection shared by every digest command.
#[derive(clap::Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository owner (user or organisation).
    #[arg(long)]
    pub owner: String,

    /// Repository name.
    #[arg(long)]
    pub repo: String,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// GitHub token (default: config, DEVDIGEST_TOKEN, or GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,

    /// Day to digest as YYYY-MM-DD (default: yesterday, UTC).
    #[arg(long)]
    pub date: Option<String>,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Max concurrent per-PR file fetches.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Deadline in seconds for fetching from GitHub (0 disables it).
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the `preview` subcommand.
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Stored day to show, as YYYY-MM-DD.
    #[arg(long)]
    pub date: String,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

impl PreviewArgs {
    pub fn to_request(&self) -> PreviewRequest {
        PreviewRequest {
            owner: self.repo.owner.clone(),
            repo: self.repo.repo.clone(),
            date: self.date.clone(),
        }
    }
}

/// Arguments for the `track-error` subcommand.
#[derive(Parser, Debug)]
pub struct TrackErrorArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// SHA of the commit the failure is attributed to.
    #[arg(long = "commit")]
    pub commit_sha: String,

    /// Failure message.
    #[arg(long)]
    pub message: String,

    /// Day the failure belongs to (default: today, UTC).
    #[arg(long)]
    pub date: Option<String>,

    /// Endpoint that failed.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Service that reported the failure.
    #[arg(long)]
    pub service: Option<String>,
}

impl TrackErrorArgs {
    pub fn into_report(self) -> FailureReport {
        FailureReport {
            owner: self.repo.owner,
            repo: self.repo.repo,
            commit_sha: self.commit_sha,
            message: self.message,
            date: self.date,
            endpoint: self.endpoint,
            service: self.service,
        }
    }
}

/// Store management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum StoreAction {
    /// Show entry count and size.
    Stats {
        /// Limit to one group (digest, errors).
        #[arg(long)]
        group: Option<String>,
    },
    /// Print the store directory path.
    Path,
    /// Remove stored entries.
    Clear {
        /// Limit to one group (digest, errors).
        #[arg(long)]
        group: Option<String>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Text,
}

impl OutputFormat {
    /// Render a report using the renderer for this format.
    pub fn render(&self, report: &DigestReport) -> String {
        use devdigest::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => devdigest::output::terminal::TerminalRenderer.render(report),
            OutputFormat::Json => devdigest::output::json::JsonRenderer.render(report),
            OutputFormat::Text => devdigest::output::text::TextRenderer.render(report),
        }
    }
}
