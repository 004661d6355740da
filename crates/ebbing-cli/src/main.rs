//! Ebbing CLI
//!
//! Terminal front-end for the review scheduler. Every command loads the
//! collection, does its work, and saves it back.
//!
//! Configuration precedence, lowest first: config file, `EBBING_*`
//! environment variables, command-line flags.

mod app;
mod commands;

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ebbing_core::{ItemKind, PolicyKind, StoreKind};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::app::App;

/// Ebbing - spaced-repetition review scheduler for study notes
#[derive(Parser)]
#[command(name = "ebbing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spaced-repetition review scheduler for study notes")]
#[command(long_about = "Ebbing schedules reviews of study notes along the forgetting curve.\n\nItems come from a vault of subject folders or are added by hand; each review rating moves the next review date.")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (JSON); defaults to the platform config directory
    #[arg(long, global = true, env = "EBBING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the item store
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Store backend: sqlite or json
    #[arg(long, global = true, value_parser = parse_store)]
    pub store: Option<StoreKind>,

    /// Scheduling policy: categorical, confidence or ers
    #[arg(long, global = true)]
    pub policy: Option<PolicyKind>,

    /// Note vault with one folder per subject
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Directory of daily notes to annotate
    #[arg(long, global = true)]
    pub notes_dir: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start tracking an item
    Add {
        /// Item id, usually the vault-relative note path
        id: String,
        /// Subject the item belongs to
        #[arg(long)]
        subject: Option<String>,
        /// task, stage, knowledge_point or problem
        #[arg(long, default_value = "knowledge_point")]
        kind: ItemKind,
        /// Expected effort per review, in minutes
        #[arg(long)]
        effort: Option<f64>,
    },

    /// Register every untracked note in the vault
    Scan,

    /// List items due for review
    Due {
        /// Only show this subject
        #[arg(long)]
        subject: Option<String>,
    },

    /// Record a review
    Review {
        /// Item id
        id: String,
        /// proficient | not_proficient | forgotten | 1-5 | mastered | unmastered
        rating: ebbing_core::Rating,
        /// Minutes actually spent
        #[arg(long)]
        effort: Option<f64>,
        /// Exam readiness score 0-100 (ers policy)
        #[arg(long)]
        readiness: Option<f64>,
    },

    /// Show the next date each rating would produce
    Preview {
        /// Item id
        id: String,
        /// Exam readiness score 0-100 (ers policy)
        #[arg(long)]
        readiness: Option<f64>,
    },

    /// Stop tracking an item
    Remove {
        /// Item id
        id: String,
    },

    /// Collection totals and daily review counts
    Stats {
        /// Days of history to chart
        #[arg(long, default_value = "30", value_parser = lookback_days)]
        days: u32,
    },

    /// Days on which every due review was done
    Calendar {
        /// Days to look back
        #[arg(long, default_value = "60", value_parser = lookback_days)]
        days: u32,
    },

    /// Exam readiness from mastery and recent exam scores
    Readiness {
        /// Exam scores (0-100), oldest first
        scores: Vec<f64>,
    },

    /// Write a consistent copy of the item store
    Backup {
        /// Output file path for the backup
        output: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn lookback_days(value: &str) -> Result<u32, String> {
    let days: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of days", value))?;
    if days > commands::MAX_LOOKBACK_DAYS {
        return Err(format!("at most {} days, got {}", commands::MAX_LOOKBACK_DAYS, days));
    }
    Ok(days)
}

fn parse_store(value: &str) -> Result<StoreKind, String> {
    match value.trim().to_lowercase().as_str() {
        "sqlite" | "db" => Ok(StoreKind::Sqlite),
        "json" => Ok(StoreKind::Json),
        other => Err(format!("unknown store '{}', expected sqlite or json", other)),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let app = App::from_args(&cli.global)?;
    tracing::debug!(today = %app.today, policy = %app.config.policy, "Starting");

    commands::run(&app, cli.command, cli.global.json)
}
