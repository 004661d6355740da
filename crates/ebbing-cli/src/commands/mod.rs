//! Command implementations
//!
//! Each `run_*` loads what it needs from the [`App`], prints either text
//! or JSON, and saves the collection back when it changed it.

mod items;
mod report;
mod review;

use anyhow::bail;
use chrono::NaiveDate;
use colored::Colorize;
use ebbing_core::{ItemStore, TrackableItem, shift_days};

use crate::Commands;
use crate::app::App;

pub fn run(app: &App, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Add {
            id,
            subject,
            kind,
            effort,
        } => items::run_add(app, id, subject, kind, effort, json),
        Commands::Scan => items::run_scan(app, json),
        Commands::Remove { id } => items::run_remove(app, &id, json),
        Commands::Due { subject } => review::run_due(app, subject.as_deref(), json),
        Commands::Review {
            id,
            rating,
            effort,
            readiness,
        } => review::run_review(app, &id, rating, effort, readiness, json),
        Commands::Preview { id, readiness } => review::run_preview(app, &id, readiness, json),
        Commands::Stats { days } => report::run_stats(app, days, json),
        Commands::Calendar { days } => report::run_calendar(app, days, json),
        Commands::Readiness { scores } => report::run_readiness(app, &scores, json),
        Commands::Backup { output } => report::run_backup(app, &output),
        Commands::Config => print_json(&app.config),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(title: &str) {
    println!("{}", format!("=== {} ===", title).cyan().bold());
    println!();
}

/// Index of the item with `id`, or an error naming it
fn position_of(items: &[TrackableItem], id: &str) -> anyhow::Result<usize> {
    match items.iter().position(|item| item.id == id) {
        Some(index) => Ok(index),
        None => bail!("Item not found: {}", id),
    }
}

/// Longest look-back `stats` and `calendar` accept
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// First day of a `days`-long look-back ending on `today`
fn lookback_start(today: NaiveDate, days: u32) -> anyhow::Result<NaiveDate> {
    if days > MAX_LOOKBACK_DAYS {
        bail!("--days {} exceeds the maximum of {}", days, MAX_LOOKBACK_DAYS);
    }
    match shift_days(today, -i64::from(days)) {
        Some(start) => Ok(start),
        None => bail!("--days {} reaches before the earliest supported date", days),
    }
}

fn load(app: &App) -> anyhow::Result<Vec<TrackableItem>> {
    Ok(app.store.load()?)
}

fn save(app: &App, items: &[TrackableItem]) -> anyhow::Result<()> {
    app.store.save(items)?;
    Ok(())
}
