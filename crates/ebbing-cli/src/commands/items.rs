//! add, scan, remove

use anyhow::{Context, bail};
use colored::Colorize;
use ebbing_core::{ItemKind, PerformanceState, TrackableItem, register_new, scan_vault};
use serde_json::json;

use super::{load, position_of, print_header, print_json, save};
use crate::app::App;

pub fn run_add(
    app: &App,
    id: String,
    subject: Option<String>,
    kind: ItemKind,
    effort: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let id = id.trim().to_string();
    if id.is_empty() {
        bail!("Item id must not be empty");
    }
    let mut items = load(app)?;
    if items.iter().any(|item| item.id == id) {
        bail!("Item already tracked: {}", id);
    }

    let effort = effort.unwrap_or(app.config.default_expected_effort);
    if !(effort.is_finite() && effort > 0.0) {
        bail!("Expected effort must be positive, got {}", effort);
    }

    let mut item = TrackableItem::new(id, app.today, app.config.first_review_offset_days)
        .with_kind(kind)
        .with_expected_effort(effort)
        .with_performance(PerformanceState::initial(app.config.representation()));
    if let Some(subject) = subject {
        item = item.with_subject(subject);
    }

    items.push(item.clone());
    save(app, &items)?;
    tracing::info!(id = %item.id, "Registered item");
    app.annotate_registered(&item);

    if json {
        return print_json(&item);
    }
    println!(
        "{} {} (first review {})",
        "Added".green().bold(),
        item.display_name(),
        item.earliest_due()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

pub fn run_scan(app: &App, json: bool) -> anyhow::Result<()> {
    let Some(vault) = app.config.vault_path.clone() else {
        bail!("No vault configured; pass --vault, set EBBING_VAULT, or add vaultPath to the config file");
    };

    let notes = scan_vault(&vault).with_context(|| format!("scanning vault {}", vault.display()))?;
    let mut items = load(app)?;
    let created = register_new(&items, &notes, app.today, &app.config);

    if !created.is_empty() {
        items.extend(created.iter().cloned());
        save(app, &items)?;
        for item in &created {
            app.annotate_registered(item);
        }
    }
    tracing::info!(found = notes.len(), registered = created.len(), "Vault scan complete");

    if json {
        let ids: Vec<&str> = created.iter().map(|item| item.id.as_str()).collect();
        return print_json(&json!({
            "vault": vault,
            "notesFound": notes.len(),
            "registered": ids,
        }));
    }

    print_header("Ebbing Vault Scan");
    println!("{}: {}", "Vault".white().bold(), vault.display());
    println!("{}: {}", "Notes Found".white().bold(), notes.len());
    println!("{}: {}", "Newly Tracked".white().bold(), created.len());
    for item in &created {
        println!("  {} {}", "+".green(), item.id);
    }
    Ok(())
}

pub fn run_remove(app: &App, id: &str, json: bool) -> anyhow::Result<()> {
    let mut items = load(app)?;
    let index = position_of(&items, id)?;
    let removed = items.remove(index);
    save(app, &items)?;
    tracing::info!(id = %removed.id, "Removed item");
    app.annotate_removed(&removed.id);

    if json {
        return print_json(&json!({ "removed": removed.id }));
    }
    println!("{} {}", "Removed".yellow().bold(), removed.display_name());
    Ok(())
}
