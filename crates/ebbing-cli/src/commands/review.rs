//! due, review, preview

use colored::Colorize;
use ebbing_core::{
    EbbingConfig, PolicyKind, Rating, ReviewEvent, TrackableItem, due_items, exam_readiness,
};
use serde_json::json;

use super::{load, position_of, print_header, print_json, save};
use crate::app::App;

pub fn run_due(app: &App, subject: Option<&str>, json: bool) -> anyhow::Result<()> {
    let items = load(app)?;
    let due: Vec<&TrackableItem> = due_items(&items, app.today)
        .into_iter()
        .filter(|item| subject.is_none() || item.subject.as_deref() == subject)
        .collect();

    if json {
        return print_json(&due);
    }

    print_header(&format!("Due for Review on {}", app.today));
    if due.is_empty() {
        println!("{}", "Nothing due. All caught up!".green());
        return Ok(());
    }

    println!(
        "  {:12} {:40} {:16} {:12}",
        "Subject".bold(),
        "Item".bold(),
        "Status".bold(),
        "Last Review".bold()
    );
    for item in &due {
        let last = item
            .last_review_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Never".to_string());
        let overdue = item.earliest_due().is_some_and(|d| d < app.today);
        let name = if overdue {
            item.display_name().red().to_string()
        } else {
            item.display_name().to_string()
        };
        println!(
            "  {:12} {:40} {:16} {:12}",
            item.subject.as_deref().unwrap_or("-"),
            name,
            item.performance.label(),
            last
        );
    }
    println!();
    println!("{} {}", due.len().to_string().bold(), "item(s) due".dimmed());
    Ok(())
}

/// Readiness to schedule with: the flag if given, otherwise under the
/// readiness policy the collection's own mastery-based score
fn effective_readiness(config: &EbbingConfig, items: &[TrackableItem], flag: Option<f64>) -> Option<f64> {
    match (flag, config.policy) {
        (Some(score), _) => Some(score),
        (None, PolicyKind::Ers) => Some(exam_readiness(items, &[], &config.readiness)),
        (None, _) => None,
    }
}

fn print_readiness(readiness: Option<f64>, from_flag: bool) {
    if let Some(score) = readiness {
        let source = if from_flag { "given" } else { "from collection mastery" };
        println!("  {}", format!("readiness {:.1} ({})", score, source).dimmed());
    }
}

pub fn run_review(
    app: &App,
    id: &str,
    rating: Rating,
    effort: Option<f64>,
    readiness: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut items = load(app)?;
    let index = position_of(&items, id)?;
    let from_flag = readiness.is_some();
    let readiness = effective_readiness(&app.config, &items, readiness);

    let mut event = ReviewEvent::new(rating);
    if let Some(effort) = effort {
        event = event.with_effort(effort);
    }
    if let Some(readiness) = readiness {
        event = event.with_readiness(readiness);
    }

    let outcome = app.scheduler().record_review(&items[index], &event, app.today)?;
    let next = outcome.next_review();
    items[index] = outcome.item.clone();
    save(app, &items)?;
    tracing::info!(id, rating = %rating, next = ?next, readiness = ?readiness, "Recorded review");

    if json {
        return print_json(&json!({
            "item": outcome.item,
            "baseDays": outcome.base_days,
            "multiplier": outcome.multiplier,
            "intervalDays": outcome.interval_days,
            "nextReview": next,
            "readiness": readiness,
        }));
    }

    println!(
        "{} {} as {}",
        "Reviewed".green().bold(),
        outcome.item.display_name(),
        rating.to_string().bold()
    );
    match (next, outcome.interval_days) {
        (Some(date), Some(days)) => {
            println!("  {}: {} (in {} day(s))", "Next Review".white().bold(), date, days);
            if let Some(base) = outcome.base_days {
                println!(
                    "  {}",
                    format!("base {} day(s) x {:.2}", base, outcome.multiplier).dimmed()
                );
            }
        }
        (Some(date), None) => println!("  {}: {}", "Next Review".white().bold(), date),
        (None, _) => println!("  {}", "Retired: no further reviews scheduled".yellow()),
    }
    print_readiness(readiness, from_flag);
    Ok(())
}

pub fn run_preview(app: &App, id: &str, readiness: Option<f64>, json: bool) -> anyhow::Result<()> {
    let items = load(app)?;
    let item = &items[position_of(&items, id)?];
    let from_flag = readiness.is_some();
    let readiness = effective_readiness(&app.config, &items, readiness);
    let preview = app.scheduler().preview(item, app.today, readiness)?;

    if json {
        let rows: Vec<_> = preview
            .iter()
            .map(|(rating, next)| json!({ "rating": rating, "nextReview": next, "readiness": readiness }))
            .collect();
        return print_json(&rows);
    }

    print_header(&format!("Preview for {}", item.display_name()));
    for (rating, next) in &preview {
        let next = match next {
            Some(date) => {
                let days = (*date - app.today).num_days();
                format!("{} (+{}d)", date, days)
            }
            None => "retired".dimmed().to_string(),
        };
        println!("  {:16} {}", rating.to_string(), next);
    }
    print_readiness(readiness, from_flag);
    Ok(())
}
