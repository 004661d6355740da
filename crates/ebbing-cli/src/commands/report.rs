//! stats, calendar, readiness, backup

use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use colored::Colorize;
use ebbing_core::{
    ReviewSummary, completed_days, daily_review_counts, exam_readiness, mastery_ratio,
};
use serde_json::json;

use super::{load, lookback_start, print_header, print_json};
use crate::app::App;

pub fn run_stats(app: &App, days: u32, json: bool) -> anyhow::Result<()> {
    lookback_start(app.today, days)?;
    let items = load(app)?;
    let summary = ReviewSummary::compute(&items, app.today);
    let daily = daily_review_counts(&items, app.today, days);

    if json {
        return print_json(&json!({ "summary": summary, "daily": daily }));
    }

    print_header("Ebbing Review Statistics");
    println!("{}: {}", "Total Items".white().bold(), summary.total_items);
    println!("{}: {}", "Due Today".white().bold(), summary.due_today);
    println!("{}: {}", "Reviewed Today".white().bold(), summary.reviews_today);
    println!("{}: {}", "Total Reviews".white().bold(), summary.total_reviews);
    println!("{}: {}", "Mastered".white().bold(), summary.mastered);
    println!("{}: {}", "Unscheduled".white().bold(), summary.unscheduled);

    if !summary.by_performance.is_empty() {
        println!();
        println!("{}", "=== Performance Distribution ===".yellow().bold());
        for (label, count) in &summary.by_performance {
            print_distribution_bar(label, *count, summary.total_items);
        }
    }

    println!();
    println!(
        "{}",
        format!("=== Reviews, Last {} Days ===", days).magenta().bold()
    );
    let peak = daily.iter().map(|d| d.reviews).max().unwrap_or(0).max(1);
    for day in daily.iter().filter(|d| d.reviews > 0) {
        let filled = (day.reviews * 30).div_ceil(peak);
        println!(
            "  {} {:30} {:>4}",
            day.date,
            "#".repeat(filled).green(),
            day.reviews
        );
    }
    if daily.iter().all(|d| d.reviews == 0) {
        println!("{}", "No reviews recorded in this window.".dimmed());
    }
    Ok(())
}

/// Print a distribution bar
fn print_distribution_bar(label: &str, count: usize, total: usize) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));

    println!(
        "  {:15} [{:30}] {:>4} ({:>5.1}%)",
        label,
        bar.cyan(),
        count,
        percentage
    );
}

pub fn run_calendar(app: &App, days: u32, json: bool) -> anyhow::Result<()> {
    let start = lookback_start(app.today, days)?;
    let items = load(app)?;
    let completed = completed_days(&items, app.today, days);

    if json {
        return print_json(&json!({
            "from": start,
            "to": app.today,
            "completed": completed,
        }));
    }

    print_header("Ebbing Review Calendar");
    let done: HashSet<NaiveDate> = completed.iter().copied().collect();
    let reviewed: HashSet<NaiveDate> = items
        .iter()
        .flat_map(|item| item.review_history.iter().map(|entry| entry.date))
        .collect();

    // Align rows to Monday
    let first_monday = start - Duration::days(i64::from(start.weekday().num_days_from_monday()));

    println!("  {:10}  Mo Tu We Th Fr Sa Su", "");
    let mut week = first_monday;
    while week <= app.today {
        let mut row = String::new();
        for offset in 0..7 {
            let day = week + Duration::days(offset);
            let cell = if day < start || day > app.today {
                "  ".normal()
            } else if done.contains(&day) {
                "##".green().bold()
            } else if reviewed.contains(&day) {
                "oo".yellow()
            } else {
                "..".dimmed()
            };
            row.push_str(&format!(" {}", cell));
        }
        println!("  {}{}", week, row);
        week += Duration::days(7);
    }

    println!();
    println!(
        "{} {}   {} {}   {} {}",
        "##".green().bold(),
        "all due reviews done".dimmed(),
        "oo".yellow(),
        "some reviews".dimmed(),
        "..".dimmed(),
        "none".dimmed()
    );
    println!(
        "{}: {} of {} day(s)",
        "Completed".white().bold(),
        completed.len(),
        days + 1
    );
    Ok(())
}

pub fn run_readiness(app: &App, scores: &[f64], json: bool) -> anyhow::Result<()> {
    let items = load(app)?;
    let mastery = mastery_ratio(&items) * 100.0;
    let ers = exam_readiness(&items, scores, &app.config.readiness);

    if json {
        return print_json(&json!({
            "mastery": mastery,
            "examScores": scores,
            "readiness": ers,
        }));
    }

    print_header("Ebbing Exam Readiness");
    println!("{}: {:.1}%", "Mastery".white().bold(), mastery);
    if !scores.is_empty() {
        let shown: Vec<String> = scores.iter().map(|s| format!("{:.0}", s)).collect();
        println!("{}: {}", "Exam Scores".white().bold(), shown.join(", "));
    }
    let rendered = format!("{:.1}", ers);
    let styled = if ers >= 80.0 {
        rendered.green().bold()
    } else if ers >= 50.0 {
        rendered.yellow().bold()
    } else {
        rendered.red().bold()
    };
    println!("{}: {}", "Readiness".white().bold(), styled);
    println!();
    println!(
        "{}",
        format!("Pass --readiness {:.0} to 'ebbing review' under the ers policy.", ers).dimmed()
    );
    Ok(())
}

pub fn run_backup(app: &App, output: &Path) -> anyhow::Result<()> {
    print_header("Ebbing Backup");
    app.store.backup_to(output)?;

    let file_size = std::fs::metadata(output)?.len();
    let size_display = if file_size >= 1024 * 1024 {
        format!("{:.2} MB", file_size as f64 / (1024.0 * 1024.0))
    } else if file_size >= 1024 {
        format!("{:.1} KB", file_size as f64 / 1024.0)
    } else {
        format!("{} bytes", file_size)
    };

    println!("  {}   {}", "To:".dimmed(), output.display());
    println!("{}", format!("Backup complete ({})", size_display).green());
    Ok(())
}
