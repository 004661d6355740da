//! Vault discovery
//!
//! A vault is a directory of subject folders, each holding Markdown
//! notes. Only one level is scanned: `<vault>/<subject>/<note>.md`.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EbbingConfig;
use crate::item::{ItemKind, PerformanceState, TrackableItem};

/// A note found in the vault
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteFile {
    /// Vault-relative path with `/` separators
    pub id: String,
    /// Name of the containing folder
    pub subject: String,
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List every note one level under each subject folder, sorted by id
pub fn scan_vault(root: &Path) -> std::io::Result<Vec<NoteFile>> {
    let mut notes = Vec::new();

    for folder in std::fs::read_dir(root)? {
        let folder = folder?;
        if !folder.file_type()?.is_dir() {
            continue;
        }
        let subject = folder.file_name().to_string_lossy().into_owned();
        if is_hidden(&subject) {
            continue;
        }

        for entry in std::fs::read_dir(folder.path())? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() || !is_markdown(&path) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            notes.push(NoteFile {
                id: format!("{}/{}", subject, file_name),
                subject: subject.clone(),
            });
        }
    }

    notes.sort();
    tracing::debug!(root = %root.display(), count = notes.len(), "Scanned vault");
    Ok(notes)
}

/// Items for notes that are not tracked yet
///
/// New items start in the configured policy's representation and are
/// first due `first_review_offset_days` after `today`.
pub fn register_new(
    items: &[TrackableItem],
    notes: &[NoteFile],
    today: NaiveDate,
    config: &EbbingConfig,
) -> Vec<TrackableItem> {
    let mut known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    let performance = PerformanceState::initial(config.representation());

    let mut created = Vec::new();
    for note in notes {
        if !known.insert(note.id.as_str()) {
            continue;
        }
        created.push(
            TrackableItem::new(&note.id, today, config.first_review_offset_days)
                .with_subject(&note.subject)
                .with_kind(ItemKind::KnowledgePoint)
                .with_expected_effort(config.default_expected_effort)
                .with_performance(performance),
        );
    }
    created
}
