//! Note Annotator
//!
//! Keeps one labelled block per item inside a daily Markdown note:
//!
//! ```text
//! <!-- ebbing:begin math/limits.md -->
//! - [[math/limits.md]] math, due 2024-01-02
//! <!-- ebbing:end math/limits.md -->
//! ```
//!
//! Block edits are pure text functions so they can be tested without a
//! filesystem. Annotation never feeds back into scheduling.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

const MARKER_PREFIX: &str = "<!-- ebbing:";

/// Annotation failure
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The id cannot be embedded in a marker comment
    #[error("Item id cannot be used in a note marker: {0:?}")]
    InvalidId(String),
}

/// Receives item lifecycle events
pub trait NoteAnnotator {
    fn on_item_registered(&self, id: &str, labels: &[String]) -> Result<(), NoteError>;

    fn on_item_removed(&self, id: &str) -> Result<(), NoteError>;
}

/// Annotator that does nothing, used when no notes directory is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnnotator;

impl NoteAnnotator for NoopAnnotator {
    fn on_item_registered(&self, _id: &str, _labels: &[String]) -> Result<(), NoteError> {
        Ok(())
    }

    fn on_item_removed(&self, _id: &str) -> Result<(), NoteError> {
        Ok(())
    }
}

fn begin_marker(id: &str) -> String {
    format!("{}begin {} -->", MARKER_PREFIX, id)
}

fn end_marker(id: &str) -> String {
    format!("{}end {} -->", MARKER_PREFIX, id)
}

fn check_id(id: &str) -> Result<(), NoteError> {
    if id.trim().is_empty() || id.contains("-->") || id.contains('\n') || id.contains('\r') {
        return Err(NoteError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Byte range of the block for `id`, including the trailing newline
///
/// A begin marker whose end marker is missing, or only follows a later
/// begin marker, is an orphan: the block is just that marker's line.
fn find_block(text: &str, id: &str) -> Option<(usize, usize)> {
    let begin = begin_marker(id);
    let end = end_marker(id);
    let start = text.find(&begin)?;
    let after_begin = start + begin.len();
    let rest = &text[after_begin..];

    let end_at = match (rest.find(&end), rest.find(&begin)) {
        (Some(e), next) if next.is_none_or(|b| e < b) => after_begin + e + end.len(),
        _ => after_begin,
    };
    let end_at = if text[end_at..].starts_with('\n') {
        end_at + 1
    } else {
        end_at
    };
    Some((start, end_at))
}

fn render_block(id: &str, body: &str) -> String {
    let mut block = begin_marker(id);
    block.push('\n');
    let body = body.trim_end_matches('\n');
    if !body.is_empty() {
        block.push_str(body);
        block.push('\n');
    }
    block.push_str(&end_marker(id));
    block.push('\n');
    block
}

/// Replace the block for `id`, or append one
///
/// Applying the same body twice yields the same text.
pub fn upsert_block(text: &str, id: &str, body: &str) -> String {
    let block = render_block(id, body);
    match find_block(text, id) {
        Some((start, end)) => {
            let mut out = String::with_capacity(text.len() + block.len());
            out.push_str(&text[..start]);
            out.push_str(&block);
            out.push_str(&text[end..]);
            out
        }
        None => {
            let mut out = text.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&block);
            out
        }
    }
}

/// Delete the block for `id`; unchanged text when there is none
pub fn remove_block(text: &str, id: &str) -> String {
    match find_block(text, id) {
        Some((start, end)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..start]);
            out.push_str(&text[end..]);
            out
        }
        None => text.to_string(),
    }
}

/// Writes blocks into `<dir>/<YYYY-MM-DD>.md`
#[derive(Debug, Clone)]
pub struct MarkdownAnnotator {
    dir: PathBuf,
    today: NaiveDate,
}

impl MarkdownAnnotator {
    pub fn new(dir: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            dir: dir.into(),
            today,
        }
    }

    pub fn daily_note_path(&self) -> PathBuf {
        self.dir.join(format!("{}.md", self.today.format("%Y-%m-%d")))
    }

    fn read(path: &Path) -> Result<String, NoteError> {
        if !path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(path).map_err(|source| NoteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_if_changed(path: &Path, before: &str, after: &str) -> Result<bool, NoteError> {
        if before == after {
            return Ok(false);
        }
        let io_err = |source| NoteError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, after).map_err(io_err)?;
        Ok(true)
    }
}

impl NoteAnnotator for MarkdownAnnotator {
    fn on_item_registered(&self, id: &str, labels: &[String]) -> Result<(), NoteError> {
        check_id(id)?;
        let path = self.daily_note_path();
        let before = Self::read(&path)?;
        let body = if labels.is_empty() {
            format!("- [[{}]]", id)
        } else {
            format!("- [[{}]] {}", id, labels.join(", "))
        };
        let after = upsert_block(&before, id, &body);
        if Self::write_if_changed(&path, &before, &after)? {
            tracing::debug!(id, path = %path.display(), "Annotated daily note");
        }
        Ok(())
    }

    /// Strips the block from every daily note in the directory
    fn on_item_removed(&self, id: &str) -> Result<(), NoteError> {
        check_id(id)?;
        if !self.dir.is_dir() {
            return Ok(());
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|source| NoteError::Io {
            path: self.dir.clone(),
            source,
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let before = Self::read(&path)?;
            let after = remove_block(&before, id);
            if Self::write_if_changed(&path, &before, &after)? {
                tracing::debug!(id, path = %path.display(), "Removed note block");
            }
        }
        Ok(())
    }
}
