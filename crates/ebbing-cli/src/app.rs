//! Shared command context: effective config, store and annotator

use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use ebbing_core::storage;
use ebbing_core::{
    EbbingConfig, ItemStore, JsonStore, MarkdownAnnotator, NoopAnnotator, NoteAnnotator,
    Scheduler, SqliteStore, StoreKind, TrackableItem,
};

use crate::GlobalArgs;

/// The configured Item Store backend
pub enum Backend {
    Sqlite(SqliteStore),
    Json(JsonStore),
}

impl Backend {
    pub fn open(config: &EbbingConfig) -> anyhow::Result<Self> {
        let path = config.store_path()?;
        let backend = match config.store {
            StoreKind::Sqlite => Backend::Sqlite(
                SqliteStore::open(&path)
                    .with_context(|| format!("opening item store {}", path.display()))?,
            ),
            StoreKind::Json => Backend::Json(JsonStore::new(path)),
        };
        Ok(backend)
    }

    /// Write a consistent copy of the store to `output`
    pub fn backup_to(&self, output: &Path) -> anyhow::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        match self {
            Backend::Sqlite(store) => store.backup_to(output)?,
            Backend::Json(store) => {
                let items = store.load()?;
                JsonStore::new(output).save(&items)?;
            }
        }
        Ok(())
    }
}

impl ItemStore for Backend {
    fn load(&self) -> storage::Result<Vec<TrackableItem>> {
        match self {
            Backend::Sqlite(store) => store.load(),
            Backend::Json(store) => store.load(),
        }
    }

    fn save(&self, items: &[TrackableItem]) -> storage::Result<()> {
        match self {
            Backend::Sqlite(store) => store.save(items),
            Backend::Json(store) => store.save(items),
        }
    }
}

pub struct App {
    pub config: EbbingConfig,
    pub store: Backend,
    pub annotator: Box<dyn NoteAnnotator>,
    pub today: NaiveDate,
}

impl App {
    pub fn from_args(args: &GlobalArgs) -> anyhow::Result<Self> {
        let config = effective_config(args)?;
        let today = args.today.unwrap_or_else(|| Local::now().date_naive());
        let store = Backend::open(&config)?;

        let annotator: Box<dyn NoteAnnotator> = match &config.notes_dir {
            Some(dir) => Box::new(MarkdownAnnotator::new(dir, today)),
            None => Box::new(NoopAnnotator),
        };

        Ok(Self {
            config,
            store,
            annotator,
            today,
        })
    }

    pub fn scheduler(&self) -> Scheduler {
        self.config.scheduler()
    }

    /// Notify the annotator; failures never abort the command
    pub fn annotate_registered(&self, item: &TrackableItem) {
        let mut labels = Vec::new();
        if let Some(subject) = &item.subject {
            labels.push(subject.clone());
        }
        if let Some(due) = item.earliest_due() {
            labels.push(format!("due {}", due));
        }
        if let Err(e) = self.annotator.on_item_registered(&item.id, &labels) {
            tracing::warn!("Failed to annotate {}: {}", item.id, e);
        }
    }

    pub fn annotate_removed(&self, id: &str) {
        if let Err(e) = self.annotator.on_item_removed(id) {
            tracing::warn!("Failed to remove annotation for {}: {}", id, e);
        }
    }
}

/// Config file, then environment, then flags
pub fn effective_config(args: &GlobalArgs) -> anyhow::Result<EbbingConfig> {
    let mut config = match &args.config {
        Some(path) => EbbingConfig::load(path)?,
        None => match EbbingConfig::default_path() {
            Ok(path) => EbbingConfig::load_or_default(&path)?,
            Err(e) => {
                tracing::debug!("No default config location: {}", e);
                EbbingConfig::default()
            }
        },
    };
    config.apply_env()?;
    apply_flags(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_flags(config: &mut EbbingConfig, args: &GlobalArgs) {
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(store) = args.store {
        config.store = store;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(vault) = &args.vault {
        config.vault_path = Some(vault.clone());
    }
    if let Some(notes) = &args.notes_dir {
        config.notes_dir = Some(notes.clone());
    }
}
