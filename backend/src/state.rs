use crate::persistence::{DataFile, StoredCollections};
use shared::api::Snapshot;
use shared::store::{HistorySink, MemoryHistoryStore, MemoryOptionStore, OptionSource};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub struct Collections {
    pub foods: MemoryOptionStore,
    pub history: MemoryHistoryStore,
}

impl Collections {
    pub fn to_stored(&self) -> StoredCollections {
        StoredCollections {
            foods: self.foods.list(),
            history: self.history.list(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    collections: Arc<Mutex<Collections>>,
    revision: Arc<AtomicU64>,
    data_file: Option<DataFile>,
}

impl AppState {
    pub fn new(
        mut foods: MemoryOptionStore,
        mut history: MemoryHistoryStore,
        data_file: Option<DataFile>,
    ) -> Self {
        let revision = Arc::new(AtomicU64::new(0));

        let counter = revision.clone();
        foods.on_change(Box::new(move |options| {
            let rev = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!("Foods changed: {} options (revision {})", options.len(), rev);
        }));

        let counter = revision.clone();
        history.on_change(Box::new(move |entries| {
            let rev = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!("History changed: {} entries (revision {})", entries.len(), rev);
        }));

        Self {
            collections: Arc::new(Mutex::new(Collections { foods, history })),
            revision,
            data_file,
        }
    }

    /// Seeds from the data file when one exists, otherwise from the default options.
    pub async fn load(data_file: Option<DataFile>) -> Result<Self, crate::error::Error> {
        let stored = match &data_file {
            Some(file) => file.load().await?,
            None => None,
        };

        let (foods, history) = match stored {
            Some(stored) => {
                tracing::info!(
                    "Loaded {} foods and {} history entries",
                    stored.foods.len(),
                    stored.history.len()
                );
                (
                    MemoryOptionStore::with_options(stored.foods),
                    MemoryHistoryStore::with_entries(stored.history),
                )
            }
            None => (MemoryOptionStore::with_defaults(), MemoryHistoryStore::new()),
        };

        Ok(Self::new(foods, history, data_file))
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub async fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().await
    }

    pub async fn snapshot(&self) -> Snapshot {
        let collections = self.lock().await;
        Snapshot {
            revision: self.revision(),
            foods: collections.foods.list(),
            history: collections.history.list(),
        }
    }

    /// Rewrites the data file. Callers keep the collections locked until this returns so
    /// writes land in mutation order. Failures are logged only; memory stays the source of truth.
    pub async fn persist(&self, stored: StoredCollections) {
        let Some(file) = &self.data_file else {
            return;
        };
        if let Err(e) = file.save(&stored).await {
            tracing::error!("Failed to write {}: {}", file.path().display(), e);
        }
    }
}
