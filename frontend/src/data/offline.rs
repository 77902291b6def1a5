use super::{StoreFuture, WheelBackend};
use crate::config::AppMode;
use futures::future::{self, FutureExt};
use gloo::storage::{LocalStorage, Storage};
use shared::api::Snapshot;
use shared::store::{
    HistoryEntry, HistorySink, MemoryHistoryStore, MemoryOptionStore, NewHistoryEntry,
    OptionSource, StoreError,
};
use shared::wheel::WheelOption;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const FOODS_KEY: &str = "wheel_foods";
const HISTORY_KEY: &str = "wheel_history";

/// Keeps both collections in memory and mirrors every change into localStorage.
pub struct OfflineBackend {
    foods: RefCell<MemoryOptionStore>,
    history: RefCell<MemoryHistoryStore>,
    revision: Arc<AtomicU64>,
}

impl OfflineBackend {
    pub fn load() -> Self {
        let mut foods = match LocalStorage::get::<Vec<WheelOption>>(FOODS_KEY) {
            Ok(saved) if !saved.is_empty() => MemoryOptionStore::with_options(saved),
            _ => MemoryOptionStore::with_defaults(),
        };
        let mut history = LocalStorage::get::<Vec<HistoryEntry>>(HISTORY_KEY)
            .map(MemoryHistoryStore::with_entries)
            .unwrap_or_default();

        let revision = Arc::new(AtomicU64::new(0));

        let counter = revision.clone();
        foods.on_change(Box::new(move |options| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Err(e) = LocalStorage::set(FOODS_KEY, options) {
                log::warn!("Failed to save foods: {:?}", e);
            }
        }));

        let counter = revision.clone();
        history.on_change(Box::new(move |entries| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Err(e) = LocalStorage::set(HISTORY_KEY, entries) {
                log::warn!("Failed to save history: {:?}", e);
            }
        }));

        Self {
            foods: RefCell::new(foods),
            history: RefCell::new(history),
            revision,
        }
    }
}

impl WheelBackend for OfflineBackend {
    fn mode(&self) -> AppMode {
        AppMode::Offline
    }

    fn snapshot(&self) -> StoreFuture<Snapshot> {
        let snapshot = Snapshot {
            revision: self.revision.load(Ordering::SeqCst),
            foods: self.foods.borrow().list(),
            history: self.history.borrow().list(),
        };
        future::ready(Ok(snapshot)).boxed_local()
    }

    fn add_option(&self, label: String) -> StoreFuture<WheelOption> {
        let result = self.foods.borrow_mut().add(&label);
        future::ready(result).boxed_local()
    }

    fn remove_option(&self, id: String) -> StoreFuture<()> {
        let result = self.foods.borrow_mut().remove(&id);
        future::ready(result).boxed_local()
    }

    fn append_history(&self, entry: NewHistoryEntry) -> StoreFuture<HistoryEntry> {
        let result = self.history.borrow_mut().append(entry);
        future::ready(result).boxed_local()
    }

    fn clear_history(&self) -> StoreFuture<()> {
        let result: Result<(), StoreError> = self.history.borrow_mut().clear();
        future::ready(result).boxed_local()
    }
}
