use crate::validation::{format_date, validate_date, validate_label};
use crate::wheel::{WheelOption, MIN_OPTIONS};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of history entries kept, most recent first.
pub const HISTORY_LIMIT: usize = 20;

pub const DEFAULT_OPTIONS: [&str; 5] = ["Pizza", "Hamburguesa", "Tacos", "Sushi", "Pasta"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub label: String,
}

impl HistoryEntry {
    pub fn display_date(&self) -> String {
        format_date(&self.date)
    }
}

/// A result waiting to be recorded; the store assigns the id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub date: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    MinimumOptionsViolation,
    DuplicateLabel(String),
    InvalidLabel,
    InvalidDate(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "no entry with id '{}'", id),
            StoreError::MinimumOptionsViolation => {
                write!(f, "the wheel needs at least {} options", MIN_OPTIONS)
            }
            StoreError::DuplicateLabel(label) => write!(f, "'{}' is already on the wheel", label),
            StoreError::InvalidLabel => write!(f, "option names must be 1 to 40 characters"),
            StoreError::InvalidDate(date) => write!(f, "'{}' is not a YYYY-MM-DD date", date),
            StoreError::Backend(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for StoreError {}

pub type SubscriptionId = u64;
pub type ChangeCallback<T> = Box<dyn FnMut(&[T]) + Send>;

/// Change listeners. Only notified after a mutation went through.
struct Subscribers<T> {
    next_id: SubscriptionId,
    callbacks: Vec<(SubscriptionId, ChangeCallback<T>)>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }
}

impl<T> Subscribers<T> {
    fn add(&mut self, callback: ChangeCallback<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    fn notify(&mut self, items: &[T]) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(items);
        }
    }
}

/// Where the wheel's options live.
pub trait OptionSource {
    fn list(&self) -> Vec<WheelOption>;
    fn add(&mut self, label: &str) -> Result<WheelOption, StoreError>;
    fn remove(&mut self, id: &str) -> Result<(), StoreError>;
    fn on_change(&mut self, callback: ChangeCallback<WheelOption>) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Where accepted results are recorded. `list` is newest first, at most `HISTORY_LIMIT` long.
pub trait HistorySink {
    fn list(&self) -> Vec<HistoryEntry>;
    fn append(&mut self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
    fn on_change(&mut self, callback: ChangeCallback<HistoryEntry>) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

#[derive(Default)]
pub struct MemoryOptionStore {
    options: Vec<WheelOption>,
    subscribers: Subscribers<WheelOption>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Vec<WheelOption>) -> Self {
        Self {
            options,
            subscribers: Subscribers::default(),
        }
    }

    /// The starter list used when nothing has been saved yet.
    pub fn with_defaults() -> Self {
        let options = DEFAULT_OPTIONS
            .iter()
            .enumerate()
            .map(|(i, label)| WheelOption::new(format!("off{}", i + 1), *label))
            .collect();
        Self::with_options(options)
    }

    pub fn options(&self) -> &[WheelOption] {
        &self.options
    }

    pub fn contains_label(&self, label: &str) -> bool {
        let wanted = label.trim().to_lowercase();
        self.options
            .iter()
            .any(|option| option.label.to_lowercase() == wanted)
    }
}

impl OptionSource for MemoryOptionStore {
    fn list(&self) -> Vec<WheelOption> {
        self.options.clone()
    }

    fn add(&mut self, label: &str) -> Result<WheelOption, StoreError> {
        validate_label(label).map_err(|_| StoreError::InvalidLabel)?;
        let label = label.trim();
        if self.contains_label(label) {
            return Err(StoreError::DuplicateLabel(label.to_string()));
        }

        let option = WheelOption::new(Uuid::new_v4().to_string(), label);
        self.options.push(option.clone());
        log::debug!("Added option '{}' ({})", option.label, option.id);
        self.subscribers.notify(&self.options);
        Ok(option)
    }

    fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        if self.options.len() <= MIN_OPTIONS {
            return Err(StoreError::MinimumOptionsViolation);
        }
        let index = self
            .options
            .iter()
            .position(|option| option.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = self.options.remove(index);
        log::debug!("Removed option '{}' ({})", removed.label, removed.id);
        self.subscribers.notify(&self.options);
        Ok(())
    }

    fn on_change(&mut self, callback: ChangeCallback<WheelOption>) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Vec<HistoryEntry>,
    subscribers: Subscribers<HistoryEntry>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores saved entries, re-sorting them newest first and enforcing the cap.
    pub fn with_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(HISTORY_LIMIT);
        Self {
            entries,
            subscribers: Subscribers::default(),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl HistorySink for MemoryHistoryStore {
    fn list(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    fn append(&mut self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        validate_date(&entry.date).map_err(|_| StoreError::InvalidDate(entry.date.clone()))?;
        validate_label(&entry.label).map_err(|_| StoreError::InvalidLabel)?;

        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            date: entry.date,
            label: entry.label.trim().to_string(),
        };
        // ISO dates sort lexicographically; ties put the latest append first.
        let position = self
            .entries
            .iter()
            .position(|existing| existing.date <= entry.date)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry.clone());
        if self.entries.len() > HISTORY_LIMIT {
            let evicted = self.entries.len() - HISTORY_LIMIT;
            self.entries.truncate(HISTORY_LIMIT);
            log::debug!("History over capacity, evicted {} entries", evicted);
        }

        self.subscribers.notify(&self.entries);
        Ok(entry)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.subscribers.notify(&self.entries);
        Ok(())
    }

    fn on_change(&mut self, callback: ChangeCallback<HistoryEntry>) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn entry(date: &str, label: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            date: date.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let store = MemoryOptionStore::with_defaults();
        let labels: Vec<_> = store.list().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, DEFAULT_OPTIONS);
        assert_eq!(store.options()[0].id, "off1");
    }

    #[test]
    fn test_add_trims_and_rejects_duplicates() {
        let mut store = MemoryOptionStore::with_defaults();
        let added = store.add("  Ramen ").unwrap();
        assert_eq!(added.label, "Ramen");
        assert_eq!(store.list().last(), Some(&added));

        assert_eq!(
            store.add("pizza"),
            Err(StoreError::DuplicateLabel("pizza".to_string()))
        );
        assert_eq!(store.add("   "), Err(StoreError::InvalidLabel));
        assert_eq!(store.list().len(), 6);
    }

    #[test]
    fn test_remove_keeps_minimum() {
        let mut store = MemoryOptionStore::new();
        let a = store.add("A").unwrap();
        store.add("B").unwrap();
        let before = store.list();

        assert_eq!(store.remove(&a.id), Err(StoreError::MinimumOptionsViolation));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut store = MemoryOptionStore::with_defaults();
        assert_eq!(
            store.remove("missing"),
            Err(StoreError::NotFound("missing".to_string()))
        );
        store.remove("off3").unwrap();
        assert!(!store.contains_label("Tacos"));
    }

    #[test]
    fn test_option_subscribers_only_see_successful_changes() {
        let mut store = MemoryOptionStore::new();
        let last_len = Arc::new(AtomicUsize::new(0));
        let seen = last_len.clone();
        let id = store.on_change(Box::new(move |options| {
            seen.store(options.len(), Ordering::SeqCst);
        }));

        store.add("A").unwrap();
        store.add("B").unwrap();
        assert_eq!(last_len.load(Ordering::SeqCst), 2);

        last_len.store(0, Ordering::SeqCst);
        let _ = store.add("a");
        let _ = store.remove("whatever");
        assert_eq!(last_len.load(Ordering::SeqCst), 0);

        assert!(store.unsubscribe(id));
        store.add("C").unwrap();
        assert_eq!(last_len.load(Ordering::SeqCst), 0);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_subscriber_may_own_unshared_state() {
        let mut store = MemoryOptionStore::with_defaults();
        let (tx, rx) = std::sync::mpsc::channel();
        // A `Cell` makes the callback `!Sync`; stores only ever call it through `&mut self`.
        let calls = std::cell::Cell::new(0u32);
        store.on_change(Box::new(move |options| {
            calls.set(calls.get() + 1);
            let _ = tx.send((calls.get(), options.len()));
        }));

        store.add("Ramen").unwrap();
        store.remove("off1").unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![(1, 6), (2, 5)]);
    }

    #[test]
    fn test_history_retention() {
        let mut history = MemoryHistoryStore::new();
        for day in 1..=28 {
            history
                .append(entry(&format!("2024-03-{:02}", day), &format!("meal {}", day)))
                .unwrap();
        }

        let entries = history.list();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].date, "2024-03-28");
        assert_eq!(entries[HISTORY_LIMIT - 1].date, "2024-03-09");
        assert!(entries.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[test]
    fn test_history_orders_by_date_then_recency() {
        let mut history = MemoryHistoryStore::new();
        history.append(entry("2024-01-10", "Tacos")).unwrap();
        history.append(entry("2024-01-12", "Sushi")).unwrap();
        history.append(entry("2024-01-11", "Pasta")).unwrap();
        history.append(entry("2024-01-12", "Pizza")).unwrap();

        let labels: Vec<_> = history.list().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["Pizza", "Sushi", "Pasta", "Tacos"]);
    }

    #[test]
    fn test_history_rejects_bad_date() {
        let mut history = MemoryHistoryStore::new();
        assert_eq!(
            history.append(entry("12/01/2024", "Tacos")),
            Err(StoreError::InvalidDate("12/01/2024".to_string()))
        );
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_history_clear_notifies() {
        let mut history = MemoryHistoryStore::new();
        history.append(entry("2024-01-10", "Tacos")).unwrap();
        let cleared = Arc::new(AtomicUsize::new(usize::MAX));
        let seen = cleared.clone();
        history.on_change(Box::new(move |entries| {
            seen.store(entries.len(), Ordering::SeqCst);
        }));

        history.clear().unwrap();
        assert_eq!(cleared.load(Ordering::SeqCst), 0);
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_restore_sorts_and_caps() {
        let entries = (1..=25)
            .map(|day| HistoryEntry {
                id: format!("h{}", day),
                date: format!("2024-04-{:02}", day),
                label: "Pizza".to_string(),
            })
            .collect();
        let history = MemoryHistoryStore::with_entries(entries);
        assert_eq!(history.entries().len(), HISTORY_LIMIT);
        assert_eq!(history.entries()[0].id, "h25");
    }

    #[test]
    fn test_display_date() {
        let entry = HistoryEntry {
            id: "h1".to_string(),
            date: "2024-12-31".to_string(),
            label: "Sushi".to_string(),
        };
        assert_eq!(entry.display_date(), "31/12/2024");
    }
}
