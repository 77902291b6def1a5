mod offline;
mod online;

pub use offline::OfflineBackend;
pub use online::OnlineBackend;

use crate::config::{get_api_base_url, AppMode};
use futures::future::LocalBoxFuture;
use shared::api::Snapshot;
use shared::store::{HistoryEntry, NewHistoryEntry, StoreError};
use shared::wheel::WheelOption;
use std::rc::Rc;

pub type StoreFuture<T> = LocalBoxFuture<'static, Result<T, StoreError>>;

/// Where the option list and history live. Picked once at startup.
pub trait WheelBackend {
    fn mode(&self) -> AppMode;
    fn snapshot(&self) -> StoreFuture<Snapshot>;
    fn add_option(&self, label: String) -> StoreFuture<WheelOption>;
    fn remove_option(&self, id: String) -> StoreFuture<()>;
    fn append_history(&self, entry: NewHistoryEntry) -> StoreFuture<HistoryEntry>;
    fn clear_history(&self) -> StoreFuture<()>;
}

/// Shared handle passed down as a prop. Equality is identity.
#[derive(Clone)]
pub struct BackendHandle(pub Rc<dyn WheelBackend>);

impl PartialEq for BackendHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for BackendHandle {
    type Target = dyn WheelBackend;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

pub fn connect(mode: AppMode) -> BackendHandle {
    match mode {
        AppMode::Online => BackendHandle(Rc::new(OnlineBackend::new(get_api_base_url()))),
        AppMode::Offline => BackendHandle(Rc::new(OfflineBackend::load())),
    }
}
