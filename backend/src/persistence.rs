use crate::error::Error;
use serde::{Deserialize, Serialize};
use shared::store::HistoryEntry;
use shared::wheel::WheelOption;
use std::path::{Path, PathBuf};

/// On-disk form of both collections.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StoredCollections {
    pub foods: Vec<WheelOption>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub async fn load(&self) -> Result<Option<StoredCollections>, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored = serde_json::from_slice(&bytes)?;
        Ok(Some(stored))
    }

    /// Writes to a sibling temp file first so a crash never leaves half a document behind.
    pub async fn save(&self, collections: &StoredCollections) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(collections)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
