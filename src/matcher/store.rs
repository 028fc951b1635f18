use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::media::MediaKey;
use super::source::CandidateFile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Media store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the write, e.g. access to the file was denied
    #[error("Media store rejected {key}: {reason}")]
    Rejected { key: String, reason: String },
}

/// A file association as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub file_name: String,
    pub path: PathBuf,
    pub linked_at: DateTime<Utc>,
}

impl StoredMedia {
    pub fn from_candidate(file: &CandidateFile) -> Self {
        Self {
            file_name: file.name.clone(),
            path: file.path.clone(),
            linked_at: Utc::now(),
        }
    }
}

/// Key-value capability the matcher persists file associations through
#[cfg_attr(test, mockall::automock)]
pub trait MediaStore {
    fn put(&mut self, key: &MediaKey, file: &CandidateFile) -> Result<(), StoreError>;

    fn get(&self, key: &MediaKey) -> Result<Option<StoredMedia>, StoreError>;

    fn delete(&mut self, key: &MediaKey) -> Result<(), StoreError>;
}

/// Media store backed by a single JSON file, rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredMedia>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened media store");
        Ok(Self { path, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `entries` to disk and only then adopt them, so a failed write
    /// leaves the store as it was
    fn commit(&mut self, entries: BTreeMap<String, StoredMedia>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)?;
        self.entries = entries;
        Ok(())
    }
}

impl MediaStore for JsonFileStore {
    fn put(&mut self, key: &MediaKey, file: &CandidateFile) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), StoredMedia::from_candidate(file));
        self.commit(entries)
    }

    fn get(&self, key: &MediaKey) -> Result<Option<StoredMedia>, StoreError> {
        Ok(self.entries.get(&key.to_string()).cloned())
    }

    fn delete(&mut self, key: &MediaKey) -> Result<(), StoreError> {
        let key = key.to_string();
        if !self.entries.contains_key(&key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(&key);
        self.commit(entries)
    }
}
