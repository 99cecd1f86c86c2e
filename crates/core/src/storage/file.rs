use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::performance::PortfolioPerformance;
use super::traits::{sort_newest_first, HistoryStore};

/// Current history file format version.
pub const CURRENT_VERSION: u16 = 1;

/// On-disk layout of the history file (pretty-printed JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryFile {
    pub version: u16,

    /// Id handed to the next created record. Never reused, even if the
    /// file is edited by hand and records are removed.
    pub next_id: i64,

    pub records: Vec<PortfolioPerformance>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl HistoryFile {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize history: {e}")))
    }

    /// Parse JSON bytes and check the format version.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let file: HistoryFile = serde_json::from_slice(data)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse history file: {e}")))?;
        if file.version != CURRENT_VERSION {
            return Err(CoreError::Deserialization(format!(
                "Unsupported history file version: {}",
                file.version
            )));
        }
        Ok(file)
    }
}

/// History store backed by a local JSON file.
///
/// Every operation reads the file; `create` rewrites it through a temporary
/// sibling and a rename so a crash never leaves a half-written file.
/// A missing file reads as an empty history.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HistoryFile, CoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => HistoryFile::from_bytes(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HistoryFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, file: &HistoryFile) -> Result<(), CoreError> {
        let bytes = file.to_bytes()?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn list(&self) -> Result<Vec<PortfolioPerformance>, CoreError> {
        let mut summaries: Vec<PortfolioPerformance> = self
            .load()?
            .records
            .iter()
            .map(PortfolioPerformance::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn get(&self, id: i64) -> Result<PortfolioPerformance, CoreError> {
        self.load()?
            .records
            .into_iter()
            .find(|r| r.id == Some(id))
            .ok_or(CoreError::HistoryNotFound(id))
    }

    async fn create(
        &self,
        performance: &PortfolioPerformance,
    ) -> Result<PortfolioPerformance, CoreError> {
        let mut file = self.load()?;
        let id = file.next_id;
        let stored = performance.with_id(id);
        file.records.push(stored.clone());
        file.next_id = id + 1;
        self.save(&file)?;
        Ok(stored)
    }
}
