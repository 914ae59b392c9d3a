use crate::core::{InsertOutcome, ScholarshipRecord, ScholarshipStore};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DUPLICATE_KEY_MESSAGE: &str =
    "duplicate key value violates unique constraint \"scholarships_pkey\"";

/// A JSON array on disk used as the scholarships table.
///
/// A batch is applied whole or not at all. In insert mode any `id` already
/// stored, or repeated inside the batch, rejects the batch; in upsert mode a
/// matching `id` replaces the stored record.
///
/// Clones share one lock, so concurrent imports through them are applied one
/// after the other. The table is replaced by renaming a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    upsert: bool,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            upsert: false,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<ScholarshipRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &[ScholarshipRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        let staging = self.staging_path();
        if let Err(e) = tokio::fs::write(&staging, json).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    /// `.<table file name>.tmp` next to the table, so the rename stays on one filesystem.
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| "scholarships.json".as_ref()));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn insert_all(stored: &mut Vec<ScholarshipRecord>, batch: &[ScholarshipRecord]) -> bool {
        let mut seen: HashSet<String> = stored
            .iter()
            .filter_map(|r| r.id().map(str::to_string))
            .collect();

        for record in batch {
            if let Some(id) = record.id() {
                if !seen.insert(id.to_string()) {
                    tracing::debug!("Duplicate id '{}' in batch", id);
                    return false;
                }
            }
        }

        stored.extend_from_slice(batch);
        true
    }

    fn upsert_all(stored: &mut Vec<ScholarshipRecord>, batch: &[ScholarshipRecord]) {
        for record in batch {
            let existing = record
                .id()
                .and_then(|id| stored.iter().position(|r| r.id() == Some(id)));

            match existing {
                Some(index) => stored[index] = record.clone(),
                None => stored.push(record.clone()),
            }
        }
    }
}

#[async_trait::async_trait]
impl ScholarshipStore for JsonFileStore {
    async fn bulk_insert(&self, records: &[ScholarshipRecord]) -> Result<InsertOutcome> {
        let _guard = self.lock.lock().await;
        let mut stored = self.load().await?;
        tracing::debug!(
            "{} holds {} scholarships before import",
            self.path.display(),
            stored.len()
        );

        if self.upsert {
            Self::upsert_all(&mut stored, records);
        } else if !Self::insert_all(&mut stored, records) {
            return Ok(InsertOutcome::failed(DUPLICATE_KEY_MESSAGE));
        }

        self.save(&stored).await?;
        Ok(InsertOutcome::ok())
    }
}
