use crate::core::pipeline::{prepare_batch, submit};
use crate::core::{ImportBatch, ImportResult, ScholarshipStore, UploadedFile};
use crate::utils::error::Result;

/// Runs uploads through read, decode, shape check, normalization and submission.
///
/// Every run is independent; nothing is cached between calls.
pub struct ImportEngine<S: ScholarshipStore> {
    store: S,
    max_records: Option<usize>,
}

impl<S: ScholarshipStore> ImportEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_records: None,
        }
    }

    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Imports one upload. Every failure comes back as an unsuccessful `ImportResult`.
    pub async fn run<F: UploadedFile>(&self, file: &F) -> ImportResult {
        tracing::info!("Starting scholarship import");

        match self.try_run(file).await {
            Ok(count) => {
                tracing::info!("✅ Imported {} scholarships", count);
                ImportResult::imported(count)
            }
            Err(e) => {
                tracing::warn!(
                    "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                ImportResult::from(e)
            }
        }
    }

    /// Everything up to submission: the normalized batch a run would send.
    pub async fn prepare<F: UploadedFile>(&self, file: &F) -> Result<ImportBatch> {
        prepare_batch(file, self.max_records).await
    }

    async fn try_run<F: UploadedFile>(&self, file: &F) -> Result<usize> {
        let batch = self.prepare(file).await?;

        tracing::info!("Submitting {} scholarships...", batch.len());
        submit(&self.store, &batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InsertOutcome, ScholarshipRecord};
    use crate::utils::error::ImportError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MemoryFile {
        mime_type: &'static str,
        content: &'static str,
    }

    impl UploadedFile for MemoryFile {
        fn mime_type(&self) -> &str {
            self.mime_type
        }

        async fn text(&self) -> Result<String> {
            Ok(self.content.to_string())
        }
    }

    struct BrokenFile;

    impl UploadedFile for BrokenFile {
        fn mime_type(&self) -> &str {
            "application/json"
        }

        async fn text(&self) -> Result<String> {
            Err(ImportError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "upload interrupted",
            )))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        batches: Arc<Mutex<Vec<Vec<ScholarshipRecord>>>>,
    }

    #[async_trait::async_trait]
    impl ScholarshipStore for RecordingStore {
        async fn bulk_insert(&self, records: &[ScholarshipRecord]) -> Result<InsertOutcome> {
            self.batches.lock().await.push(records.to_vec());
            Ok(InsertOutcome::ok())
        }
    }

    struct UnreachableStore;

    #[async_trait::async_trait]
    impl ScholarshipStore for UnreachableStore {
        async fn bulk_insert(&self, _records: &[ScholarshipRecord]) -> Result<InsertOutcome> {
            Err(ImportError::unexpected("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_run_submits_normalized_batch() {
        let store = RecordingStore::default();
        let engine = ImportEngine::new(store.clone());
        let file = MemoryFile {
            mime_type: "application/json",
            content: r#"[{"id":"1","title":"A","fields":["CS"]},{"id":"2","benefits":"Tuition"}]"#,
        };

        let result = engine.run(&file).await;

        assert_eq!(result, ImportResult::imported(2));
        let batches = store.batches.lock().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].fields, vec![serde_json::json!("CS")]);
        assert!(batches[0][1].benefits.is_empty());
    }

    #[tokio::test]
    async fn test_run_never_submits_invalid_uploads() {
        let store = RecordingStore::default();
        let engine = ImportEngine::new(store.clone());

        let cases = [
            ("text/csv", "[]", "Only JSON files are supported"),
            ("application/json", "[{", "Invalid JSON format"),
            ("application/json", "{\"id\":\"1\"}", "JSON must contain an array of scholarships"),
        ];

        for (mime_type, content, message) in cases {
            let result = engine.run(&MemoryFile { mime_type, content }).await;
            assert_eq!(result, ImportResult::failure(message));
        }
        assert!(store.batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_empty_array_submits_nothing_but_succeeds() {
        let engine = ImportEngine::new(RecordingStore::default());
        let file = MemoryFile {
            mime_type: "application/json",
            content: "[]",
        };

        assert_eq!(engine.run(&file).await, ImportResult::imported(0));
    }

    #[tokio::test]
    async fn test_unexpected_faults_are_caught() {
        let engine = ImportEngine::new(RecordingStore::default());
        let result = engine.run(&BrokenFile).await;
        assert_eq!(result, ImportResult::failure("Import failed: upload interrupted"));

        let engine = ImportEngine::new(UnreachableStore);
        let file = MemoryFile {
            mime_type: "application/json",
            content: "[{\"id\":\"1\"}]",
        };
        let result = engine.run(&file).await;
        assert_eq!(result, ImportResult::failure("Import failed: connection refused"));
    }

    #[tokio::test]
    async fn test_max_records_guard() {
        let store = RecordingStore::default();
        let engine = ImportEngine::new(store.clone()).with_max_records(Some(1));
        let file = MemoryFile {
            mime_type: "application/json",
            content: r#"[{"id":"1"},{"id":"2"}]"#,
        };

        let result = engine.run(&file).await;

        assert_eq!(
            result,
            ImportResult::failure(
                "Import failed: batch of 2 records exceeds the configured limit of 1"
            )
        );
        assert!(store.batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_prepare_does_not_submit() {
        let store = RecordingStore::default();
        let engine = ImportEngine::new(store.clone());
        let file = MemoryFile {
            mime_type: "application/json",
            content: r#"[{"id":"1"}]"#,
        };

        let batch = engine.prepare(&file).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert!(store.batches.lock().await.is_empty());
    }
}
