use anyhow::Result;
use async_trait::async_trait;
use scholarship_import::{
    template, ImportEngine, ImportResult, InMemoryFile, InsertOutcome, JsonFileStore, LocalFile,
    ScholarshipRecord, ScholarshipStore,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

#[derive(Clone)]
struct MockStore {
    outcome: InsertOutcome,
    submitted: Arc<Mutex<Vec<ScholarshipRecord>>>,
}

impl MockStore {
    fn succeeding() -> Self {
        Self::with_outcome(InsertOutcome::ok())
    }

    fn with_outcome(outcome: InsertOutcome) -> Self {
        Self {
            outcome,
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ScholarshipStore for MockStore {
    async fn bulk_insert(
        &self,
        records: &[ScholarshipRecord],
    ) -> scholarship_import::Result<InsertOutcome> {
        self.submitted.lock().await.extend_from_slice(records);
        Ok(self.outcome.clone())
    }
}

#[tokio::test]
async fn test_import_single_record_succeeds() {
    let store = MockStore::succeeding();
    let engine = ImportEngine::new(store.clone());
    let file = InMemoryFile::json(r#"[{"id":"1","title":"A","fields":["CS"]}]"#);

    let result = engine.run(&file).await;

    assert_eq!(
        result,
        ImportResult {
            success: true,
            message: "Successfully imported 1 scholarships".to_string()
        }
    );

    let submitted = store.submitted.lock().await;
    assert_eq!(
        serde_json::to_value(&submitted[0]).unwrap(),
        json!({"id": "1", "title": "A", "fields": ["CS"], "benefits": [], "requirements": []})
    );
}

#[tokio::test]
async fn test_import_reports_store_error() {
    let store = MockStore::with_outcome(InsertOutcome::failed("duplicate key"));
    let engine = ImportEngine::new(store);
    let file = InMemoryFile::json(r#"[{"id":"1","title":"A","fields":["CS"]}]"#);

    let result = engine.run(&file).await;

    assert_eq!(
        result,
        ImportResult {
            success: false,
            message: "Error importing scholarships: duplicate key".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_json_upload_is_rejected() {
    let store = MockStore::succeeding();
    let engine = ImportEngine::new(store.clone());

    for mime in ["text/csv", "text/plain", "application/xml"] {
        let result = engine.run(&InMemoryFile::new(mime, "[]")).await;
        assert_eq!(result, ImportResult::failure("Only JSON files are supported"));
    }
    assert!(store.submitted.lock().await.is_empty());
}

#[tokio::test]
async fn test_invalid_json_and_wrong_shape() {
    let engine = ImportEngine::new(MockStore::succeeding());

    let result = engine.run(&InMemoryFile::json("[{\"id\": \"1\",]")).await;
    assert_eq!(result, ImportResult::failure("Invalid JSON format"));

    for text in [r#"{"id":"1"}"#, r#""scholarships""#, "3", "null"] {
        let result = engine.run(&InMemoryFile::json(text)).await;
        assert_eq!(
            result,
            ImportResult::failure("JSON must contain an array of scholarships")
        );
    }
}

#[tokio::test]
async fn test_records_missing_expected_fields_are_still_submitted() {
    let store = MockStore::succeeding();
    let engine = ImportEngine::new(store.clone());
    let file = InMemoryFile::json(r#"[{"title":"No id or country"},{"benefits":"Tuition"}]"#);

    let result = engine.run(&file).await;

    assert_eq!(result, ImportResult::imported(2));
    let submitted = store.submitted.lock().await;
    assert_eq!(submitted.len(), 2);
    assert!(submitted[1].benefits.is_empty());
}

#[tokio::test]
async fn test_local_file_into_json_file_store() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let upload_path = temp_dir.path().join("batch.json");
    let store_path = temp_dir.path().join("db/scholarships.json");

    tokio::fs::write(
        &upload_path,
        r#"[
            {"id": "a", "title": "Alpha", "fields": ["Physics"], "requirements": "none"},
            {"id": "b", "title": "Beta", "benefits": ["Stipend"]}
        ]"#,
    )
    .await?;

    let engine = ImportEngine::new(JsonFileStore::new(&store_path));
    let result = engine.run(&LocalFile::new(&upload_path)).await;
    assert_eq!(result, ImportResult::imported(2));

    let stored = engine.store().load().await?;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].fields, vec![json!("Physics")]);
    assert!(stored[0].requirements.is_empty());
    assert_eq!(stored[1].benefits, vec![json!("Stipend")]);

    // Re-importing the same ids is rejected as a whole.
    let result = engine.run(&LocalFile::new(&upload_path)).await;
    assert_eq!(
        result,
        ImportResult::failure(
            "Error importing scholarships: duplicate key value violates unique constraint \"scholarships_pkey\""
        )
    );
    assert_eq!(engine.store().load().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_byte_order_mark_is_ignored() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let upload_path = temp_dir.path().join("excel-export.json");
    let store_path = temp_dir.path().join("scholarships.json");
    tokio::fs::write(&upload_path, "\u{feff}[{\"id\":\"1\"}]").await?;

    let engine = ImportEngine::new(JsonFileStore::new(&store_path));
    let result = engine.run(&LocalFile::new(&upload_path)).await;

    assert_eq!(result.message, "Successfully imported 1 scholarships");
    assert!(result.success);
    assert_eq!(engine.store().load().await?[0].id(), Some("1"));
    Ok(())
}

#[tokio::test]
async fn test_missing_upload_is_caught() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ImportEngine::new(MockStore::succeeding());

    let result = engine
        .run(&LocalFile::new(temp_dir.path().join("gone.json")))
        .await;

    assert!(!result.success);
    assert!(result.message.starts_with("Import failed: "));
}

#[tokio::test]
async fn test_template_round_trips_through_import() {
    let store = MockStore::succeeding();
    let engine = ImportEngine::new(store.clone());
    let file = InMemoryFile::json(template::to_pretty_json().unwrap());

    let result = engine.run(&file).await;

    assert_eq!(result, ImportResult::imported(1));
    assert_eq!(*store.submitted.lock().await, template::generate());
}
