use crate::core::normalize::normalize_records;
use crate::core::{ImportBatch, ScholarshipRecord, ScholarshipStore, UploadedFile};
use crate::utils::error::{ImportError, Result};
use serde_json::Value;

pub const JSON_MIME_TYPE: &str = "application/json";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads the whole upload, refusing anything not declared as JSON before touching its content.
///
/// A leading byte-order mark, as some editors save UTF-8 files, is dropped.
pub async fn read_file<F: UploadedFile>(file: &F) -> Result<String> {
    if file.mime_type() != JSON_MIME_TYPE {
        tracing::debug!("Rejecting upload with content type '{}'", file.mime_type());
        return Err(ImportError::UnsupportedFileType {
            mime_type: file.mime_type().to_string(),
        });
    }

    let mut text = file.text().await?;
    if text.starts_with(BYTE_ORDER_MARK) {
        text.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
    }
    tracing::debug!("Read {} bytes from upload", text.len());
    Ok(text)
}

pub fn decode_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        tracing::debug!("JSON decoding failed: {}", e);
        ImportError::MalformedJson(e)
    })
}

/// Only the top-level shape is checked. Per-record required fields are not enforced.
pub fn validate_shape(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => {
            tracing::debug!("Top-level JSON value is {}, expected an array", kind_of(&other));
            Err(ImportError::InvalidShape)
        }
    }
}

/// Read, decode, shape check and normalization, without submitting.
///
/// Records missing any of the expected attributes are logged, never rejected.
pub async fn prepare_batch<F: UploadedFile>(
    file: &F,
    max_records: Option<usize>,
) -> Result<ImportBatch> {
    tracing::info!("Reading upload...");
    let text = read_file(file).await?;

    tracing::info!("Decoding JSON...");
    let items = validate_shape(decode_json(&text)?)?;
    tracing::info!("Found {} scholarship entries", items.len());

    if let Some(limit) = max_records {
        if items.len() > limit {
            return Err(ImportError::unexpected(format!(
                "batch of {} records exceeds the configured limit of {}",
                items.len(),
                limit
            )));
        }
    }

    let batch = normalize_records(items);
    for (index, record) in batch.iter().enumerate() {
        let missing = record.missing_required_fields();
        if !missing.is_empty() {
            tracing::warn!(
                "Record {} ({}) is missing: {}",
                index,
                record.id().unwrap_or("no id"),
                missing.join(", ")
            );
        }
    }

    Ok(batch)
}

/// Hands the batch to the store and returns the submitted count on success.
///
/// The count is the batch length, not a figure confirmed by the store.
pub async fn submit<S>(store: &S, batch: &[ScholarshipRecord]) -> Result<usize>
where
    S: ScholarshipStore + ?Sized,
{
    tracing::debug!("Submitting {} records", batch.len());
    let outcome = store.bulk_insert(batch).await?;

    if outcome.success {
        return Ok(batch.len());
    }

    let message = outcome
        .error
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty());
    Err(ImportError::PersistenceFailure { message })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
