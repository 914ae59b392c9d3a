use crate::domain::model::{InsertOutcome, ScholarshipRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// An uploaded file: a declared content type plus its text.
pub trait UploadedFile: Send + Sync {
    fn mime_type(&self) -> &str;
    fn text(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Bulk persistence for scholarships.
///
/// A rejected batch is reported through `InsertOutcome`; `Err` is reserved for
/// faults that kept the store from answering at all.
#[async_trait]
pub trait ScholarshipStore: Send + Sync {
    async fn bulk_insert(&self, records: &[ScholarshipRecord]) -> Result<InsertOutcome>;
}
