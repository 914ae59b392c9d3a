// Adapters layer: concrete uploads and scholarship stores.

pub mod json_file_store;
pub mod rest_store;
pub mod upload;

pub use json_file_store::JsonFileStore;
pub use rest_store::RestStore;
pub use upload::{InMemoryFile, LocalFile};

use crate::core::{InsertOutcome, ScholarshipRecord, ScholarshipStore};
use crate::utils::error::Result;

/// The store picked by configuration at startup.
pub enum ConfiguredStore {
    Rest(RestStore),
    File(JsonFileStore),
}

#[async_trait::async_trait]
impl ScholarshipStore for ConfiguredStore {
    async fn bulk_insert(&self, records: &[ScholarshipRecord]) -> Result<InsertOutcome> {
        match self {
            ConfiguredStore::Rest(store) => store.bulk_insert(records).await,
            ConfiguredStore::File(store) => store.bulk_insert(records).await,
        }
    }
}
