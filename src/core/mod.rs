pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod summary;
pub mod template;

pub use crate::domain::model::{ImportBatch, ImportResult, InsertOutcome, ScholarshipRecord, StoreError};
pub use crate::domain::ports::{ScholarshipStore, UploadedFile};
pub use crate::utils::error::Result;
