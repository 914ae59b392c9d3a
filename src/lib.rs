pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use adapters::{ConfiguredStore, InMemoryFile, JsonFileStore, LocalFile, RestStore};
pub use config::ImportConfig;
pub use crate::core::{engine::ImportEngine, summary::BatchSummary, template};
pub use domain::model::{ImportBatch, ImportResult, InsertOutcome, ScholarshipRecord};
pub use domain::ports::{ScholarshipStore, UploadedFile};
pub use utils::error::{ImportError, Result};
