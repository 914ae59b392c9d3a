use crate::config::toml_config::{ImportConfig, ImportSettings};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_positive_number, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scholarship-import")]
#[command(about = "Validate, normalize and bulk-import scholarship records")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a JSON array of scholarships
    Import(ImportArgs),
    /// Write the example scholarship file
    Template(TemplateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// JSON file to import
    pub file: PathBuf,

    /// Declared content type; guessed from the extension when omitted
    #[arg(long)]
    pub mime: Option<String>,

    /// TOML file describing the target store
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Import into a local JSON file instead of a configured store
    #[arg(long, conflicts_with = "config")]
    pub store_file: Option<String>,

    /// Replace records whose id already exists
    #[arg(long)]
    pub upsert: bool,

    /// Refuse batches larger than this
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Validate and summarize without submitting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Where to write the template; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ImportArgs {
    /// The store configuration for this run, with command-line overrides applied.
    ///
    /// `None` when neither `--config` nor `--store-file` was given.
    pub fn store_config(&self) -> Result<Option<ImportConfig>> {
        let mut config = if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            ImportConfig::from_file(path)?
        } else if let Some(path) = &self.store_file {
            ImportConfig::local_file(path.clone(), false)
        } else {
            return Ok(None);
        };

        if self.upsert {
            config.store.upsert = Some(true);
            tracing::info!("🔧 Upsert mode enabled from command line");
        }

        if let Some(max_records) = self.max_records {
            config.import.get_or_insert_with(ImportSettings::default).max_records =
                Some(max_records);
        }

        Ok(Some(config))
    }
}

impl Validate for ImportArgs {
    fn validate(&self) -> Result<()> {
        validate_path("file", &self.file.to_string_lossy())?;

        if let Some(mime) = &self.mime {
            validate_non_empty_string("mime", mime)?;
        }

        if let Some(path) = &self.store_file {
            validate_path("store_file", path)?;
        }

        if let Some(max_records) = self.max_records {
            validate_positive_number("max_records", max_records, 1)?;
        }

        Ok(())
    }
}
