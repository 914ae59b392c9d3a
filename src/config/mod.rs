#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, ImportArgs, TemplateArgs};
pub use toml_config::{ImportConfig, ImportSettings, StoreConfig};
