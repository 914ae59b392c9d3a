use crate::adapters::{ConfiguredStore, JsonFileStore, RestStore};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "scholarships";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub store: StoreConfig,
    pub import: Option<ImportSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `rest` or `file`.
    pub r#type: String,
    pub endpoint: Option<String>,
    pub table: Option<String>,
    pub api_key: Option<String>,
    pub path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub upsert: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSettings {
    pub max_records: Option<usize>,
}

impl ImportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// A config that writes to a local JSON file.
    pub fn local_file(path: impl Into<String>, upsert: bool) -> Self {
        Self {
            store: StoreConfig {
                r#type: "file".to_string(),
                endpoint: None,
                table: None,
                api_key: None,
                path: Some(path.into()),
                timeout_seconds: None,
                upsert: Some(upsert),
            },
            import: None,
        }
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.store.r#type.as_str() {
            "rest" => {
                let endpoint = validate_required_field("store.endpoint", &self.store.endpoint)?;
                validate_url("store.endpoint", endpoint)?;
                validate_identifier("store.table", self.table())?;

                if let Some(key) = &self.store.api_key {
                    validate_non_empty_string("store.api_key", key)?;
                    if key.contains("${") {
                        return Err(ImportError::ConfigValidationError {
                            field: "store.api_key".to_string(),
                            message: format!("Unresolved environment variable in '{}'", key),
                        });
                    }
                }

                if let Some(timeout) = self.store.timeout_seconds {
                    validate_range("store.timeout_seconds", timeout, 1, 300)?;
                }
            }
            "file" => {
                let path = validate_required_field("store.path", &self.store.path)?;
                validate_path("store.path", path)?;
            }
            other => {
                return Err(ImportError::InvalidConfigValueError {
                    field: "store.type".to_string(),
                    value: other.to_string(),
                    reason: "Unsupported store type. Valid types: rest, file".to_string(),
                });
            }
        }

        if let Some(max_records) = self.max_records() {
            validate_positive_number("import.max_records", max_records, 1)?;
        }

        Ok(())
    }

    pub fn table(&self) -> &str {
        self.store.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn upsert(&self) -> bool {
        self.store.upsert.unwrap_or(false)
    }

    pub fn max_records(&self) -> Option<usize> {
        self.import.as_ref().and_then(|i| i.max_records)
    }

    pub fn build_store(&self) -> Result<ConfiguredStore> {
        self.validate_config()?;

        match self.store.r#type.as_str() {
            "rest" => {
                let endpoint = validate_required_field("store.endpoint", &self.store.endpoint)?;
                let store = RestStore::new(endpoint.clone(), self.table())
                    .with_api_key(self.store.api_key.clone())
                    .with_upsert(self.upsert())
                    .with_timeout(self.store.timeout_seconds.map(Duration::from_secs));
                Ok(ConfiguredStore::Rest(store))
            }
            _ => {
                let path = validate_required_field("store.path", &self.store.path)?;
                let store = JsonFileStore::new(path).with_upsert(self.upsert());
                Ok(ConfiguredStore::File(store))
            }
        }
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
