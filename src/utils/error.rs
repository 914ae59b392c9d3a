use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Only JSON files are supported")]
    UnsupportedFileType { mime_type: String },

    #[error("Invalid JSON format")]
    MalformedJson(#[source] serde_json::Error),

    #[error("JSON must contain an array of scholarships")]
    InvalidShape,

    #[error("Error importing scholarships: {}", .message.as_deref().unwrap_or("Unknown error"))]
    PersistenceFailure { message: Option<String> },

    #[error("Import failed: {message}")]
    Unexpected { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        ImportError::Unexpected {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::UnsupportedFileType { .. }
            | ImportError::MalformedJson(_)
            | ImportError::InvalidShape => ErrorCategory::Input,
            ImportError::PersistenceFailure { .. } | ImportError::Http(_) => {
                ErrorCategory::Persistence
            }
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ImportError::Unexpected { .. }
            | ImportError::Io(_)
            | ImportError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Persistence => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::High,
        }
    }

    /// The free-text message shown to whoever started the import.
    ///
    /// Stage errors already carry their final wording; anything outside the
    /// import taxonomy is reported through the catch-all `Import failed:` form.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::UnsupportedFileType { .. }
            | ImportError::MalformedJson(_)
            | ImportError::InvalidShape
            | ImportError::PersistenceFailure { .. }
            | ImportError::Unexpected { .. } => self.to_string(),
            ImportError::Http(e) => format!("Import failed: {}", with_causes(e)),
            ImportError::Io(e) => format!("Import failed: {}", with_causes(e)),
            ImportError::Serialization(e) => format!("Import failed: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::UnsupportedFileType { .. } => {
                "Upload a file with the application/json content type"
            }
            ImportError::MalformedJson(_) => "Check the file with a JSON linter and try again",
            ImportError::InvalidShape => {
                "Wrap the scholarships in a top-level array; download the template for an example"
            }
            ImportError::PersistenceFailure { .. } => {
                "Check for duplicate ids or missing columns in the target table"
            }
            ImportError::Http(_) => "Check the store endpoint and your network connection",
            ImportError::Io(_) => "Check that the file exists and is readable",
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => "Fix the configuration file and rerun",
            ImportError::Unexpected { .. } | ImportError::Serialization(_) => {
                "Rerun with --verbose for details"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Joins an error with its `source()` chain, skipping causes the text already repeats.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
