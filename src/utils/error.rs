use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("Operation aborted by user")]
    AbortedError,

    #[error("No usable data found in {location}")]
    NoDataError { location: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KitError::InvalidInputError { .. } | KitError::AbortedError => ErrorCategory::Input,
            KitError::TomlError(_)
            | KitError::ConfigValidationError { .. }
            | KitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            KitError::CsvError(_)
            | KitError::NoDataError { .. }
            | KitError::ProcessingError { .. } => ErrorCategory::Data,
            KitError::IoError(_) | KitError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者主動結束不算失敗
            KitError::AbortedError => ErrorSeverity::Low,
            KitError::InvalidInputError { .. } | KitError::NoDataError { .. } => {
                ErrorSeverity::Medium
            }
            KitError::TomlError(_)
            | KitError::ConfigValidationError { .. }
            | KitError::InvalidConfigValueError { .. }
            | KitError::CsvError(_)
            | KitError::ProcessingError { .. } => ErrorSeverity::High,
            KitError::IoError(_) | KitError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            KitError::CsvError(_) => {
                "Check that the CSV header contains STATION_NAME and all twelve month columns"
                    .to_string()
            }
            KitError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the file or directory path exists relative to --base-dir".to_string()
            }
            KitError::IoError(_) => "Check file permissions and available disk space".to_string(),
            KitError::SerializationError(_) => "Report this as a bug".to_string(),
            KitError::TomlError(_) => {
                "Check the configuration file syntax (sections, quotes, and value types)".to_string()
            }
            KitError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' entry in the configuration file", field)
            }
            KitError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            KitError::InvalidInputError { .. } => "Re-run and enter a valid value".to_string(),
            KitError::AbortedError => "Re-run the command when ready".to_string(),
            KitError::NoDataError { .. } => {
                "Add CSV files named like <prefix>_<year>.csv to the data directory".to_string()
            }
            KitError::ProcessingError { .. } => "Check the input data".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KitError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            KitError::NoDataError { location } => {
                format!("No temperature data could be read from {}", location)
            }
            KitError::AbortedError => "Exiting the program.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KitError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, KitError>;
