use thiserror::Error;

#[derive(Error, Debug)]
pub enum NimbusError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    CliError(#[from] clap::Error),

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

    #[error("Missing required value: {field}")]
    MissingConfigError { field: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: String, name: String },

    #[error("Location directory doesn't exist: {path}")]
    LocationMissing { path: String },

    #[error("Incompatible data: {message}")]
    IncompatibleData { message: String },

    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    #[error("Sensor error: {message}")]
    SensorError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
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

impl NimbusError {
    pub fn not_found(kind: &str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.into(),
        }
    }

    pub fn already_exists(kind: &str, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.to_string(),
            name: name.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CliError(_)
            | Self::NotFound { .. }
            | Self::AlreadyExists { .. }
            | Self::Unsupported { .. } => ErrorCategory::Input,
            Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::IncompatibleData { .. } => ErrorCategory::Data,
            Self::IoError(_) | Self::LocationMissing { .. } | Self::SensorError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unsupported { .. } => ErrorSeverity::Low,
            Self::NotFound { .. } | Self::AlreadyExists { .. } | Self::LocationMissing { .. } => {
                ErrorSeverity::Medium
            }
            Self::IoError(_) | Self::IncompatibleData { .. } | Self::SensorError { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system operation failed: {}", e),
            Self::SerializationError(e) => format!("Stored data could not be read or written: {}", e),
            Self::CliError(e) => e.to_string(),
            Self::LocationMissing { path } => format!("Location '{}' doesn't exist", path),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::SerializationError(_) | Self::IncompatibleData { .. } => {
                "Inspect the data cache with `nimbus cache get`, or remove the offending key".to_string()
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the config file (see --config) and try again".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => format!("Provide a valid value for '{}'", field),
            Self::MissingConfigError { field } => format!("Provide a value for '{}'", field),
            Self::NotFound { kind, .. } => format!("List the existing {} entries and check the name", kind),
            Self::AlreadyExists { .. } => "Pick another name or remove the existing entry first".to_string(),
            Self::LocationMissing { .. } => "Create the directory or edit the location".to_string(),
            Self::Unsupported { .. } => "This operation isn't available".to_string(),
            Self::SensorError { .. } => "Try again with --test to use dummy sensors".to_string(),
            Self::CsvError(_) => "Check the output path".to_string(),
            Self::CliError(_) => "Run with --help to see the usage".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NimbusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_and_category() {
        let err = NimbusError::not_found("Backup", "home");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Backup 'home' not found");

        let err = NimbusError::unsupported("backup engine");
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = NimbusError::IoError(std::io::Error::other("disk"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::System);
    }
}
