use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("No valid drawing found after {attempts} attempts ({failures} failed)")]
    Infeasible { attempts: u64, failures: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Drawing,
    Internal,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DrawError {
    pub fn config(message: impl Into<String>) -> Self {
        DrawError::ConfigError {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        DrawError::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DrawError::ConfigError { .. }
            | DrawError::ConfigValidationError { .. }
            | DrawError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DrawError::Infeasible { .. } => ErrorCategory::Drawing,
            DrawError::InvariantViolation { .. } => ErrorCategory::Internal,
            DrawError::IoError(_) | DrawError::CsvError(_) | DrawError::SerializationError(_) => {
                ErrorCategory::Io
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Drawing => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2, // 找不到有效抽籤
            ErrorSeverity::High => 1,   // 設定或檔案錯誤
            ErrorSeverity::Critical => 3, // 程式錯誤
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DrawError::Infeasible { .. } => {
                "Exclusions may leave no valid drawing. Remove some exclusions or history, or raise --max-attempts"
            }
            DrawError::InvariantViolation { .. } => {
                "This is a bug in polyanna. Please report it with the configuration used"
            }
            DrawError::CsvError(_) => "Check that the history file has a 'year,giver,recipient' header",
            DrawError::IoError(_) => "Check that the paths exist and are writable",
            _ => "Check the configuration file against the documented format",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DrawError::Infeasible { attempts, .. } => format!(
                "Could not find a valid drawing in {} attempts",
                attempts
            ),
            DrawError::InvariantViolation { message } => {
                format!("Internal error: {}", message)
            }
            other if other.is_configuration_error() => format!("Invalid configuration: {}", other),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DrawError::config("participant 'Ann' has no exclusion data");
        assert_eq!(
            err.to_string(),
            "Configuration error: participant 'Ann' has no exclusion data"
        );
        assert!(err.is_configuration_error());
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_infeasible_is_drawing_error() {
        let err = DrawError::Infeasible {
            attempts: 10,
            failures: 10,
        };
        assert_eq!(err.category(), ErrorCategory::Drawing);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("10 attempts"));
    }

    #[test]
    fn test_invariant_violation_is_critical() {
        let err = DrawError::invariant("removed 'Bob' twice");
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let infeasible = DrawError::Infeasible {
            attempts: 5,
            failures: 5,
        };
        assert_eq!(infeasible.exit_code(), 2);
        assert_eq!(DrawError::config("bad roster").exit_code(), 1);
        assert_eq!(DrawError::invariant("hat not empty").exit_code(), 3);
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(DrawError::from(io_err).exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DrawError = io_err.into();
        assert!(matches!(err, DrawError::IoError(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
