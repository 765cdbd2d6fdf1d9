use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("API returned an empty story")]
    EmptyResponse,

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

    #[error("Form is incomplete, missing: {}", missing.join(", "))]
    IncompleteForm { missing: Vec<String> },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StoryError::Api(_) | StoryError::ApiStatus { .. } | StoryError::EmptyResponse => {
                ErrorCategory::Network
            }
            StoryError::ConfigError { .. }
            | StoryError::ConfigValidationError { .. }
            | StoryError::InvalidConfigValueError { .. }
            | StoryError::MissingConfigError { .. } => ErrorCategory::Configuration,
            StoryError::IncompleteForm { .. } => ErrorCategory::Validation,
            StoryError::Io(_) => ErrorCategory::Io,
            StoryError::Serialization(_) | StoryError::InvalidState { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StoryError::IncompleteForm { .. } => ErrorSeverity::Low,
            StoryError::Api(_) | StoryError::ApiStatus { .. } | StoryError::EmptyResponse => {
                ErrorSeverity::Medium
            }
            StoryError::ConfigError { .. }
            | StoryError::ConfigValidationError { .. }
            | StoryError::InvalidConfigValueError { .. }
            | StoryError::MissingConfigError { .. }
            | StoryError::InvalidState { .. } => ErrorSeverity::High,
            StoryError::Io(_) | StoryError::Serialization(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            StoryError::Api(_) => "Could not reach the story service.".to_string(),
            StoryError::ApiStatus { status, .. } => {
                format!("The story service rejected the request (HTTP {}).", status)
            }
            StoryError::EmptyResponse => "The story service returned no story.".to_string(),
            StoryError::Io(e) => format!("A file or terminal operation failed: {}", e),
            StoryError::Serialization(_) => "Could not read the service response.".to_string(),
            StoryError::ConfigError { message } => format!("Configuration problem: {}", message),
            StoryError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            StoryError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            StoryError::MissingConfigError { field } => {
                format!("Setting '{}' is required but was not provided.", field)
            }
            StoryError::IncompleteForm { missing } => {
                format!("Please fill in: {}", missing.join(", "))
            }
            StoryError::InvalidState { message } => format!("Action not available: {}", message),
        }
    }

    /// 啟動階段失敗時的結束代碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Critical => 3,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the endpoint, API key and network connection, then submit again"
            }
            ErrorCategory::Configuration => {
                "Check the command-line flags or the TOML config file"
            }
            ErrorCategory::Validation => "Fill in every required field before submitting",
            ErrorCategory::Io => "Check file permissions and that the terminal is available",
            ErrorCategory::Internal => "Run again with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_form_message_lists_fields() {
        let err = StoryError::IncompleteForm {
            missing: vec!["Name".to_string(), "Reason".to_string()],
        };

        assert_eq!(err.to_string(), "Form is incomplete, missing: Name, Reason");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("Name, Reason"));
    }

    #[test]
    fn test_api_status_is_network_error() {
        let err = StoryError::ApiStatus {
            status: 503,
            body: "overloaded".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("503"));
        assert!(!err.user_friendly_message().contains("overloaded"));
    }

    #[test]
    fn test_config_errors_share_suggestion() {
        let missing = StoryError::MissingConfigError {
            field: "generator.model".to_string(),
        };
        let invalid = StoryError::InvalidConfigValueError {
            field: "generator.endpoint".to_string(),
            value: "nope".to_string(),
            reason: "Invalid URL format".to_string(),
        };

        assert_eq!(missing.severity(), ErrorSeverity::High);
        assert_eq!(missing.recovery_suggestion(), invalid.recovery_suggestion());
    }

    #[test]
    fn test_exit_code_by_severity() {
        let io = StoryError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let config = StoryError::ConfigError {
            message: "cannot read player-story.toml".to_string(),
        };

        assert_eq!(io.exit_code(), 3);
        assert_eq!(config.exit_code(), 1);
        assert_eq!(StoryError::EmptyResponse.exit_code(), 1);
    }
}
