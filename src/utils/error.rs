use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    RenderError(#[from] askama::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Publish step '{step}' failed: {message}")]
    PublishError { step: String, message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Publishing,
    Presentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::HttpError(_) => ErrorCategory::Network,
            SyncError::IoError(_) | SyncError::SerializationError(_) => ErrorCategory::Storage,
            SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SyncError::PublishError { .. } => ErrorCategory::Publishing,
            SyncError::RenderError(_) | SyncError::ServerError { .. } => {
                ErrorCategory::Presentation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Publishing => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Presentation => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::HttpError(_) => "Check network connectivity and the source base_url",
            SyncError::IoError(_) => "Check that the output and static directories are writable",
            SyncError::SerializationError(_) => {
                "The publications file is not valid JSON; rerun the updater to regenerate it"
            }
            SyncError::RenderError(_) => "Check the page template and the [site] section",
            SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => {
                "Fix the configuration file and run `scholar-sync check`"
            }
            SyncError::PublishError { .. } => {
                "Make sure [publish] repository points at a git checkout with a usable remote"
            }
            SyncError::ServerError { .. } => "Check that the bind address is free",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::HttpError(_) => "Could not reach the remote service".to_string(),
            SyncError::IoError(e) => format!("File operation failed: {}", e),
            SyncError::SerializationError(_) => "Could not encode or decode publications JSON".to_string(),
            SyncError::RenderError(_) => "Could not render the profile page".to_string(),
            SyncError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            SyncError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            SyncError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            SyncError::PublishError { step, .. } => {
                format!("Publishing the refreshed file failed during '{}'", step)
            }
            SyncError::ServerError { message } => format!("Server failed: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
