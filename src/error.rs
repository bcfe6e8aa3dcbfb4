//! Error handling for name-forge

use thiserror::Error;

/// Main error type for name-forge
#[derive(Error, Debug, Clone)]
pub enum NameForgeError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Pipeline error ({pipeline}): {message}")]
    Pipeline { pipeline: String, message: String },

    #[error("Predicate error in '{stage}': {message}")]
    Predicate { stage: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NameForgeError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a pipeline (generation strategy) error
    pub fn pipeline(pipeline: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            pipeline: pipeline.into(),
            message: message.into(),
        }
    }

    /// Create a predicate error raised by a gate or filter stage
    pub fn predicate(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Predicate {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error is local to one pipeline and can be recovered by
    /// dropping that pipeline from the run
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Pipeline { .. } | Self::Predicate { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => {
                format!("❌ Invalid input: {}\n💡 Sizes and budgets must be at least 1", message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or config file", message)
            }
            Self::Pipeline { pipeline, message } => {
                format!("⚠️  Strategy '{}' failed: {}", pipeline, message)
            }
            Self::Predicate { stage, message } => {
                format!("⚠️  Predicate '{}' failed: {}", stage, message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 Check the file contents", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<serde_json::Error> for NameForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for NameForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::task::JoinError> for NameForgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("suggestion task failed: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NameForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::NameForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NameForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::NameForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NameForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::NameForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NameForgeError::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = NameForgeError::pipeline("reverse", "boom");
        assert_eq!(err.to_string(), "Pipeline error (reverse): boom");

        let err = config_error!("bad value for {}", "max_suggestions");
        assert!(err.to_string().contains("max_suggestions"));
    }

    #[test]
    fn test_recoverable() {
        assert!(NameForgeError::pipeline("a", "b").is_recoverable());
        assert!(NameForgeError::predicate("a", "b").is_recoverable());
        assert!(!NameForgeError::invalid_input("x").is_recoverable());
    }

    #[test]
    fn test_user_message_path() {
        let err = NameForgeError::io("missing", Some("cfg.json".to_string()));
        assert!(err.user_message().contains("cfg.json"));
    }
}
