use thiserror::Error;

use crate::domain::Increment;

/// Unified error type for pr-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// The triggering event does not satisfy the run's preconditions
    #[error("{0}")]
    Precondition(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid increment: {0} cannot be applied to a version")]
    InvalidIncrement(Increment),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event payload error: {0}")]
    Event(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pr-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a precondition error; its message is shown verbatim
    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    /// Create a classification error with context
    pub fn classification(msg: impl Into<String>) -> Self {
        ReleaseError::Classification(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an event payload error with context
    pub fn event(msg: impl Into<String>) -> Self {
        ReleaseError::Event(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_is_verbatim() {
        let err = ReleaseError::precondition("This action can only be run on Pull Request");
        assert_eq!(err.to_string(), "This action can only be run on Pull Request");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_increment_names_the_increment() {
        let err = ReleaseError::InvalidIncrement(Increment::None);
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::classification("x"), "Classification error"),
            (ReleaseError::version("x"), "Version parsing error"),
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::event("x"), "Event payload error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_long_messages() {
        let long_msg = "a".repeat(1000);
        let err = ReleaseError::version(&long_msg);
        assert!(err.to_string().contains(&long_msg));
    }
}
