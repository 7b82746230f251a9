//! Error types for the models crate.

use thiserror::Error;

use crate::upload::UploadStatus;

/// Errors raised while building or mutating model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Project name rejected before any request is sent.
    #[error("invalid project name: {0:?}")]
    InvalidProjectName(String),

    /// Icon slot name not one of `default`, `shortcut`, `splash`.
    #[error("unknown icon kind: {0}")]
    UnknownIconKind(String),

    /// Upload item moved along an edge the state machine does not have.
    #[error("invalid upload transition for {file_name}: {from} -> {to}")]
    InvalidTransition {
        /// File the item was created from.
        file_name: String,
        /// Status before the attempted move.
        from: UploadStatus,
        /// Requested status.
        to: UploadStatus,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InvalidProjectName("-bad".into());
        assert_eq!(err.to_string(), "invalid project name: \"-bad\"");

        let err = ModelError::UnknownIconKind("banner".into());
        assert_eq!(err.to_string(), "unknown icon kind: banner");

        let err = ModelError::InvalidTransition {
            file_name: "a.jar".into(),
            from: UploadStatus::Uploaded,
            to: UploadStatus::Uploading,
        };
        assert_eq!(
            err.to_string(),
            "invalid upload transition for a.jar: uploaded -> uploading"
        );
    }
}
