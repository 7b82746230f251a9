//! Error types for the deploy console client.

use deploy_models::ModelError;
use thiserror::Error;

/// Errors raised while talking to the deploy server or driving a deploy.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Server answered with a non-success status.
    #[error("server error {status} {reason}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Canonical status text.
        reason: String,
        /// Response body, verbatim.
        body: String,
    },

    /// Request could not be sent or its response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The acting view already has a request in flight.
    #[error("{view} is busy: {message}")]
    Busy {
        /// View holding the lock.
        view: &'static str,
        /// Message of the operation in flight.
        message: String,
    },

    /// Project name rejected before any request was sent.
    #[error("invalid project name: {0:?}")]
    InvalidProjectName(String),

    /// Toolbar action not available in the current deploy state.
    #[error("action not available: {0}")]
    Unavailable(String),

    /// Operation needs a loaded project.
    #[error("no project loaded")]
    NotLoaded,

    /// Model-level failure other than name validation.
    #[error(transparent)]
    Model(ModelError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ModelError> for DeployError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidProjectName(name) => DeployError::InvalidProjectName(name),
            other => DeployError::Model(other),
        }
    }
}

impl DeployError {
    /// Status code for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeployError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for deploy operations.
pub type Result<T> = std::result::Result<T, DeployError>;
