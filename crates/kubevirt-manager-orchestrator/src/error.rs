//! Error types for the orchestrator crate.

use thiserror::Error;

/// Errors returned by the KubeVirt API adapter.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The API server could not be reached or answered with a server error.
    #[error("orchestrator unavailable: {0}")]
    Unavailable(String),

    /// The credentials were rejected or lack permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The named object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Name collision on create, or a stale `resourceVersion` on update.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The API server rejected the submitted object.
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Kubeconfig could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OrchestratorError {
    /// Check if this error is an optimistic-concurrency conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Conflict(_))
    }

    /// Get the HTTP status code the API server answered with.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InvalidSpec(_) => 422,
            Self::Unavailable(_) => 503,
            Self::Config(_) => 500,
        }
    }
}

impl From<kube::Error> for OrchestratorError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => {
                let message = if resp.message.is_empty() {
                    resp.reason.clone()
                } else {
                    resp.message.clone()
                };
                match resp.code {
                    401 | 403 => Self::Forbidden(message),
                    404 => Self::NotFound(message),
                    409 => Self::Conflict(message),
                    400 | 422 => Self::InvalidSpec(message),
                    _ => Self::Unavailable(message),
                }
            }
            kube::Error::InferConfig(e) => Self::Config(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// A specialized Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
