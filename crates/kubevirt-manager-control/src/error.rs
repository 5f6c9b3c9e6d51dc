//! Error types for VM lifecycle operations.

use kubevirt_manager_orchestrator::OrchestratorError;
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur in lifecycle operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The orchestrator failed or rejected the request.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// The requested action is not one the manager knows how to perform.
    #[error("unsupported action: {0:?}")]
    UnsupportedAction(String),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Every orchestrator failure is reported as a server error; only a bad
    /// action name is the caller's fault.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::UnsupportedAction(_) => 400,
            Self::Orchestrator(_) => 500,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::Orchestrator(e) => e.is_retriable(),
            Self::UnsupportedAction(_) => false,
        }
    }

    /// Returns true if this error is an optimistic-concurrency conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Orchestrator(e) if e.is_conflict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ControlError::UnsupportedAction("stop".into()).http_status_code(),
            400
        );

        for err in [
            OrchestratorError::NotFound("x".into()),
            OrchestratorError::Conflict("x".into()),
            OrchestratorError::Forbidden("x".into()),
            OrchestratorError::InvalidSpec("x".into()),
            OrchestratorError::Unavailable("x".into()),
            OrchestratorError::Config("x".into()),
        ] {
            assert_eq!(ControlError::from(err).http_status_code(), 500);
        }
    }

    #[test]
    fn retriable_follows_orchestrator() {
        assert!(ControlError::from(OrchestratorError::Unavailable("x".into())).is_retriable());
        assert!(!ControlError::from(OrchestratorError::NotFound("x".into())).is_retriable());
        assert!(!ControlError::UnsupportedAction(String::new()).is_retriable());
    }

    #[test]
    fn display_is_transparent() {
        let err = ControlError::from(OrchestratorError::NotFound("vmi \"a\"".into()));
        assert_eq!(err.to_string(), "not found: vmi \"a\"");
        assert_eq!(
            ControlError::UnsupportedAction("stop".into()).to_string(),
            "unsupported action: \"stop\""
        );
    }
}
