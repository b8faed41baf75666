//! Error types for send and share flows
//!
//! Flows fail in a small number of well-defined ways. None of them are
//! retried at this layer; a failed flow ends and the user starts over.

use crate::scope::Scope;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, SendError>;

/// Main error type for send and share flows
///
/// Callbacks that end a flow abnormally return one of these after the
/// orchestrator has already done all user-facing handling. Shells may log
/// the value; they never need to act on it.
#[derive(Error, Debug)]
pub enum SendError {
    /// The user backed out; the flow ended without anything surfacing
    #[error("Flow cancelled by the user")]
    UserCancelled,

    /// Authorization for a required scope was refused
    #[error("Authorization denied for {scope}")]
    PermissionDenied { scope: Scope },

    /// A gateway failed for environmental reasons; treated as a denial
    #[error("Transient gateway failure: {detail}")]
    Transient { detail: String },

    /// A request whose flags break the cross-field contract
    #[error("Invariant violation: {detail}")]
    InvariantViolation { detail: String },

    /// Persisted state written by a format this build does not understand
    #[error("Unsupported snapshot version {version}")]
    UnsupportedSnapshot { version: u32 },

    /// Persisted state that could not be decoded at all
    #[error("Malformed snapshot: {detail}")]
    MalformedSnapshot { detail: String },
}

impl SendError {
    /// Create a permission denied error for a scope
    pub fn permission_denied(scope: Scope) -> Self {
        Self::PermissionDenied { scope }
    }

    /// Create a transient gateway failure error
    pub fn transient(detail: &str) -> Self {
        Self::Transient {
            detail: detail.to_string(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(detail: &str) -> Self {
        Self::InvariantViolation {
            detail: detail.to_string(),
        }
    }

    /// Create a malformed snapshot error
    pub fn malformed_snapshot(detail: &str) -> Self {
        Self::MalformedSnapshot {
            detail: detail.to_string(),
        }
    }

    /// Whether the flow ended without anything shown to the user
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}

impl From<serde_json::Error> for SendError {
    fn from(source: serde_json::Error) -> Self {
        Self::malformed_snapshot(&source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_names_the_scope() {
        let error = SendError::permission_denied(Scope::Maps);

        assert!(matches!(
            error,
            SendError::PermissionDenied { scope: Scope::Maps }
        ));
        assert!(error.to_string().contains("maps"));
    }

    #[test]
    fn test_transient_error_carries_detail() {
        let error = SendError::transient("account manager unreachable");

        assert!(error.to_string().contains("Transient"));
        assert!(error.to_string().contains("account manager unreachable"));
    }

    #[test]
    fn test_invariant_violation_display() {
        let error = SendError::invariant("drive share without send drive");

        assert!(matches!(error, SendError::InvariantViolation { .. }));
        assert!(error.to_string().contains("Invariant violation"));
        assert!(error.to_string().contains("drive share"));
    }

    #[test]
    fn test_unsupported_snapshot_includes_version() {
        let error = SendError::UnsupportedSnapshot { version: 7 };

        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn test_only_user_cancelled_is_silent() {
        assert!(SendError::UserCancelled.is_silent());
        assert!(!SendError::permission_denied(Scope::Drive).is_silent());
        assert!(!SendError::transient("offline").is_silent());
        assert!(!SendError::invariant("bad flags").is_silent());
    }

    #[test]
    fn test_from_serde_json_error() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: SendError = source.into();

        assert!(matches!(error, SendError::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SendError>();
        assert_sync::<SendError>();
    }
}
