//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Session expired.
    #[error("session expired")]
    SessionExpired,

    /// The session backend could not be reached.
    #[error("session lookup unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Check if this is an authentication failure rather than an outage.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_classification() {
        assert!(AuthError::SessionExpired.is_auth_failure());
        assert!(!AuthError::Unavailable("timeout".into()).is_auth_failure());
    }
}
