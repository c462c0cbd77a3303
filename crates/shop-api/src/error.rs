//! API client error types.

use thiserror::Error;

/// Errors from talking to the storefront backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// The request never got a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an error status. `message` is the backend's
    /// own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation needs a token and none is set.
    #[error("Not signed in")]
    NotSignedIn,
}

impl ApiError {
    /// HTTP status the backend answered with, if it answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the backend refused our credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403)) || matches!(self, ApiError::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_displays_backend_message() {
        let err = ApiError::Rejected {
            status: 401,
            message: "Invalid email or password".into(),
        };
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(err.is_unauthorized());
        assert!(!ApiError::NotFound("p1".into()).is_unauthorized());
    }
}
