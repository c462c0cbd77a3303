//! The session-lookup seam used by the checkout guards.

use crate::session::Session;
use crate::AuthError;
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Answers "who is signed in right now?".
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Look up the current session. `Ok(None)` means nobody is signed in.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// The current session if it exists and has not expired.
    ///
    /// Lookup failures are logged and reported as "no session"; guards
    /// redirect to login instead of surfacing an error.
    async fn active_session(&self) -> Option<Session> {
        match self.current_session().await {
            Ok(Some(session)) => match session.validate() {
                Ok(()) => Some(session),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) if e.is_auth_failure() => {
                tracing::debug!(error = %e, "ignoring session");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl<L: SessionLookup + ?Sized> SessionLookup for Arc<L> {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        (**self).current_session().await
    }
}

/// Session holder kept in process memory.
///
/// Embedders that authenticate elsewhere sign the session in here; tests use
/// it as a fake.
#[derive(Debug, Default)]
pub struct MemorySessions {
    current: RwLock<Option<Session>>,
}

impl MemorySessions {
    /// Create with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with `session` signed in.
    pub fn signed_in(session: Session) -> Self {
        Self {
            current: RwLock::new(Some(session)),
        }
    }

    /// Replace the current session.
    pub fn sign_in(&self, session: Session) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Forget the current session.
    pub fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl SessionLookup for MemorySessions {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AuthToken;
    use crate::user::{User, UserId};

    struct Unreachable;

    #[async_trait]
    impl SessionLookup for Unreachable {
        async fn current_session(&self) -> Result<Option<Session>, AuthError> {
            Err(AuthError::Unavailable("connection refused".into()))
        }
    }

    fn session() -> Session {
        Session::new(
            AuthToken::new("tok"),
            User::customer(UserId::new("u1"), "Rahim", "rahim@example.com"),
        )
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let sessions = MemorySessions::new();
        assert!(sessions.active_session().await.is_none());

        sessions.sign_in(session());
        assert!(sessions.active_session().await.is_some());

        sessions.sign_out();
        assert!(sessions.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_active() {
        let sessions = MemorySessions::signed_in(session().with_duration(-60));
        assert!(sessions.current_session().await.unwrap().is_some());
        assert!(sessions.active_session().await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_means_no_session() {
        assert!(Unreachable.active_session().await.is_none());
        let shared: Arc<dyn SessionLookup> = Arc::new(Unreachable);
        assert!(shared.active_session().await.is_none());
    }
}
