//! Authentication collaborator.
//!
//! The board service authorizes every request with a bearer token taken from
//! the signed-in session. [`SessionAuth`] keeps that session in process.

use crate::config::ClientConfig;
use crate::error::{KanbanError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A signed-in session: who, and the token proving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user: User, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, `None` without a live session
    async fn current_user(&self) -> Option<User>;

    /// Where to send the user to sign in
    fn sign_in_url(&self) -> String;

    /// Ends the current session
    async fn sign_out(&self) -> Result<()>;

    /// Bearer token for request authorization headers
    async fn access_token(&self) -> Option<String>;
}

/// Fails with `AuthenticationRequired` unless someone is signed in
pub async fn require_user(auth: &dyn AuthProvider) -> Result<User> {
    auth.current_user()
        .await
        .ok_or(KanbanError::AuthenticationRequired)
}

/// In-process session holder
pub struct SessionAuth {
    session: RwLock<Option<Session>>,
    sign_in_url: String,
}

impl SessionAuth {
    pub fn new(sign_in_url: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(None),
            sign_in_url: sign_in_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.sign_in_path.clone())
    }

    /// Creates a holder that already carries `session`
    pub fn signed_in(session: Session, sign_in_url: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            sign_in_url: sign_in_url.into(),
        }
    }

    /// Replaces the current session
    pub async fn sign_in(&self, session: Session) {
        tracing::info!(user_id = session.user.id.as_str(), "signed in");
        *self.session.write().await = Some(session);
    }

    async fn live_session(&self) -> Option<Session> {
        let guard = self.session.read().await;
        guard
            .as_ref()
            .filter(|s| !s.is_expired_at(Utc::now()))
            .cloned()
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_user(&self) -> Option<User> {
        self.live_session().await.map(|s| s.user)
    }

    fn sign_in_url(&self) -> String {
        self.sign_in_url.clone()
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(previous) = self.session.write().await.take() {
            tracing::info!(user_id = previous.user.id.as_str(), "signed out");
        }
        Ok(())
    }

    async fn access_token(&self) -> Option<String> {
        self.live_session().await.map(|s| s.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: Some("ada@example.com".to_string()),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_signed_out_by_default() {
        let auth = SessionAuth::new("/signin");
        assert!(auth.current_user().await.is_none());
        assert!(auth.access_token().await.is_none());
        assert_eq!(auth.sign_in_url(), "/signin");

        let err = require_user(&auth).await.unwrap_err();
        assert!(matches!(err, KanbanError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = SessionAuth::new("/signin");
        auth.sign_in(Session::new(user(), "token-1")).await;

        assert_eq!(auth.current_user().await, Some(user()));
        assert_eq!(auth.access_token().await.as_deref(), Some("token-1"));
        assert_eq!(require_user(&auth).await.unwrap().id, "u-1");

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().await.is_none());
        auth.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let expired = Session::new(user(), "stale").expiring_at(Utc::now() - Duration::minutes(1));
        let auth = SessionAuth::signed_in(expired, "/signin");

        assert!(auth.current_user().await.is_none());
        assert!(auth.access_token().await.is_none());
    }

    #[test]
    fn test_sign_in_url_from_config() {
        let auth = SessionAuth::from_config(&ClientConfig::default());
        assert_eq!(auth.sign_in_url(), "/signin");
    }
}
