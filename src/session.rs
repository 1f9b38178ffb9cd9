use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "fore_session";
pub const INCORRECT_PASSWORD: &str = "Incorrect password. Please try again.";

/// The shared password and how long a login lasts. `ttl: None` never expires.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub password: String,
    pub ttl: Option<TimeDelta>,
}

impl SessionPolicy {
    #[must_use]
    pub fn new(password: impl Into<String>, ttl: Option<TimeDelta>) -> Self {
        Self {
            password: password.into(),
            ttl,
        }
    }

    /// `0` hours means no expiry.
    #[must_use]
    pub fn with_ttl_hours(password: impl Into<String>, hours: u32) -> Self {
        let ttl = (hours > 0).then(|| TimeDelta::hours(i64::from(hours)));
        Self::new(password, ttl)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Issues and checks login sessions. Cloning shares the same session table.
#[derive(Debug, Clone)]
pub struct SessionGate {
    policy: SessionPolicy,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionGate {
    #[must_use]
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// # Errors
    ///
    /// Will return `Err` if the password does not match.
    pub async fn login(&self, password: &str, now: DateTime<Utc>) -> Result<Session, AppError> {
        if password != self.policy.password {
            info!("login refused");
            return Err(AppError::Unauthorized(INCORRECT_PASSWORD.to_string()));
        }
        let session = Session {
            token: Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: self.policy.ttl.map(|ttl| now + ttl),
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        info!(expires_at = ?session.expires_at, "session issued");
        Ok(session)
    }

    /// True only for a token that was issued and has not expired. Expired
    /// sessions are dropped on the way.
    pub async fn validate(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.is_live(now));
        if sessions.len() < before {
            debug!(purged = before - sessions.len(), "expired sessions removed");
        }
        sessions.contains_key(token)
    }

    pub async fn logout(&self, token: &str) {
        if self.sessions.write().await.remove(token).is_some() {
            info!("session revoked");
        }
    }

    pub async fn live_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2026-06-12T{hour:02}:00:00Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn wrong_password_is_refused() {
        let gate = SessionGate::new(SessionPolicy::with_ttl_hours("fore", 12));
        let err = gate.login("FORE", at(8)).await.unwrap_err();
        assert_eq!(err.user_message(), INCORRECT_PASSWORD);
        assert_eq!(gate.live_sessions().await, 0);
    }

    #[tokio::test]
    async fn sessions_expire_after_the_ttl() {
        let gate = SessionGate::new(SessionPolicy::with_ttl_hours("fore", 2));
        let session = gate.login("fore", at(8)).await.unwrap();
        assert_eq!(session.expires_at, Some(at(10)));
        assert!(gate.validate(&session.token, at(9)).await);
        assert!(!gate.validate(&session.token, at(10)).await);
        assert_eq!(gate.live_sessions().await, 0);
    }

    #[tokio::test]
    async fn zero_ttl_never_expires_but_logout_revokes() {
        let gate = SessionGate::new(SessionPolicy::with_ttl_hours("fore", 0));
        let session = gate.login("fore", at(1)).await.unwrap();
        assert!(session.expires_at.is_none());
        assert!(gate.validate(&session.token, at(23)).await);
        gate.logout(&session.token).await;
        assert!(!gate.validate(&session.token, at(23)).await);
        assert!(!gate.validate("not-a-token", at(1)).await);
    }
}
