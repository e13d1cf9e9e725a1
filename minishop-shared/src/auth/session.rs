/// Server-side session store
///
/// A session binds an opaque token (carried in a cookie) to an authenticated
/// user. The store is held in process and shared through the application
/// state; it is cheap to clone.
///
/// # Token Format
///
/// `sess_` followed by 32 random base62 characters (37 chars total). Only
/// the SHA-256 hash of a token is kept as the map key, so a dump of the
/// store cannot be replayed as cookies.
///
/// # Expiry
///
/// Sessions expire after a period of inactivity. Every successful
/// [`SessionManager::resolve`] slides the window forward. Expired entries are
/// evicted when touched and swept whenever a new session is created.
///
/// # Example
///
/// ```
/// use minishop_shared::auth::session::SessionManager;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionManager::new(Duration::from_secs(3600));
///
/// let token = sessions.create(1, "alice").await;
/// let session = sessions.resolve(&token).await?;
/// assert_eq!(session.user_id, 1);
///
/// assert!(sessions.revoke(&token).await);
/// assert!(sessions.resolve(&token).await.is_err());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::debug;

/// Session token prefix
const TOKEN_PREFIX: &str = "sess_";

/// Length of the random part of a token
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Total length of a session token
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Error type for session lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Token does not have the session token shape
    #[error("Malformed session token")]
    Malformed,

    /// No session is stored for this token
    #[error("Session not found")]
    NotFound,

    /// Session existed but was idle for longer than the TTL
    #[error("Session expired")]
    Expired,
}

/// Authenticated session data
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated user
    pub user_id: i64,

    /// Username at login time
    pub username: String,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    last_seen: Instant,
}

/// In-memory session store keyed by token hash
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    /// Creates an empty store whose sessions expire after `ttl` of inactivity
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Inactivity timeout
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Establishes a new session and returns its plaintext token
    ///
    /// The token is only returned here; the store keeps its hash.
    pub async fn create(&self, user_id: i64, username: &str) -> String {
        let token = generate_token();
        let session = Session {
            user_id,
            username: username.to_string(),
            created_at: Utc::now(),
            last_seen: Instant::now(),
        };

        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        sessions.retain(|_, s| s.last_seen.elapsed() < ttl);
        sessions.insert(hash_token(&token), session);

        debug!(user_id, active_sessions = sessions.len(), "Session created");
        token
    }

    /// Looks up a live session and refreshes its inactivity window
    ///
    /// # Errors
    ///
    /// - `SessionError::Malformed` if the token has the wrong shape
    /// - `SessionError::NotFound` if no session is stored for it
    /// - `SessionError::Expired` if it was idle too long (and is evicted)
    pub async fn resolve(&self, token: &str) -> Result<Session, SessionError> {
        if !validate_token_format(token) {
            return Err(SessionError::Malformed);
        }

        let key = hash_token(token);
        let mut sessions = self.sessions.write().await;

        let session = sessions.get_mut(&key).ok_or(SessionError::NotFound)?;
        if session.last_seen.elapsed() >= self.ttl {
            let user_id = session.user_id;
            sessions.remove(&key);
            debug!(user_id, "Session expired");
            return Err(SessionError::Expired);
        }

        session.last_seen = Instant::now();
        Ok(session.clone())
    }

    /// Ends a session
    ///
    /// # Returns
    ///
    /// True if a session was removed
    pub async fn revoke(&self, token: &str) -> bool {
        if !validate_token_format(token) {
            return false;
        }

        let removed = self.sessions.write().await.remove(&hash_token(token));
        if let Some(session) = &removed {
            debug!(user_id = session.user_id, "Session revoked");
        }
        removed.is_some()
    }

    /// Drops every expired session
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.last_seen.elapsed() < ttl);
        before - sessions.len()
    }

    /// Number of stored sessions, expired or not
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Generates a random session token
fn generate_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random_part: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    format!("{}{}", TOKEN_PREFIX, random_part)
}

/// Hex-encoded SHA-256 of a token
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks the `sess_` + 32 base62 shape
pub fn validate_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
        && token
            .strip_prefix(TOKEN_PREFIX)
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(3600))
    }

    #[test]
    fn test_generated_token_format() {
        let token = generate_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), SESSION_TOKEN_LENGTH);
        assert!(validate_token_format(&token));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_validate_token_format_rejects_bad_shapes() {
        assert!(!validate_token_format(""));
        assert!(!validate_token_format("sess_short"));
        assert!(!validate_token_format("nope_abcdefghijklmnopqrstuvwxyz123456"));
        assert!(!validate_token_format("sess_abcdefghijklmnopqrstuvwxyz12345!"));
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let sessions = manager();

        let token = sessions.create(7, "alice").await;
        let session = sessions.resolve(&token).await.unwrap();

        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "alice");
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_and_malformed() {
        let sessions = manager();

        assert_eq!(
            sessions.resolve("garbage").await.unwrap_err(),
            SessionError::Malformed
        );
        assert_eq!(
            sessions.resolve(&generate_token()).await.unwrap_err(),
            SessionError::NotFound
        );
    }

    #[tokio::test]
    async fn test_revoke() {
        let sessions = manager();
        let token = sessions.create(1, "alice").await;

        assert!(sessions.revoke(&token).await);
        assert!(!sessions.revoke(&token).await);
        assert_eq!(
            sessions.resolve(&token).await.unwrap_err(),
            SessionError::NotFound
        );
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let sessions = SessionManager::new(Duration::ZERO);
        let token = sessions.create(1, "alice").await;

        assert_eq!(
            sessions.resolve(&token).await.unwrap_err(),
            SessionError::Expired
        );
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let sessions = SessionManager::new(Duration::ZERO);
        sessions.create(1, "alice").await;
        sessions.create(2, "bob").await;

        // Creating a session sweeps the earlier one, so only the last remains
        assert_eq!(sessions.len().await, 1);
        assert_eq!(sessions.purge_expired().await, 1);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let sessions = manager();
        let alice = sessions.create(1, "alice").await;
        let bob = sessions.create(2, "bob").await;

        sessions.revoke(&alice).await;

        assert_eq!(sessions.resolve(&bob).await.unwrap().user_id, 2);
    }
}
