//! Opaque session tokens.

use std::fmt;
use std::time::{Duration, SystemTime};

use rand::RngCore;

use crate::error::{Error, Result};

use super::UserId;

/// Number of random bytes in a session token.
pub const TOKEN_BYTES: usize = 32;

/// An opaque bearer token identifying a login session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wraps a token presented by a client.
    #[must_use]
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The bearer token.
    pub token: SessionToken,
    /// Owner of the session.
    pub user_id: UserId,
    /// When the session was opened.
    pub created_at: SystemTime,
    /// When the session stops resolving.
    pub expires_at: SystemTime,
}

impl Session {
    /// Opens a new session for `user_id` that lives for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the expiry time is not representable.
    pub fn open(user_id: UserId, ttl: Duration) -> Result<Self> {
        let now = SystemTime::now();
        let expires_at = now.checked_add(ttl).ok_or_else(|| Error::Validation {
            field: "session_ttl".into(),
            message: format!("session lifetime of {}s is too long", ttl.as_secs()),
        })?;
        Ok(Self {
            token: SessionToken::generate(),
            user_id,
            created_at: now,
            expires_at,
        })
    }

    /// Returns true once the expiry time has passed.
    #[must_use]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}
