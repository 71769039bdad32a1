//! Users, roles and principal resolution.
//!
//! The booking core only ever sees a resolved [`Principal`]. How that
//! principal was established (password login, stored session, a test
//! fixture) stays behind the [`PrincipalResolver`] seam.

mod authenticator;
mod password;
mod session;

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reservation::ValidationError;

pub use authenticator::Authenticator;
pub use password::{hash_password, verify_password};
pub use session::{Session, SessionToken, TOKEN_BYTES};

/// Store-assigned identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user; may only act on their own reservations.
    User,
    /// Administrator; may act on any reservation and manage spaces.
    Admin,
}

impl Role {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::new("role", format!("unknown role '{other}'"))),
        }
    }
}

/// A resolved identity presented to the booking core.
///
/// # Examples
///
/// ```
/// use cajuhub::{Principal, UserId};
///
/// let owner = Principal::user(UserId::new(1));
/// let admin = Principal::admin(UserId::new(2));
///
/// assert!(owner.can_act_for(UserId::new(1)));
/// assert!(!owner.can_act_for(UserId::new(3)));
/// assert!(admin.can_act_for(UserId::new(3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Identity of the caller.
    pub id: UserId,
    /// Role of the caller.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Creates a regular-user principal.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::new(id, Role::User)
    }

    /// Creates an administrator principal.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Owner-or-admin rule.
    #[must_use]
    pub fn can_act_for(&self, holder: UserId) -> bool {
        self.is_admin() || self.id == holder
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, lowercased.
    pub email: String,
    /// Authorization role.
    pub role: Role,
    /// Registration time.
    pub created_at: SystemTime,
}

impl User {
    /// Returns the principal this user acts as.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Clear-text password; hashed before storage.
    pub password: String,
}

impl Registration {
    /// Creates a registration payload.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates the payload, trimming the name and lowercasing the email.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or malformed field.
    pub fn validate(mut self) -> std::result::Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);

        if self.name.is_empty() {
            return Err(ValidationError::new("name", "name is required"));
        }
        if self.email.is_empty() {
            return Err(ValidationError::new("email", "email is required"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError::new(
                "email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "password is required"));
        }
        Ok(self)
    }
}

/// Canonical form of an email used for lookups.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Turns a presented credential into a principal.
pub trait PrincipalResolver {
    /// Resolves a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` for unknown or expired tokens, or a store
    /// error.
    fn resolve(&self, token: &SessionToken) -> Result<Principal>;
}
