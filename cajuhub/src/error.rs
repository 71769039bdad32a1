//! Error types for the cajuhub library.
//!
//! This module provides the error hierarchy for every booking operation,
//! using `thiserror` for ergonomic error handling. Callers that need to map
//! failures onto an outer surface (exit codes, HTTP statuses) should match on
//! [`Error::kind`] rather than on individual variants.

use std::path::PathBuf;

use thiserror::Error;

use crate::slot::SlotKey;

/// Result type alias for operations that may fail with a cajuhub error.
///
/// # Examples
///
/// ```
/// use cajuhub::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the cajuhub library.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or malformed.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The referenced space, reservation or user does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The principal is authenticated but lacks the rights for the operation.
    #[error("forbidden: {details}")]
    Forbidden {
        /// What the principal attempted.
        details: String,
    },

    /// The slot already holds a confirmed reservation.
    #[error("slot already booked: {slot}")]
    SlotConflict {
        /// The contested slot.
        slot: SlotKey,
    },

    /// The operation is not valid for the current lifecycle state.
    #[error("invalid state: {details}")]
    StateConflict {
        /// Details about the state mismatch.
        details: String,
    },

    /// Credentials or a session token could not be verified.
    #[error("authentication failed: {reason}")]
    Unauthenticated {
        /// Why authentication failed.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Coarse classification of errors, one per caller-visible failure class.
///
/// The outer surface maps each kind to a status: validation errors are the
/// caller's fault and are not retried, slot conflicts may be retried with a
/// different slot, and store failures are reported as generic failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed input.
    Validation,
    /// Referenced space, reservation or user is absent.
    NotFound,
    /// Principal lacks rights.
    Forbidden,
    /// Claim lost the race for a slot.
    SlotConflict,
    /// Operation invalid for the current lifecycle state.
    StateConflict,
    /// Credentials or session could not be verified.
    Unauthenticated,
    /// The persistent store or the environment failed.
    StoreUnavailable,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::SlotConflict => "slot_conflict",
            Self::StateConflict => "state_conflict",
            Self::Unauthenticated => "unauthenticated",
            Self::StoreUnavailable => "store_unavailable",
        };
        f.write_str(name)
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(err.to_string())
    }
}

impl Error {
    /// Returns the failure class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cajuhub::{Error, ErrorKind};
    ///
    /// let err = Error::Forbidden { details: "cancel reservation 7".into() };
    /// assert_eq!(err.kind(), ErrorKind::Forbidden);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::SlotConflict { .. } => ErrorKind::SlotConflict,
            Self::StateConflict { .. } => ErrorKind::StateConflict,
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::LockTimeout { .. }
            | Self::DataDirectoryNotFound { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. }
            | Self::PasswordHash(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Check if error indicates that a referenced resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a lost claim on a slot.
    #[must_use]
    pub fn is_slot_conflict(&self) -> bool {
        matches!(self, Self::SlotConflict { .. })
    }

    /// Check if error was caused by lock contention on the store.
    ///
    /// SQLite reports `SQLITE_BUSY`/`SQLITE_LOCKED` once the busy timeout
    /// has elapsed; those are folded together with explicit lock timeouts.
    #[must_use]
    pub fn is_lock_timeout(&self) -> bool {
        match self {
            Self::LockTimeout { .. } => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
