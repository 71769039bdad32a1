//! CLI-specific error types with exit codes.
//!
//! Library errors are mapped to exit codes by kind, the way an HTTP layer
//! would map them to status codes.

use cajuhub::{Error as LibError, ErrorKind, ValidationError};
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for database lock.
    Timeout,

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Slot already booked, or reservation already cancelled
    /// - 2: Timeout waiting for database lock
    /// - 3: No data directory found
    /// - 4: Invalid arguments or input validation failure
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: Space, reservation or user not found
    /// - 9: Not logged in, or not allowed
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::Io(_) => 5,
                LibError::Configuration(_) => 7,
                LibError::DataDirectoryNotFound { .. } => 3,
                e if e.is_lock_timeout() => 2,
                e => match e.kind() {
                    ErrorKind::SlotConflict | ErrorKind::StateConflict => 1,
                    ErrorKind::Validation => 4,
                    ErrorKind::NotFound => 8,
                    ErrorKind::Forbidden | ErrorKind::Unauthenticated => 9,
                    ErrorKind::StoreUnavailable => 6,
                },
            },
            CliError::Timeout => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout => write!(f, "Timeout waiting for database lock"),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (run `cajuhub init` or drop --disable-autoinit)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        if e.is_lock_timeout() {
            CliError::Timeout
        } else {
            CliError::Library(e)
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        CliError::Library(LibError::from(e))
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cajuhub::{Shift, SlotKey, SpaceId};
    use chrono::NaiveDate;

    fn code(e: LibError) -> i32 {
        CliError::from(e).exit_code()
    }

    #[test]
    fn test_library_exit_codes() {
        let slot = SlotKey::new(
            SpaceId::new(1),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            Shift::Morning,
        );
        assert_eq!(code(LibError::SlotConflict { slot }), 1);
        assert_eq!(
            code(LibError::StateConflict {
                details: "already cancelled".into()
            }),
            1
        );
        assert_eq!(code(LibError::LockTimeout { seconds: 5 }), 2);
        assert_eq!(
            code(LibError::Validation {
                field: "shift".into(),
                message: "bad".into()
            }),
            4
        );
        assert_eq!(
            code(LibError::NotFound {
                resource: "space 9".into()
            }),
            8
        );
        assert_eq!(
            code(LibError::Forbidden {
                details: "no".into()
            }),
            9
        );
        assert_eq!(
            code(LibError::Unauthenticated {
                reason: "no session".into()
            }),
            9
        );
        assert_eq!(code(LibError::Io(std::io::Error::other("disk"))), 5);
    }

    #[test]
    fn test_request_validation_maps_to_validation_exit() {
        let err: CliError = cajuhub::ReservationRequest::new(1, "2025-02-30", "morning")
            .validate()
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            CliError::Library(LibError::Validation { ref field, .. }) if field == "reservation_date"
        ));
        assert_eq!(err.exit_code(), 4);

        let err = CliError::from(ValidationError::new("shift", "unknown shift"));
        assert_eq!(err.to_string(), "validation error for 'shift': unknown shift");
    }

    #[test]
    fn test_cli_exit_codes() {
        assert_eq!(CliError::Timeout.exit_code(), 2);
        assert_eq!(CliError::NoDataDirectory.exit_code(), 3);
        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(CliError::Config("x".into()).exit_code(), 7);
    }
}
