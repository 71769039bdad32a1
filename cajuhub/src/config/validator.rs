//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Longest a write may be configured to wait for the store lock.
pub const MAX_LOCK_WAIT_SECONDS: u64 = 60 * 60;

/// Longest configurable session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use cajuhub::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let zero = Config { session_ttl_hours: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&zero).is_err());
///
/// let forever = Config { session_ttl_hours: Some(u64::MAX), ..Default::default() };
/// assert!(ConfigValidator::validate(&forever).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a zero lock wait, session lifetime
    /// or list limit, and for a lock wait or session lifetime above its cap.
    pub fn validate(config: &Config) -> Result<()> {
        Self::require_in_range(
            "maximum_lock_wait_seconds",
            config.maximum_lock_wait_seconds,
            MAX_LOCK_WAIT_SECONDS,
        )?;
        Self::require_in_range(
            "session_ttl_hours",
            config.session_ttl_hours,
            MAX_SESSION_TTL_HOURS,
        )?;
        Self::require_in_range(
            "default_list_limit",
            config.default_list_limit.map(u64::from),
            u64::from(u32::MAX),
        )?;
        Ok(())
    }

    fn require_in_range(field: &str, value: Option<u64>, max: u64) -> Result<()> {
        match value {
            Some(0) => Err(Error::Validation {
                field: field.into(),
                message: "must be greater than 0".into(),
            }),
            Some(v) if v > max => Err(Error::Validation {
                field: field.into(),
                message: format!("must be at most {max}"),
            }),
            _ => Ok(()),
        }
    }
}
