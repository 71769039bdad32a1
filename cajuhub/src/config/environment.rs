//! Environment variable handling for configuration overrides.
//!
//! `CAJUHUB_*` variables override values read from the configuration file.

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Lock wait override.
pub const LOCK_WAIT_ENV: &str = "CAJUHUB_MAXIMUM_LOCK_WAIT_SECONDS";
/// Session lifetime override.
pub const SESSION_TTL_ENV: &str = "CAJUHUB_SESSION_TTL_HOURS";
/// Output format override.
pub const OUTPUT_FORMAT_ENV: &str = "CAJUHUB_OUTPUT_FORMAT";
/// Auto-initialisation override.
pub const DISABLE_AUTOINIT_ENV: &str = "CAJUHUB_DISABLE_AUTOINIT";
/// List page size override.
pub const LIST_LIMIT_ENV: &str = "CAJUHUB_DEFAULT_LIST_LIMIT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use cajuhub::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error naming the variable if a value cannot
    /// be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds = Some(Self::parse_number(LOCK_WAIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(SESSION_TTL_ENV) {
            config.session_ttl_hours = Some(Self::parse_number(SESSION_TTL_ENV, &val)?);
        }

        if let Ok(val) = env::var(OUTPUT_FORMAT_ENV) {
            let format = OutputFormat::from_str(&val).map_err(|message| Error::Validation {
                field: OUTPUT_FORMAT_ENV.into(),
                message,
            })?;
            config.output_format = Some(format);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(LIST_LIMIT_ENV) {
            config.default_list_limit = Some(Self::parse_number(LIST_LIMIT_ENV, &val)?);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid number: '{s}'"),
        })
    }
}
