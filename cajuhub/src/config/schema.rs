//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered; the accessor methods on [`Config`] supply the defaults.

use serde::{Deserialize, Serialize};

/// Default upper bound on how long a write waits for the store lock.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 24;

/// Default number of rows returned by `list` when no limit is given.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Complete cajuhub configuration.
///
/// # Examples
///
/// ```
/// use cajuhub::config::{Config, OutputFormat};
///
/// let yaml = "session_ttl_hours: 8\noutput_format: json\n";
/// let config: Config = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.session_ttl_hours(), 8);
/// assert_eq!(config.output_format(), OutputFormat::Json);
/// assert_eq!(config.default_list_limit(), 50);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seconds a write may wait on a busy store before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Lifetime of login sessions, in hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_ttl_hours: Option<u64>,

    /// Default output format for listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Refuse to create the database when it is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_autoinit: Option<bool>,

    /// Page size for reservation listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_list_limit: Option<u32>,
}

impl Config {
    /// Lock wait, or the default.
    #[must_use]
    pub fn maximum_lock_wait_seconds(&self) -> u64 {
        self.maximum_lock_wait_seconds
            .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS)
    }

    /// Session lifetime in hours, or the default.
    #[must_use]
    pub fn session_ttl_hours(&self) -> u64 {
        self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS)
    }

    /// Output format, or `table`.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or(OutputFormat::Table)
    }

    /// Whether automatic database creation is disabled.
    #[must_use]
    pub fn disable_autoinit(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }

    /// Listing page size, or the default.
    #[must_use]
    pub fn default_list_limit(&self) -> u32 {
        self.default_list_limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Output format for listings.
///
/// ```
/// use cajuhub::config::OutputFormat;
///
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            _ => Err(format!(
                "invalid output format: '{s}' (expected table, json, csv or tsv)"
            )),
        }
    }
}
