//! Utility functions for CLI operations.
//!
//! Configuration loading, database access, principal resolution and
//! output formatting shared across commands.

use crate::error::CliError;
use cajuhub::database::{resolve_data_dir, DATABASE_FILE_NAME};
use cajuhub::{
    Config, ConfigBuilder, Database, DatabaseConfig, Error, Principal, PrincipalResolver,
    SessionToken,
};
use clap::ValueEnum;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// File in the data directory holding the token of the last login.
pub const SESSION_FILE_NAME: &str = "session";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Session token supplied on the command line or environment.
    pub token: Option<String>,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<cajuhub::OutputFormat> for OutputFormat {
    fn from(format: cajuhub::OutputFormat) -> Self {
        match format {
            cajuhub::OutputFormat::Table => Self::Table,
            cajuhub::OutputFormat::Json => Self::Json,
            cajuhub::OutputFormat::Csv => Self::Csv,
            cajuhub::OutputFormat::Tsv => Self::Tsv,
        }
    }
}

/// Picks the explicit format, falling back to the configured default.
pub fn output_format(explicit: Option<OutputFormat>, config: &Config) -> OutputFormat {
    explicit.unwrap_or_else(|| config.output_format().into())
}

/// Resolve the data directory: `--data-dir`, then `CAJUHUB_DATA_DIR`, then
/// `~/.cajuhub`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. `<data_dir>/config.yaml`
/// 3. Built-in defaults (lowest priority)
///
/// Global flags are applied on top by the callers that use them.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let dir = data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(&dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && (global.disable_autoinit || config.disable_autoinit()) {
        return Err(CliError::NoDataDirectory);
    }

    let timeout_seconds = global
        .busy_timeout
        .map_or_else(|| config.maximum_lock_wait_seconds(), u64::from);
    let db_config =
        DatabaseConfig::new(db_path).with_busy_timeout(Duration::from_secs(timeout_seconds));

    Database::open(db_config).map_err(CliError::from)
}

fn session_file(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    Ok(data_dir(global)?.join(SESSION_FILE_NAME))
}

/// The session token to act with: `--token`/`CAJUHUB_TOKEN`, else the one
/// saved by the last `login`.
pub fn current_token(global: &GlobalOptions) -> Result<Option<SessionToken>, CliError> {
    if let Some(ref token) = global.token {
        return Ok(Some(SessionToken::from_string(token.as_str())));
    }
    match fs::read_to_string(session_file(global)?) {
        Ok(saved) if !saved.trim().is_empty() => Ok(Some(SessionToken::from_string(saved))),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remembers a token for later commands.
pub fn save_token(global: &GlobalOptions, token: &SessionToken) -> Result<(), CliError> {
    let path = session_file(global)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token.as_str())?;
    Ok(())
}

/// Forgets the saved token, if any.
pub fn clear_saved_token(global: &GlobalOptions) -> Result<(), CliError> {
    match fs::remove_file(session_file(global)?) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Resolves the caller, failing when nobody is logged in.
pub fn require_principal(global: &GlobalOptions, db: &Database) -> Result<Principal, CliError> {
    let token = current_token(global)?.ok_or_else(|| {
        CliError::Library(Error::Unauthenticated {
            reason: "not logged in (run `cajuhub login` or pass --token)".into(),
        })
    })?;
    Ok(db.resolve(&token)?)
}

/// Resolves the caller if a token is present.
pub fn optional_principal(
    global: &GlobalOptions,
    db: &Database,
) -> Result<Option<Principal>, CliError> {
    match current_token(global)? {
        Some(token) => Ok(Some(db.resolve(&token)?)),
        None => Ok(None),
    }
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format integer cents as a decimal amount.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Writes rows as CSV or TSV to stdout.
pub fn write_delimited(
    headers: &[&str],
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(stdout.lock());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes rows as a tab-separated table with an uppercase header.
pub fn write_table(headers: &[&str], rows: &[Vec<String>]) -> Result<(), CliError> {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = headers
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;
    for row in rows {
        writeln!(handle, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// Pretty-prints a JSON value to stdout.
pub fn write_json(value: &serde_json::Value) -> Result<(), CliError> {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}
