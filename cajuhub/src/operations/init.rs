//! Data directory bootstrap.
//!
//! Creates the data directory and database, optionally writes a commented
//! configuration file and registers the first administrator.

use std::fs;
use std::path::PathBuf;

use crate::config::CONFIG_FILE_NAME;
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::identity::{Authenticator, Registration, User};
use crate::{Database, DatabaseConfig};

/// Options for initializing a data directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that will hold the database.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a default `config.yaml` if none exists.
    pub create_config: bool,
    /// First administrator to register.
    pub admin: Option<Registration>,
}

impl InitOptions {
    /// Initializes `data_dir` with no config file and no admin.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            admin: None,
        }
    }

    /// Sets whether an existing database is replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a default configuration file is written.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Registers `admin` once the database exists.
    #[must_use]
    pub fn with_admin(mut self, admin: Registration) -> Self {
        self.admin = Some(admin);
        self
    }
}

/// What an initialization did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory did not exist before.
    pub data_dir_created: bool,
    /// A database file was written.
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// The administrator registered, if one was requested.
    pub admin: Option<User>,
    /// The initialized directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# cajuhub configuration
# Environment variables (CAJUHUB_*) override these values.

# Seconds a write waits on a busy database (default: 5)
# maximum_lock_wait_seconds: 5

# Lifetime of login sessions in hours (default: 24)
# session_ttl_hours: 24

# Listing format: table, json, csv or tsv (default: table)
# output_format: table

# Refuse to create the database implicitly (default: false)
# disable_autoinit: false

# Rows per page in reservation listings (default: 50)
# default_list_limit: 50
";

/// Initializes a data directory.
///
/// # Errors
///
/// Returns a `Validation` error if a database exists and `overwrite` is not
/// set, or if the admin registration is invalid. I/O and store errors are
/// passed through.
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        admin: None,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    if db_exists {
        fs::remove_file(&db_path)?;
        log::info!("removed existing database {}", db_path.display());
    }

    let mut db = Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;

    if let Some(ref admin) = options.admin {
        result.admin = Some(Authenticator::new(&mut db).create_admin(admin.clone())?);
    }

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}
