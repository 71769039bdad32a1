//! Database connection management.

use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OpenFlags, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A `SQLite` connection configured for concurrent booking.
///
/// Every process or thread that books slots opens its own `Database`; the
/// store serializes writers through `SQLite` locking and the busy timeout.
///
/// # Examples
///
/// ```no_run
/// use cajuhub::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/cajuhub.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Enable WAL mode and foreign key enforcement
    /// - Configure the busy timeout
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is missing and `auto_create` is off
    /// - The file or its parent directory cannot be created or opened
    /// - The busy timeout does not fit `SQLite`'s millisecond counter
    /// - PRAGMA settings cannot be applied
    /// - The schema version is unsupported
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.auto_create {
                return Err(Error::DataDirectoryNotFound {
                    path: config
                        .path
                        .parent()
                        .map_or_else(|| config.path.clone(), std::path::Path::to_path_buf),
                });
            }
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        if i32::try_from(config.busy_timeout.as_millis()).is_err() {
            return Err(Error::Validation {
                field: "busy_timeout".into(),
                message: format!("{}s is too long", config.busy_timeout.as_secs()),
            });
        }

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // The busy timeout must be in place before anything else can contend.
        conn.busy_timeout(config.busy_timeout)?;
        if !config.read_only {
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;

        super::migrations::check_schema_compatibility(&conn)?;

        log::debug!("opened database at {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Returns the configuration this connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Starts a write transaction, taking the write lock up front.
    ///
    /// Waiting out the busy timeout surfaces as `LockTimeout` rather than a
    /// raw `SQLite` busy error.
    pub(super) fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        let busy_timeout = self.config.busy_timeout;
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| lock_timeout_or(e, busy_timeout))
    }

    /// Verifies database integrity using `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseCorruption` if the check reports anything but `ok`.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}

fn lock_timeout_or(err: rusqlite::Error, busy_timeout: Duration) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            // Round up so a sub-second timeout never reports 0s.
            Error::LockTimeout {
                seconds: busy_timeout.as_secs() + u64::from(busy_timeout.subsec_nanos() > 0),
            }
        }
        other => Error::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());

        let journal_mode: String = db
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");

        let foreign_keys: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_write_lock_held_elsewhere_is_lock_timeout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let holder = Database::open(DatabaseConfig::new(&path)).unwrap();
        let mut waiter = Database::open(
            DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(50)),
        )
        .unwrap();

        holder.connection().execute_batch("BEGIN IMMEDIATE").unwrap();

        let err = waiter.begin_immediate().unwrap_err();
        assert!(
            matches!(err, Error::LockTimeout { seconds: 1 }),
            "expected lock timeout, got {err}"
        );
        assert!(err.is_lock_timeout());

        holder.connection().execute_batch("ROLLBACK").unwrap();
        waiter.begin_immediate().unwrap().commit().unwrap();
    }

    #[test]
    fn test_oversized_busy_timeout_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let config =
            DatabaseConfig::new(&path).with_busy_timeout(Duration::from_secs(u64::from(u32::MAX)));

        let err = Database::open(config).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "busy_timeout"));
    }

    #[test]
    fn test_database_auto_create_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("test.db");
        assert!(!path.parent().unwrap().exists());

        let _db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_database_missing_without_auto_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("test.db");
        let err = Database::open(DatabaseConfig::new(&path).without_auto_create()).unwrap_err();
        assert!(matches!(err, Error::DataDirectoryNotFound { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_database_read_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        Database::open(DatabaseConfig::new(&path)).unwrap();

        let db = Database::open(DatabaseConfig::new(&path).read_only()).unwrap();
        let result = db.connection().execute("CREATE TABLE test (id INTEGER)", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_integrity() {
        let dir = tempdir().unwrap();
        let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
        db.verify_integrity().unwrap();
    }
}
