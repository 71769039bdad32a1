//! Shared fixtures for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::identity::{Registration, Role, User};
use crate::space::{SpaceDraft, SpaceId};

/// Creates a temporary test database that lives for the rest of the test.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for as long as the connection.
    std::mem::forget(dir);

    db
}

/// Inserts a user with a placeholder password hash.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn create_test_user(db: &mut Database, email: &str, role: Role) -> User {
    let registration = Registration::new("Test User", email, "unused")
        .validate()
        .unwrap();
    db.create_user(&registration, "test-hash", role).unwrap()
}

/// Inserts an active space and returns its id.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn create_test_space(db: &mut Database, name: &str) -> SpaceId {
    let draft = SpaceDraft::new(name, 8, 10_000).validate().unwrap();
    db.insert_space(&draft).unwrap().id
}
