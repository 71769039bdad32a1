//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};

use cajuhub::database::{Database, DatabaseConfig};
use cajuhub::{Registration, Role, SpaceDraft, SpaceId, User};
use tempfile::TempDir;

/// A database file in a temporary directory that lives as long as the fixture.
pub struct TestStore {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("cajuhub.db")
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Opens a fresh connection to the store.
    pub fn open(&self) -> Database {
        Database::open(DatabaseConfig::new(self.path())).unwrap()
    }
}

/// Inserts a user without paying for a real password hash.
#[allow(dead_code)]
pub fn add_user(db: &mut Database, email: &str, role: Role) -> User {
    let registration = Registration::new("Tester", email, "unused")
        .validate()
        .unwrap();
    db.create_user(&registration, "not-a-real-hash", role).unwrap()
}

/// Inserts an active space.
#[allow(dead_code)]
pub fn add_space(db: &mut Database, name: &str) -> SpaceId {
    let draft = SpaceDraft::new(name, 8, 15_000).validate().unwrap();
    db.insert_space(&draft).unwrap().id
}
