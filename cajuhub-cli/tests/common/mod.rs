//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const DATE: &str = "2031-03-10";

/// An isolated data directory plus the commands to drive it.
pub struct TestEnv {
    temp_dir: TempDir,
    pub data_dir: PathBuf,
}

impl TestEnv {
    /// Create an environment whose data directory does not exist yet.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("cajuhub-data");
        Self { temp_dir, data_dir }
    }

    /// Create an environment initialized with an administrator.
    pub fn with_admin() -> Self {
        let env = Self::new();
        env.command()
            .args(["init", "--admin-email", ADMIN_EMAIL])
            .args(["--admin-name", "Root", "--admin-password", ADMIN_PASSWORD])
            .assert()
            .success();
        env
    }

    /// The binary without any flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("cajuhub").expect("Failed to find cajuhub binary");
        cmd.env_remove("CAJUHUB_TOKEN")
            .env_remove("CAJUHUB_DATA_DIR")
            .env_remove("CAJUHUB_LOG_MODE");
        cmd
    }

    /// The binary pointed at this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// The binary acting with a given session token.
    pub fn as_user(&self, token: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("--token").arg(token);
        cmd
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("cajuhub.db")
    }

    /// Register a user and return its id.
    pub fn register(&self, name: &str, email: &str, password: &str) -> i64 {
        let output = self
            .command()
            .args(["register", "--name", name, "--email", email])
            .args(["--password", password])
            .output()
            .expect("Failed to run register");
        assert!(output.status.success(), "register failed: {output:?}");
        parse_stdout(&output.stdout)
            .parse()
            .expect("register should print a user id")
    }

    /// Log in without saving the session and return the token.
    pub fn login(&self, email: &str, password: &str) -> String {
        let output = self
            .command()
            .args(["login", "--no-save", "--email", email, "--password", password])
            .output()
            .expect("Failed to run login");
        assert!(output.status.success(), "login failed: {output:?}");
        parse_stdout(&output.stdout)
    }

    pub fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD)
    }

    /// Register and log in a regular user.
    pub fn user_token(&self, name: &str, email: &str) -> String {
        self.register(name, email, "caju123");
        self.login(email, "caju123")
    }

    /// Add an active space as admin and return its id.
    pub fn add_space(&self, admin_token: &str, name: &str) -> i64 {
        let output = self
            .as_user(admin_token)
            .args(["space", "add", "--name", name, "--capacity", "4"])
            .args(["--price", "5000", "--amenity", "wifi"])
            .output()
            .expect("Failed to run space add");
        assert!(output.status.success(), "space add failed: {output:?}");
        parse_stdout(&output.stdout)
            .parse()
            .expect("space add should print a space id")
    }

    /// Reserve a slot and return the new reservation id.
    pub fn reserve(&self, token: &str, space: i64, date: &str, shift: &str) -> i64 {
        let output = self
            .as_user(token)
            .args(["reserve", "--space", &space.to_string()])
            .args(["--date", date, "--shift", shift])
            .output()
            .expect("Failed to run reserve");
        assert!(output.status.success(), "reserve failed: {output:?}");
        parse_stdout(&output.stdout)
            .parse()
            .expect("reserve should print a reservation id")
    }
}

/// Trimmed stdout as a string.
pub fn parse_stdout(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout).trim().to_string()
}
