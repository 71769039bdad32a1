//! User accounts and login sessions.

use std::time::SystemTime;

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::identity::{
    normalize_email, Principal, PrincipalResolver, Registration, Role, Session, SessionToken,
    User, UserId,
};

use super::connection::Database;
use super::reservations::{is_unique_violation, systemtime_to_unix_secs, unix_secs_to_systemtime};

const USER_COLUMNS: &str = "id, name, email, role, created_at";

const INSERT_USER: &str = r"
    INSERT INTO users (name, email, password_hash, role, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

const SELECT_CREDENTIALS: &str = r"
    SELECT id, name, email, role, created_at, password_hash
    FROM users WHERE email = ?1
";

const INSERT_SESSION: &str = r"
    INSERT INTO sessions (token, user_id, created_at, expires_at)
    VALUES (?1, ?2, ?3, ?4)
";

const SELECT_SESSION_USER: &str = r"
    SELECT u.id, u.name, u.email, u.role, u.created_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = ?1 AND s.expires_at > ?2
";

/// Expects row fields: id, name, email, role, `created_at`.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    let role: Role = role.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_secs: i64 = row.get(4)?;

    Ok(User {
        id: UserId::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        role,
        created_at: unix_secs_to_systemtime(created_secs),
    })
}

impl Database {
    /// Inserts a user account.
    ///
    /// The registration must already be validated; the password must already
    /// be hashed.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error on the `email` field if the address is
    /// already registered, or a database error.
    pub fn create_user(
        &mut self,
        registration: &Registration,
        password_hash: &str,
        role: Role,
    ) -> Result<User> {
        let created_at = SystemTime::now();
        let email = normalize_email(&registration.email);

        let tx = self.begin_immediate()?;

        match tx.execute(
            INSERT_USER,
            params![
                registration.name,
                email,
                password_hash,
                role.as_str(),
                systemtime_to_unix_secs(created_at)?,
            ],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Validation {
                    field: "email".into(),
                    message: format!("'{email}' is already registered"),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = UserId::new(tx.last_insert_rowid());
        tx.commit()?;

        Ok(User {
            id,
            name: registration.name.clone(),
            email,
            role,
            created_at: unix_secs_to_systemtime(systemtime_to_unix_secs(created_at)?),
        })
    }

    /// Reads a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        match conn.query_row(&sql, params![id.value()], row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a user and the stored password hash by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_credentials(conn: &Connection, email: &str) -> Result<Option<(User, String)>> {
        match conn.query_row(SELECT_CREDENTIALS, params![normalize_email(email)], |row| {
            Ok((row_to_user(row)?, row.get::<_, String>(5)?))
        }) {
            Ok(found) => Ok(Some(found)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Changes the role of a user identified by email.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no user has this email.
    pub fn set_user_role(&mut self, email: &str, role: Role) -> Result<User> {
        let email = normalize_email(email);
        let tx = self.begin_immediate()?;

        let changed = tx.execute(
            "UPDATE users SET role = ?1 WHERE email = ?2",
            params![role.as_str(), email],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("user '{email}'"),
            });
        }

        let user = tx.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            row_to_user,
        )?;
        tx.commit()?;
        Ok(user)
    }

    /// Counts administrator accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_admins(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM users WHERE role = 'admin'", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// Stores a freshly opened session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_session(&mut self, session: &Session) -> Result<()> {
        let tx = self.begin_immediate()?;
        tx.execute(
            INSERT_SESSION,
            params![
                session.token.as_str(),
                session.user_id.value(),
                systemtime_to_unix_secs(session.created_at)?,
                systemtime_to_unix_secs(session.expires_at)?,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Deletes a session. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, token: &SessionToken) -> Result<bool> {
        let tx = self.begin_immediate()?;
        let deleted = tx.execute("DELETE FROM sessions WHERE token = ?1", params![token.as_str()])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Removes sessions whose expiry has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn purge_expired_sessions(&mut self, now: SystemTime) -> Result<usize> {
        let tx = self.begin_immediate()?;
        let deleted = tx.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![systemtime_to_unix_secs(now)?],
        )?;
        tx.commit()?;
        Ok(deleted)
    }

    /// Returns the user owning a live session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_session_user(
        conn: &Connection,
        token: &SessionToken,
        now: SystemTime,
    ) -> Result<Option<User>> {
        match conn.query_row(
            SELECT_SESSION_USER,
            params![token.as_str(), systemtime_to_unix_secs(now)?],
            row_to_user,
        ) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl PrincipalResolver for Database {
    fn resolve(&self, token: &SessionToken) -> Result<Principal> {
        Self::find_session_user(&self.conn, token, SystemTime::now())?
            .map(|user| user.principal())
            .ok_or_else(|| Error::Unauthenticated {
                reason: "session is missing or expired".into(),
            })
    }
}
