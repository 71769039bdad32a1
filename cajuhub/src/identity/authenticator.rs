//! Registration, login and session bookkeeping.

use std::time::{Duration, SystemTime};

use crate::database::Database;
use crate::error::{Error, Result};

use super::password::{hash_password, verify_password};
use super::session::{Session, SessionToken};
use super::{Principal, Registration, Role, User};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const BAD_CREDENTIALS: &str = "invalid email or password";

/// Password authentication over the user and session tables.
///
/// Unknown emails and wrong passwords produce the same error so that a
/// caller cannot probe which addresses are registered.
pub struct Authenticator<'a> {
    db: &'a mut Database,
    session_ttl: Duration,
}

impl<'a> Authenticator<'a> {
    /// Creates an authenticator issuing sessions with the default lifetime.
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Overrides the lifetime of issued sessions.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Registers a regular user.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a missing field or an email that is already
    /// registered.
    pub fn register(&mut self, registration: Registration) -> Result<User> {
        self.create_with_role(registration, Role::User)
    }

    /// Registers an administrator. Used to bootstrap a fresh store.
    ///
    /// # Errors
    ///
    /// Same as [`Authenticator::register`].
    pub fn create_admin(&mut self, registration: Registration) -> Result<User> {
        self.create_with_role(registration, Role::Admin)
    }

    fn create_with_role(&mut self, registration: Registration, role: Role) -> Result<User> {
        let registration = registration.validate()?;
        let hash = hash_password(&registration.password)?;
        let user = self.db.create_user(&registration, &hash, role)?;
        log::info!("registered {} user {} ({})", role.as_str(), user.id, user.email);
        Ok(user)
    }

    /// Grants the admin role to the user with `email`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless `principal` is an admin, and `NotFound`
    /// for an unknown email.
    pub fn promote(&mut self, principal: &Principal, email: &str) -> Result<User> {
        if !principal.is_admin() {
            return Err(Error::Forbidden {
                details: "only admins can promote users".into(),
            });
        }
        let user = self.db.set_user_role(email, Role::Admin)?;
        log::info!("user {} promoted to admin by {}", user.id, principal.id);
        Ok(user)
    }

    /// Verifies credentials and opens a session.
    ///
    /// With `require_admin`, a valid login by a non-admin is rejected the same
    /// way as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if either field is blank or the session lifetime
    /// overflows, and `Unauthenticated` if the credentials do not match.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        require_admin: bool,
    ) -> Result<(User, Session)> {
        if email.trim().is_empty() {
            return Err(Error::Validation {
                field: "email".into(),
                message: "email is required".into(),
            });
        }
        if password.is_empty() {
            return Err(Error::Validation {
                field: "password".into(),
                message: "password is required".into(),
            });
        }

        let Some((user, hash)) = Database::find_credentials(self.db.connection(), email)? else {
            log::debug!("login rejected: unknown email");
            return Err(bad_credentials());
        };
        if !verify_password(password, &hash) {
            log::debug!("login rejected for user {}: wrong password", user.id);
            return Err(bad_credentials());
        }
        if require_admin && user.role != Role::Admin {
            log::debug!("admin login rejected for user {}", user.id);
            return Err(bad_credentials());
        }

        let purged = self.db.purge_expired_sessions(SystemTime::now())?;
        if purged > 0 {
            log::debug!("purged {purged} expired sessions");
        }

        let session = Session::open(user.id, self.session_ttl)?;
        self.db.insert_session(&session)?;
        log::info!("user {} logged in", user.id);
        Ok((user, session))
    }

    /// Ends a session. Returns whether it existed; ending an unknown
    /// session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn logout(&mut self, token: &SessionToken) -> Result<bool> {
        let existed = self.db.delete_session(token)?;
        if existed {
            log::info!("session closed");
        }
        Ok(existed)
    }

    /// Returns the user behind a live session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn session(&self, token: &SessionToken) -> Result<Option<User>> {
        Database::find_session_user(self.db.connection(), token, SystemTime::now())
    }
}

fn bad_credentials() -> Error {
    Error::Unauthenticated {
        reason: BAD_CREDENTIALS.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;
    use crate::identity::PrincipalResolver;

    fn ana() -> Registration {
        Registration::new("Ana", "ana@example.com", "caju123")
    }

    #[test]
    fn test_register_then_login() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);

        let user = auth.register(ana()).unwrap();
        assert_eq!(user.role, Role::User);

        let (logged_in, session) = auth.login("ANA@example.com", "caju123", false).unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(session.user_id, user.id);

        let current = auth.session(&session.token).unwrap().unwrap();
        assert_eq!(current.id, user.id);

        drop(auth);
        assert_eq!(db.resolve(&session.token).unwrap(), Principal::user(user.id));
    }

    #[test]
    fn test_register_requires_fields() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);

        let err = auth
            .register(Registration::new("", "a@example.com", "pw"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "name"));

        let err = auth
            .register(Registration::new("A", "a@example.com", ""))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "password"));
    }

    #[test]
    fn test_wrong_password_and_unknown_email_look_the_same() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);
        auth.register(ana()).unwrap();

        let wrong = auth.login("ana@example.com", "nope", false).unwrap_err();
        let unknown = auth.login("bob@example.com", "caju123", false).unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_admin_login() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);
        auth.register(ana()).unwrap();
        auth.create_admin(Registration::new("Root", "root@example.com", "root"))
            .unwrap();

        assert!(auth.login("ana@example.com", "caju123", true).is_err());
        let (admin, _) = auth.login("root@example.com", "root", true).unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn test_promote_requires_admin() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);
        let user = auth.register(ana()).unwrap();
        let admin = auth
            .create_admin(Registration::new("Root", "root@example.com", "root"))
            .unwrap();

        let err = auth.promote(&user.principal(), "ana@example.com").unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        let promoted = auth.promote(&admin.principal(), "ana@example.com").unwrap();
        assert_eq!(promoted.role, Role::Admin);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db);
        auth.register(ana()).unwrap();
        let (_, session) = auth.login("ana@example.com", "caju123", false).unwrap();

        assert!(auth.logout(&session.token).unwrap());
        assert!(!auth.logout(&session.token).unwrap());
        assert!(auth.session(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_does_not_resolve() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db).with_session_ttl(Duration::ZERO);
        auth.register(ana()).unwrap();
        let (_, session) = auth.login("ana@example.com", "caju123", false).unwrap();

        assert!(auth.session(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_oversized_session_ttl_is_validation_error() {
        let mut db = create_test_database();
        let mut auth = Authenticator::new(&mut db).with_session_ttl(Duration::MAX);
        auth.register(ana()).unwrap();

        let err = auth.login("ana@example.com", "caju123", false).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
