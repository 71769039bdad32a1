//! Administrative management of the space catalog.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::Principal;
use crate::space::{Space, SpaceDraft, SpaceId};

/// Space CRUD with admin-only writes.
pub struct SpaceManager<'a> {
    db: &'a mut Database,
}

impl<'a> SpaceManager<'a> {
    /// Creates a manager over an open database.
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Adds a space to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins and `Validation` for a bad draft.
    pub fn create(&mut self, principal: &Principal, draft: SpaceDraft) -> Result<Space> {
        require_admin(principal, "create spaces")?;
        let draft = draft.validate()?;
        let space = self.db.insert_space(&draft)?;
        log::info!("space {} '{}' created", space.id, space.name);
        Ok(space)
    }

    /// Replaces the editable attributes of a space.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, `Validation` for a bad draft and
    /// `NotFound` for an unknown id.
    pub fn update(&mut self, principal: &Principal, id: SpaceId, draft: SpaceDraft) -> Result<Space> {
        require_admin(principal, "edit spaces")?;
        let draft = draft.validate()?;
        let space = self.db.update_space(id, &draft)?;
        log::info!("space {} '{}' updated", space.id, space.name);
        Ok(space)
    }

    /// Lists spaces by name.
    ///
    /// Anyone may list active spaces; inactive ones are shown to admins only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when a non-admin asks for inactive spaces.
    pub fn list(&self, principal: Option<&Principal>, include_inactive: bool) -> Result<Vec<Space>> {
        if include_inactive {
            match principal {
                Some(p) => require_admin(p, "list inactive spaces")?,
                None => {
                    return Err(Error::Unauthenticated {
                        reason: "listing inactive spaces requires an admin session".into(),
                    })
                }
            }
        }
        Database::list_spaces(self.db.connection(), include_inactive)
    }

    /// Shows one space.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn show(&self, id: SpaceId) -> Result<Space> {
        Database::get_space(self.db.connection(), id)?.ok_or_else(|| Error::NotFound {
            resource: format!("space {id}"),
        })
    }
}

fn require_admin(principal: &Principal, action: &str) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(Error::Forbidden {
            details: format!("only administrators may {action}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, create_test_user};
    use crate::identity::Role;

    #[test]
    fn test_admin_creates_and_updates() {
        let mut db = create_test_database();
        let admin = create_test_user(&mut db, "admin@example.com", Role::Admin).principal();

        let mut spaces = SpaceManager::new(&mut db);
        let space = spaces
            .create(&admin, SpaceDraft::new("Sala Caju", 12, 20_000))
            .unwrap();

        let mut changes = SpaceDraft::new("Sala Caju", 14, 22_000);
        changes.is_active = false;
        let updated = spaces.update(&admin, space.id, changes).unwrap();
        assert_eq!(updated.capacity, 14);
        assert!(!updated.is_active);
        assert_eq!(spaces.show(space.id).unwrap(), updated);
    }

    #[test]
    fn test_user_cannot_write() {
        let mut db = create_test_database();
        let user = create_test_user(&mut db, "ana@example.com", Role::User).principal();

        let mut spaces = SpaceManager::new(&mut db);
        let err = spaces
            .create(&user, SpaceDraft::new("Sala", 2, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        let err = spaces
            .update(&user, SpaceId::new(1), SpaceDraft::new("Sala", 2, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[test]
    fn test_invalid_draft_rejected() {
        let mut db = create_test_database();
        let admin = create_test_user(&mut db, "admin@example.com", Role::Admin).principal();
        let mut spaces = SpaceManager::new(&mut db);
        let err = spaces.create(&admin, SpaceDraft::new("", 2, 0)).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_list_visibility() {
        let mut db = create_test_database();
        let admin = create_test_user(&mut db, "admin@example.com", Role::Admin).principal();
        let user = create_test_user(&mut db, "ana@example.com", Role::User).principal();

        let mut spaces = SpaceManager::new(&mut db);
        spaces.create(&admin, SpaceDraft::new("Open", 2, 0)).unwrap();
        let mut closed = SpaceDraft::new("Closed", 2, 0);
        closed.is_active = false;
        spaces.create(&admin, closed).unwrap();

        assert_eq!(spaces.list(None, false).unwrap().len(), 1);
        assert_eq!(spaces.list(Some(&admin), true).unwrap().len(), 2);
        assert!(matches!(
            spaces.list(Some(&user), true).unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            spaces.list(None, true).unwrap_err(),
            Error::Unauthenticated { .. }
        ));
    }

    #[test]
    fn test_show_unknown() {
        let mut db = create_test_database();
        let spaces = SpaceManager::new(&mut db);
        assert!(spaces.show(SpaceId::new(9)).unwrap_err().is_not_found());
    }
}
