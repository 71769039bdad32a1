//! Space catalog storage.

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::space::{Space, SpaceCatalog, SpaceDraft, SpaceId};

use super::connection::Database;

const SPACE_COLUMNS: &str =
    "id, name, description, size, capacity, price_per_shift_cents, amenities, image_url, is_active";

const INSERT_SPACE: &str = r"
    INSERT INTO spaces
    (name, description, size, capacity, price_per_shift_cents, amenities, image_url, is_active)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

const UPDATE_SPACE: &str = r"
    UPDATE spaces
    SET name = ?1, description = ?2, size = ?3, capacity = ?4,
        price_per_shift_cents = ?5, amenities = ?6, image_url = ?7, is_active = ?8
    WHERE id = ?9
";

fn row_to_space(row: &rusqlite::Row<'_>) -> rusqlite::Result<Space> {
    let amenities: String = row.get(6)?;
    let amenities: Vec<String> = serde_json::from_str(&amenities).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Space {
        id: SpaceId::new(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        size: row.get(3)?,
        capacity: row.get(4)?,
        price_per_shift_cents: row.get(5)?,
        amenities,
        image_url: row.get(7)?,
        is_active: row.get(8)?,
    })
}

fn amenities_json(draft: &SpaceDraft) -> Result<String> {
    serde_json::to_string(&draft.amenities).map_err(|e| Error::Validation {
        field: "amenities".into(),
        message: e.to_string(),
    })
}

impl Database {
    /// Inserts a space from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_space(&mut self, draft: &SpaceDraft) -> Result<Space> {
        let amenities = amenities_json(draft)?;
        let tx = self.begin_immediate()?;
        tx.execute(
            INSERT_SPACE,
            params![
                draft.name,
                draft.description,
                draft.size,
                draft.capacity,
                draft.price_per_shift_cents,
                amenities,
                draft.image_url,
                draft.is_active,
            ],
        )?;
        let id = SpaceId::new(tx.last_insert_rowid());
        tx.commit()?;

        Ok(Space {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            size: draft.size.clone(),
            capacity: draft.capacity,
            price_per_shift_cents: draft.price_per_shift_cents,
            amenities: draft.amenities.clone(),
            image_url: draft.image_url.clone(),
            is_active: draft.is_active,
        })
    }

    /// Replaces the editable attributes of a space.
    ///
    /// Existing reservations keep pointing at the same space id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the space does not exist.
    pub fn update_space(&mut self, id: SpaceId, draft: &SpaceDraft) -> Result<Space> {
        let amenities = amenities_json(draft)?;
        let tx = self.begin_immediate()?;
        let changed = tx.execute(
            UPDATE_SPACE,
            params![
                draft.name,
                draft.description,
                draft.size,
                draft.capacity,
                draft.price_per_shift_cents,
                amenities,
                draft.image_url,
                draft.is_active,
                id.value(),
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("space {id}"),
            });
        }
        let space = Self::get_space(&tx, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("space {id}"),
        })?;
        tx.commit()?;
        Ok(space)
    }

    /// Reads a space by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_space(conn: &Connection, id: SpaceId) -> Result<Option<Space>> {
        let sql = format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE id = ?1");
        match conn.query_row(&sql, params![id.value()], row_to_space) {
            Ok(space) => Ok(Some(space)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists spaces by name, optionally including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_spaces(conn: &Connection, include_inactive: bool) -> Result<Vec<Space>> {
        let sql = format!(
            "SELECT {SPACE_COLUMNS} FROM spaces WHERE (?1 OR is_active = 1) ORDER BY name, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![include_inactive], row_to_space)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }
}

impl SpaceCatalog for Database {
    fn find_space(&self, id: SpaceId) -> Result<Option<Space>> {
        Self::get_space(&self.conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;

    fn draft(name: &str) -> SpaceDraft {
        let mut draft = SpaceDraft::new(name, 10, 12_500);
        draft.amenities = vec!["wifi".into(), "coffee".into()];
        draft.validate().unwrap()
    }

    #[test]
    fn test_insert_and_get_space() {
        let mut db = create_test_database();
        let space = db.insert_space(&draft("Sala Caju")).unwrap();

        let loaded = Database::get_space(db.connection(), space.id).unwrap().unwrap();
        assert_eq!(loaded, space);
        assert_eq!(loaded.amenities, vec!["wifi", "coffee"]);
        assert!(db.is_active(space.id).unwrap());
    }

    #[test]
    fn test_update_space() {
        let mut db = create_test_database();
        let space = db.insert_space(&draft("Sala")).unwrap();

        let mut changes = draft("Sala Grande");
        changes.is_active = false;
        let updated = db.update_space(space.id, &changes).unwrap();
        assert_eq!(updated.id, space.id);
        assert_eq!(updated.name, "Sala Grande");
        assert!(!db.is_active(space.id).unwrap());
    }

    #[test]
    fn test_update_unknown_space() {
        let mut db = create_test_database();
        let err = db.update_space(SpaceId::new(5), &draft("X")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_spaces_hides_inactive_by_default() {
        let mut db = create_test_database();
        db.insert_space(&draft("B")).unwrap();
        let mut inactive = draft("A");
        inactive.is_active = false;
        db.insert_space(&inactive).unwrap();

        let active = Database::list_spaces(db.connection(), false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "B");

        let all = Database::list_spaces(db.connection(), true).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_find_space_missing() {
        let db = create_test_database();
        assert!(db.find_space(SpaceId::new(1)).unwrap().is_none());
        assert!(!db.is_active(SpaceId::new(1)).unwrap());
    }
}
