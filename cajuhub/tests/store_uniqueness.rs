//! The store itself refuses a second confirmed row for a slot, whatever
//! path the write takes.

mod support;

use cajuhub::{Database, Role, SlotKey};
use chrono::NaiveDate;
use rusqlite::params;

use support::{add_space, add_user, TestStore};

fn slot(space: cajuhub::SpaceId) -> SlotKey {
    SlotKey::new(
        space,
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        "afternoon".parse().unwrap(),
    )
}

#[test]
fn test_second_confirmed_insert_is_slot_conflict() {
    let store = TestStore::new();
    let mut db = store.open();
    let a = add_user(&mut db, "a@example.com", Role::User);
    let b = add_user(&mut db, "b@example.com", Role::User);
    let space = add_space(&mut db, "S1");

    db.insert_confirmed_reservation(&slot(space), a.id, None)
        .unwrap();
    let err = db
        .insert_confirmed_reservation(&slot(space), b.id, Some("me too"))
        .unwrap_err();
    assert!(err.is_slot_conflict());
    assert_eq!(
        Database::count_confirmed_for_slot(db.connection(), &slot(space)).unwrap(),
        1
    );
}

#[test]
fn test_raw_sql_cannot_bypass_index() {
    let store = TestStore::new();
    let mut db = store.open();
    let a = add_user(&mut db, "a@example.com", Role::User);
    let space = add_space(&mut db, "S1");
    db.insert_confirmed_reservation(&slot(space), a.id, None)
        .unwrap();

    let result = db.connection().execute(
        "INSERT INTO reservations (space_id, user_id, reservation_date, shift, status, created_at)
         VALUES (?1, ?2, '2025-03-10', 'afternoon', 'confirmed', 0)",
        params![space.value(), a.id.value()],
    );
    let err = result.unwrap_err();
    assert_eq!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    );
}

#[test]
fn test_cancelled_rows_do_not_block() {
    let store = TestStore::new();
    let mut db = store.open();
    let a = add_user(&mut db, "a@example.com", Role::User);
    let space = add_space(&mut db, "S1");

    for _ in 0..3 {
        let r = db
            .insert_confirmed_reservation(&slot(space), a.id, None)
            .unwrap();
        db.cancel_confirmed_reservation(r.id()).unwrap();
    }
    db.insert_confirmed_reservation(&slot(space), a.id, None)
        .unwrap();

    let total: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(
        Database::count_confirmed_for_slot(db.connection(), &slot(space)).unwrap(),
        1
    );
}
