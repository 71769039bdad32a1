//! End-to-end walkthrough of the reservation lifecycle.

mod support;

use cajuhub::operations::{Page, ReservationManager, ReservationRequest};
use cajuhub::{Error, ErrorKind, Principal, ReservationStatus, Role, SlotLedger};
use chrono::NaiveDate;

use support::{add_space, add_user, TestStore};

#[test]
fn test_booking_walkthrough() {
    let store = TestStore::new();
    let mut db = store.open();
    let u1 = add_user(&mut db, "u1@example.com", Role::User).principal();
    let u2 = add_user(&mut db, "u2@example.com", Role::User).principal();
    let s1 = add_space(&mut db, "S1");

    let request = || ReservationRequest::new(s1.value(), "2025-03-10", "morning");

    let mut manager = ReservationManager::new(&mut db);

    // U1 books the slot.
    let r1 = manager.create(&u1, request()).unwrap();
    assert_eq!(r1.status(), ReservationStatus::Confirmed);
    assert_eq!(r1.holder(), u1.id);

    // U2 loses the same slot.
    let err = manager.create(&u2, request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SlotConflict);
    assert!(err.to_string().contains("slot already booked"));

    // U2 may not cancel U1's reservation.
    let err = manager.cancel(&u2, r1.id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // U1 cancels, then U2 books.
    let cancelled = manager.cancel(&u1, r1.id()).unwrap();
    assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
    assert!(cancelled.cancelled_at().is_some());

    let r2 = manager.create(&u2, request()).unwrap();
    assert_ne!(r2.id(), r1.id());

    // Each user sees only their own rows.
    let u1_rows = manager.list(&u1, Page::all()).unwrap();
    assert_eq!(u1_rows.len(), 1);
    assert_eq!(u1_rows[0].reservation.status(), ReservationStatus::Cancelled);
    assert_eq!(u1_rows[0].space_name, "S1");

    let u2_rows = manager.list(&u2, Page::all()).unwrap();
    assert_eq!(u2_rows.len(), 1);
    assert_eq!(u2_rows[0].reservation.status(), ReservationStatus::Confirmed);
    drop(manager);

    let slot = r2.slot();
    assert_eq!(slot.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    assert!(SlotLedger::new(&mut db).is_occupied(slot).unwrap());
}

#[test]
fn test_admin_sees_everything_newest_first() {
    let store = TestStore::new();
    let mut db = store.open();
    let u1 = add_user(&mut db, "u1@example.com", Role::User).principal();
    let u2 = add_user(&mut db, "u2@example.com", Role::User).principal();
    let admin = add_user(&mut db, "root@example.com", Role::Admin).principal();
    let space = add_space(&mut db, "Auditorio").value();

    let mut manager = ReservationManager::new(&mut db);
    manager
        .create(&u1, ReservationRequest::new(space, "2025-03-10", "morning"))
        .unwrap();
    manager
        .create(&u2, ReservationRequest::new(space, "2025-03-10", "evening"))
        .unwrap();
    manager
        .create(&u1, ReservationRequest::new(space, "2025-03-11", "afternoon"))
        .unwrap();

    let rows = manager.list(&admin, Page::all()).unwrap();
    let order: Vec<_> = rows
        .iter()
        .map(|d| d.reservation.slot().to_string())
        .collect();
    assert_eq!(
        order,
        vec![
            format!("space:{space}/2025-03-11/afternoon"),
            format!("space:{space}/2025-03-10/evening"),
            format!("space:{space}/2025-03-10/morning"),
        ]
    );

    let page = manager.list(&admin, Page::new(1, 1)).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].reservation.id(), rows[1].reservation.id());

    // Admins may cancel anyone's reservation.
    manager.cancel(&admin, rows[1].reservation.id()).unwrap();
}

#[test]
fn test_invalid_requests_write_nothing() {
    let store = TestStore::new();
    let mut db = store.open();
    let user: Principal = add_user(&mut db, "u@example.com", Role::User).principal();
    let space = add_space(&mut db, "S1").value();

    let mut manager = ReservationManager::new(&mut db);
    let cases = [
        (ReservationRequest::default(), "space_id"),
        (ReservationRequest::new(space, "10/03/2025", "morning"), "reservation_date"),
        (ReservationRequest::new(space, "2025-03-10", "night"), "shift"),
        (
            ReservationRequest::new(space, "2025-03-10", "morning").with_notes("x".repeat(501)),
            "notes",
        ),
    ];
    for (request, expected) in cases {
        let err = manager.create(&user, request).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == expected),
            "expected {expected}, got {err}"
        );
    }

    let err = manager
        .create(&user, ReservationRequest::new(9999, "2025-03-10", "morning"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(manager.list(&user, Page::all()).unwrap().is_empty());
}

#[test]
fn test_state_survives_reopen() {
    let store = TestStore::new();
    let (user, id) = {
        let mut db = store.open();
        let user = add_user(&mut db, "u@example.com", Role::User).principal();
        let space = add_space(&mut db, "S1").value();
        let id = ReservationManager::new(&mut db)
            .create(&user, ReservationRequest::new(space, "2025-03-10", "evening"))
            .unwrap()
            .id();
        (user, id)
    };

    let mut db = store.open();
    let manager = ReservationManager::new(&mut db);
    let reservation = manager.get(&user, id).unwrap();
    assert!(reservation.is_confirmed());
}
