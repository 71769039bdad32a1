//! Property-based tests for the reservation lifecycle.
//!
//! Each case runs against a fresh on-disk database, so case counts are kept
//! low compared to the pure-value properties elsewhere.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::database::test_util::{create_test_database, create_test_space, create_test_user};
use crate::database::Database;
use crate::identity::Role;
use crate::operations::{Page, ReservationManager, ReservationRequest};
use crate::{Error, ReservationId, Shift, SlotKey, SpaceId};

fn shift_strategy() -> impl Strategy<Value = Shift> {
    prop_oneof![
        Just(Shift::Morning),
        Just(Shift::Afternoon),
        Just(Shift::Evening)
    ]
}

// Three spaces, a week of dates, three shifts: small enough to collide often.
fn slot_strategy() -> impl Strategy<Value = (usize, u32, Shift)> {
    (0usize..3, 1u32..=7, shift_strategy())
}

#[derive(Debug, Clone)]
enum Op {
    Create { user: usize, slot: (usize, u32, Shift) },
    Cancel { user: usize, pick: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..3, slot_strategy()).prop_map(|(user, slot)| Op::Create { user, slot }),
        1 => (0usize..3, 0usize..32).prop_map(|(user, pick)| Op::Cancel { user, pick }),
    ]
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    // After a create, exactly that triple is occupied.
    #[test]
    fn create_occupies_exact_slot(
        target in slot_strategy(),
        probe in slot_strategy(),
    ) {
        let mut db = create_test_database();
        let user = create_test_user(&mut db, "p@example.com", Role::User).principal();
        let spaces: Vec<SpaceId> = (0..3)
            .map(|i| create_test_space(&mut db, &format!("S{i}")))
            .collect();

        let (space, day, shift) = target;
        let mut manager = ReservationManager::new(&mut db);
        manager
            .create(
                &user,
                ReservationRequest::new(spaces[space].value(), date(day).to_string(), shift.as_str()),
            )
            .unwrap();
        drop(manager);

        let (p_space, p_day, p_shift) = probe;
        let probe_key = SlotKey::new(spaces[p_space], date(p_day), p_shift);
        let occupied = Database::is_slot_occupied(db.connection(), &probe_key).unwrap();
        prop_assert_eq!(occupied, probe == target);
    }

    // Any interleaving of creates and cancels agrees with a simple model and
    // never leaves two confirmed reservations on one slot.
    #[test]
    fn lifecycle_matches_model(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let mut db = create_test_database();
        let users: Vec<_> = (0..3)
            .map(|i| create_test_user(&mut db, &format!("u{i}@example.com"), Role::User).principal())
            .collect();
        let spaces: Vec<SpaceId> = (0..3)
            .map(|i| create_test_space(&mut db, &format!("S{i}")))
            .collect();

        // slot -> (reservation, holder index)
        let mut held: HashMap<(usize, u32, Shift), (ReservationId, usize)> = HashMap::new();
        let mut created: Vec<(ReservationId, usize, (usize, u32, Shift))> = Vec::new();

        let mut manager = ReservationManager::new(&mut db);
        for op in ops {
            match op {
                Op::Create { user, slot } => {
                    let (space, day, shift) = slot;
                    let result = manager.create(
                        &users[user],
                        ReservationRequest::new(spaces[space].value(), date(day).to_string(), shift.as_str()),
                    );
                    if held.contains_key(&slot) {
                        prop_assert!(matches!(result, Err(Error::SlotConflict { .. })));
                    } else {
                        let reservation = result.unwrap();
                        held.insert(slot, (reservation.id(), user));
                        created.push((reservation.id(), user, slot));
                    }
                }
                Op::Cancel { user, pick } => {
                    if created.is_empty() {
                        continue;
                    }
                    let (id, holder, slot) = created[pick % created.len()];
                    let result = manager.cancel(&users[user], id);
                    if user != holder {
                        prop_assert!(matches!(result, Err(Error::Forbidden { .. })));
                    } else if held.get(&slot).map(|(r, _)| *r) == Some(id) {
                        prop_assert!(result.is_ok());
                        held.remove(&slot);
                    } else {
                        prop_assert!(matches!(result, Err(Error::StateConflict { .. })));
                    }
                }
            }
        }

        for (i, user) in users.iter().enumerate() {
            let visible = manager.list(user, Page::all()).unwrap();
            let expected = created.iter().filter(|(_, holder, _)| *holder == i).count();
            prop_assert_eq!(visible.len(), expected);
        }
        drop(manager);

        for (space, day, shift) in held.keys().copied() {
            let key = SlotKey::new(spaces[space], date(day), shift);
            prop_assert_eq!(Database::count_confirmed_for_slot(db.connection(), &key).unwrap(), 1);
        }
    }
}
