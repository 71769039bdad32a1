//! The slot ledger: which slots are held, and the atomic claim on them.

use chrono::NaiveDate;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::reservation::{Reservation, ReservationId};
use crate::slot::{Shift, SlotKey};
use crate::space::SpaceId;

/// Authoritative record of occupied slots, backed by the store.
///
/// Occupancy reads reflect the store's committed state. [`SlotLedger::claim`]
/// relies on the store's insert-or-fail primitive; it never performs a
/// read-then-write, so callers in other threads or processes cannot both
/// win the same slot.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use cajuhub::database::{Database, DatabaseConfig};
/// use cajuhub::{Shift, SlotKey, SlotLedger, SpaceId, UserId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/cajuhub.db")).unwrap();
/// let slot = SlotKey::new(
///     SpaceId::new(1),
///     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
///     Shift::Morning,
/// );
///
/// let mut ledger = SlotLedger::new(&mut db);
/// if !ledger.is_occupied(&slot).unwrap() {
///     let reservation = ledger.claim(&slot, UserId::new(1), None).unwrap();
///     println!("claimed {}", reservation.id());
/// }
/// ```
pub struct SlotLedger<'a> {
    db: &'a mut Database,
}

impl<'a> SlotLedger<'a> {
    /// Creates a ledger over an open database.
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Returns true iff a confirmed reservation holds exactly this slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_occupied(&self, slot: &SlotKey) -> Result<bool> {
        Database::is_slot_occupied(self.db.connection(), slot)
    }

    /// Claims a slot for `holder`.
    ///
    /// # Errors
    ///
    /// Returns `SlotConflict` if the slot is already held, in which case
    /// nothing was written. Other store failures are passed through.
    pub fn claim(
        &mut self,
        slot: &SlotKey,
        holder: UserId,
        notes: Option<&str>,
    ) -> Result<Reservation> {
        log::debug!("claiming {slot} for user {holder}");
        match self.db.insert_confirmed_reservation(slot, holder, notes) {
            Ok(reservation) => {
                log::info!("reservation {} confirmed for {slot}", reservation.id());
                Ok(reservation)
            }
            Err(e @ Error::SlotConflict { .. }) => {
                log::warn!("claim on {slot} lost: slot already booked");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Releases a confirmed reservation, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `StateConflict` if the
    /// reservation is already cancelled; the row is left unchanged in both
    /// cases.
    pub fn release(&mut self, id: ReservationId) -> Result<Reservation> {
        let reservation = self.db.cancel_confirmed_reservation(id)?;
        log::info!("reservation {id} cancelled, {} released", reservation.slot());
        Ok(reservation)
    }

    /// Lists the shifts of a space already held on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn occupied_shifts(&self, space_id: SpaceId, date: NaiveDate) -> Result<Vec<Shift>> {
        Database::occupied_shifts(self.db.connection(), space_id, date)
    }

    /// Lists the shifts of a space still free on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn free_shifts(&self, space_id: SpaceId, date: NaiveDate) -> Result<Vec<Shift>> {
        let taken = self.occupied_shifts(space_id, date)?;
        Ok(Shift::ALL
            .into_iter()
            .filter(|shift| !taken.contains(shift))
            .collect())
    }
}
