//! Reservation storage: the insert-or-fail slot primitive and its queries.

use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::reservation::{Reservation, ReservationDetails, ReservationId, ReservationStatus};
use crate::slot::{format_date, parse_date, Shift, SlotKey};
use crate::space::SpaceId;

use super::connection::Database;

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Returns true if the error is a UNIQUE constraint violation.
pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Returns true if the error is a FOREIGN KEY constraint violation.
pub(super) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Deserializes a reservation from a row.
///
/// Expects row fields in this order: id, `space_id`, `user_id`,
/// `reservation_date`, shift, status, notes, `created_at`, `cancelled_at`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let space_id: i64 = row.get(1)?;
    let user_id: i64 = row.get(2)?;
    let date: String = row.get(3)?;
    let shift: String = row.get(4)?;
    let status: String = row.get(5)?;
    let notes: Option<String> = row.get(6)?;
    let created_secs: i64 = row.get(7)?;
    let cancelled_secs: Option<i64> = row.get(8)?;

    let date: NaiveDate = parse_date(&date).map_err(|e| conversion_error(3, e))?;
    let shift: Shift = shift.parse().map_err(|e| conversion_error(4, e))?;
    let status: ReservationStatus = status.parse().map_err(|e| conversion_error(5, e))?;

    let slot = SlotKey::new(SpaceId::new(space_id), date, shift);
    Reservation::builder(ReservationId::new(id), slot, UserId::new(user_id))
        .status(status)
        .notes(notes)
        .created_at(unix_secs_to_systemtime(created_secs))
        .cancelled_at(cancelled_secs.map(unix_secs_to_systemtime))
        .build()
        .map_err(|e| conversion_error(6, e))
}

/// Deserializes a reservation joined with its space name and price.
fn row_to_details(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReservationDetails> {
    Ok(ReservationDetails {
        reservation: row_to_reservation(row)?,
        space_name: row.get(9)?,
        price_per_shift_cents: row.get(10)?,
    })
}

const RESERVATION_COLUMNS: &str = "id, space_id, user_id, reservation_date, shift, status, notes, created_at, cancelled_at";

const INSERT_CONFIRMED: &str = r"
    INSERT INTO reservations
    (space_id, user_id, reservation_date, shift, status, notes, created_at)
    VALUES (?1, ?2, ?3, ?4, 'confirmed', ?5, ?6)
";

const MARK_CANCELLED: &str = r"
    UPDATE reservations
    SET status = 'cancelled', cancelled_at = ?1
    WHERE id = ?2 AND status = 'confirmed'
";

const COUNT_CONFIRMED_FOR_SLOT: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE space_id = ?1 AND reservation_date = ?2 AND shift = ?3 AND status = 'confirmed'
";

const SELECT_OCCUPIED_SHIFTS: &str = r"
    SELECT shift FROM reservations
    WHERE space_id = ?1 AND reservation_date = ?2 AND status = 'confirmed'
";

// Date descending, then shift latest-first, then newest id first.
const SELECT_DETAILS: &str = r"
    SELECT r.id, r.space_id, r.user_id, r.reservation_date, r.shift, r.status,
           r.notes, r.created_at, r.cancelled_at, s.name, s.price_per_shift_cents
    FROM reservations r
    JOIN spaces s ON s.id = r.space_id
    WHERE (?1 IS NULL OR r.user_id = ?1)
    ORDER BY r.reservation_date DESC,
             CASE r.shift WHEN 'evening' THEN 3 WHEN 'afternoon' THEN 2 ELSE 1 END DESC,
             r.id DESC
    LIMIT ?2 OFFSET ?3
";

/// Filter and page window for reservation listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    /// Only reservations held by this user; `None` lists everyone's.
    pub holder: Option<UserId>,
    /// Maximum number of rows; `None` is unbounded.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl ReservationQuery {
    /// Lists every reservation.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            holder: None,
            limit: None,
            offset: 0,
        }
    }

    /// Lists reservations held by `holder`.
    #[must_use]
    pub const fn held_by(holder: UserId) -> Self {
        Self {
            holder: Some(holder),
            limit: None,
            offset: 0,
        }
    }

    /// Restricts the result to a page.
    #[must_use]
    pub const fn page(mut self, limit: Option<u32>, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

impl Database {
    /// Inserts a confirmed reservation iff no confirmed row holds the slot.
    ///
    /// The check and the insert are one statement: the partial unique index
    /// on confirmed slots rejects the second of two racing inserts, so under
    /// any interleaving exactly one claim per slot succeeds. A rejected
    /// insert leaves no row behind.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `SlotConflict` if a confirmed reservation already holds the slot
    /// - `NotFound` if the space or the holder does not exist
    /// - `Validation` if the notes are too long
    /// - a database error otherwise, including busy timeouts
    pub fn insert_confirmed_reservation(
        &mut self,
        slot: &SlotKey,
        holder: UserId,
        notes: Option<&str>,
    ) -> Result<Reservation> {
        let created_at = SystemTime::now();
        let pending = Reservation::builder(ReservationId::new(0), *slot, holder)
            .notes(notes.map(str::to_string))
            .created_at(created_at)
            .build()?;

        let tx = self.begin_immediate()?;

        let inserted = tx.execute(
            INSERT_CONFIRMED,
            params![
                slot.space_id.value(),
                holder.value(),
                format_date(slot.date),
                slot.shift.as_str(),
                pending.notes(),
                systemtime_to_unix_secs(created_at)?,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::SlotConflict { slot: *slot });
            }
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(Error::NotFound {
                    resource: format!("space {} or user {}", slot.space_id, holder),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = ReservationId::new(tx.last_insert_rowid());
        tx.commit()?;

        Ok(pending.with_id(id))
    }

    /// Moves a confirmed reservation to cancelled.
    ///
    /// The update is conditional on the row still being confirmed, so a
    /// reservation is cancelled at most once even under concurrent calls.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if no reservation has this id
    /// - `StateConflict` if the reservation is already cancelled
    /// - a database error otherwise
    pub fn cancel_confirmed_reservation(&mut self, id: ReservationId) -> Result<Reservation> {
        let tx = self.begin_immediate()?;

        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let changed = tx.execute(MARK_CANCELLED, params![now, id.value()])?;

        let current = Self::get_reservation(&tx, id)?;
        let reservation = match (changed, current) {
            (_, None) => {
                return Err(Error::NotFound {
                    resource: format!("reservation {id}"),
                })
            }
            (0, Some(_)) => {
                return Err(Error::StateConflict {
                    details: format!("reservation {id} is already cancelled"),
                })
            }
            (_, Some(reservation)) => reservation,
        };

        tx.commit()?;
        Ok(reservation)
    }

    /// Reads a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
        let mut stmt = conn.prepare_cached(&sql)?;
        match stmt.query_row(params![id.value()], row_to_reservation) {
            Ok(reservation) => Ok(Some(reservation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Counts confirmed reservations for a slot. Never more than one.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_confirmed_for_slot(conn: &Connection, slot: &SlotKey) -> Result<i64> {
        let count = conn.query_row(
            COUNT_CONFIRMED_FOR_SLOT,
            params![
                slot.space_id.value(),
                format_date(slot.date),
                slot.shift.as_str()
            ],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Returns true iff a confirmed reservation holds exactly this slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_slot_occupied(conn: &Connection, slot: &SlotKey) -> Result<bool> {
        Ok(Self::count_confirmed_for_slot(conn, slot)? > 0)
    }

    /// Lists the shifts of a space already taken on a date, in day order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn occupied_shifts(
        conn: &Connection,
        space_id: SpaceId,
        date: NaiveDate,
    ) -> Result<Vec<Shift>> {
        let mut stmt = conn.prepare_cached(SELECT_OCCUPIED_SHIFTS)?;
        let rows = stmt.query_map(params![space_id.value(), format_date(date)], |row| {
            let shift: String = row.get(0)?;
            shift.parse::<Shift>().map_err(|e| conversion_error(0, e))
        })?;

        let mut shifts = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        shifts.sort_by_key(|shift| shift.rank());
        Ok(shifts)
    }

    /// Lists reservations with their space name and price.
    ///
    /// Rows are ordered by date descending, then shift (evening first), then
    /// id descending, so the order is total and stable across pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservation_details(
        conn: &Connection,
        query: &ReservationQuery,
    ) -> Result<Vec<ReservationDetails>> {
        let mut stmt = conn.prepare_cached(SELECT_DETAILS)?;
        let limit = query.limit.map_or(-1, i64::from);
        let rows = stmt.query_map(
            params![query.holder.map(UserId::value), limit, query.offset],
            row_to_details,
        )?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }
}
