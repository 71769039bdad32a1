//! Reservation types for tracking slot bookings.
//!
//! This module provides the reservation record, its lifecycle status and a
//! builder used by the store when materializing rows.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::slot::SlotKey;

/// Maximum length of the free-text notes attached to a reservation.
pub const MAX_NOTES_LEN: usize = 500;

/// Store-assigned identifier of a reservation.
///
/// # Examples
///
/// ```
/// use cajuhub::ReservationId;
///
/// let id = ReservationId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(format!("{id}"), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a reservation.
///
/// `Confirmed` is the only state in which a reservation occupies its slot.
/// `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Holds the slot.
    Confirmed,
    /// Released; never transitions again.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true when no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError::new(
                "status",
                format!("unknown reservation status '{other}'"),
            )),
        }
    }
}

/// A booking of one slot by one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    slot: SlotKey,
    holder: UserId,
    status: ReservationStatus,
    notes: Option<String>,
    created_at: SystemTime,
    cancelled_at: Option<SystemTime>,
}

impl Reservation {
    /// Creates a new reservation builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cajuhub::{Reservation, ReservationId, ReservationStatus, Shift, SlotKey, SpaceId, UserId};
    ///
    /// let slot = SlotKey::new(
    ///     SpaceId::new(1),
    ///     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
    ///     Shift::Morning,
    /// );
    /// let reservation = Reservation::builder(ReservationId::new(1), slot, UserId::new(5))
    ///     .notes(Some("team sync".to_string()))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(reservation.status(), ReservationStatus::Confirmed);
    /// assert_eq!(reservation.notes(), Some("team sync"));
    /// ```
    #[must_use]
    pub fn builder(id: ReservationId, slot: SlotKey, holder: UserId) -> ReservationBuilder {
        ReservationBuilder {
            id,
            slot,
            holder,
            status: ReservationStatus::Confirmed,
            notes: None,
            created_at: None,
            cancelled_at: None,
        }
    }

    /// Returns the reservation identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the booked slot.
    #[must_use]
    pub const fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Returns the user holding this reservation.
    #[must_use]
    pub const fn holder(&self) -> UserId {
        self.holder
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the optional notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Returns when the reservation was cancelled, if it was.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<SystemTime> {
        self.cancelled_at
    }

    /// Returns true while the reservation occupies its slot.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.status, ReservationStatus::Confirmed)
    }

    /// Returns true if `user` is the holder of this reservation.
    #[must_use]
    pub fn is_held_by(&self, user: UserId) -> bool {
        self.holder == user
    }

    /// Replaces the identifier once the store has assigned one.
    pub(crate) const fn with_id(mut self, id: ReservationId) -> Self {
        self.id = id;
        self
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: ReservationId,
    slot: SlotKey,
    holder: UserId,
    status: ReservationStatus,
    notes: Option<String>,
    created_at: Option<SystemTime>,
    cancelled_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Sets the notes.
    ///
    /// Notes are trimmed; blank notes are dropped.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the cancellation timestamp.
    #[must_use]
    pub fn cancelled_at(mut self, cancelled_at: Option<SystemTime>) -> Self {
        self.cancelled_at = cancelled_at;
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The notes exceed [`MAX_NOTES_LEN`] characters
    /// - A cancellation timestamp is set on a confirmed reservation
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if let Some(ref notes) = self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(ValidationError::new(
                    "notes",
                    format!("notes must be at most {MAX_NOTES_LEN} characters"),
                ));
            }
        }

        if self.status == ReservationStatus::Confirmed && self.cancelled_at.is_some() {
            return Err(ValidationError::new(
                "cancelled_at",
                "a confirmed reservation cannot carry a cancellation time",
            ));
        }

        Ok(Reservation {
            id: self.id,
            slot: self.slot,
            holder: self.holder,
            status: self.status,
            notes: self.notes,
            created_at: self.created_at.unwrap_or_else(SystemTime::now),
            cancelled_at: self.cancelled_at,
        })
    }
}

/// A reservation joined with the display data of its space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDetails {
    /// The reservation itself.
    pub reservation: Reservation,
    /// Name of the booked space.
    pub space_name: String,
    /// Price per shift of the booked space, in cents.
    pub price_per_shift_cents: i64,
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shift, SpaceId};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn slot() -> SlotKey {
        SlotKey::new(
            SpaceId::new(1),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            Shift::Morning,
        )
    }

    #[test]
    fn test_builder_defaults_to_confirmed() {
        let r = Reservation::builder(ReservationId::new(1), slot(), UserId::new(2))
            .build()
            .unwrap();
        assert_eq!(r.status(), ReservationStatus::Confirmed);
        assert!(r.is_confirmed());
        assert!(r.notes().is_none());
        assert!(r.cancelled_at().is_none());
        assert!(r.is_held_by(UserId::new(2)));
        assert!(!r.is_held_by(UserId::new(3)));
    }

    #[test]
    fn test_builder_trims_notes() {
        let r = Reservation::builder(ReservationId::new(1), slot(), UserId::new(2))
            .notes(Some("  bring projector  ".to_string()))
            .build()
            .unwrap();
        assert_eq!(r.notes(), Some("bring projector"));
    }

    #[test]
    fn test_builder_drops_blank_notes() {
        let r = Reservation::builder(ReservationId::new(1), slot(), UserId::new(2))
            .notes(Some("   ".to_string()))
            .build()
            .unwrap();
        assert!(r.notes().is_none());
    }

    #[test]
    fn test_builder_rejects_long_notes() {
        let err = Reservation::builder(ReservationId::new(1), slot(), UserId::new(2))
            .notes(Some("x".repeat(MAX_NOTES_LEN + 1)))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "notes");
    }

    #[test]
    fn test_builder_rejects_confirmed_with_cancel_time() {
        let err = Reservation::builder(ReservationId::new(1), slot(), UserId::new(2))
            .cancelled_at(Some(SystemTime::now()))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "cancelled_at");
    }

    #[test]
    fn test_cancelled_reservation() {
        let created = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let cancelled = created + Duration::from_secs(60);
        let r = Reservation::builder(ReservationId::new(9), slot(), UserId::new(2))
            .status(ReservationStatus::Cancelled)
            .created_at(created)
            .cancelled_at(Some(cancelled))
            .build()
            .unwrap();
        assert!(!r.is_confirmed());
        assert!(r.status().is_terminal());
        assert_eq!(r.created_at(), created);
        assert_eq!(r.cancelled_at(), Some(cancelled));
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in [ReservationStatus::Confirmed, ReservationStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert!("pending".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("notes", "too long");
        assert_eq!(format!("{err}"), "validation error for 'notes': too long");
    }
}
