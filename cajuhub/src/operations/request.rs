//! The reservation request schema checked at the manager boundary.

use serde::Deserialize;

use crate::reservation::{ValidationError, MAX_NOTES_LEN};
use crate::slot::{parse_date, Shift, SlotKey};
use crate::space::SpaceId;

/// An unvalidated request to book a slot, as received from a client.
///
/// Every field is optional so that a missing field is reported as a
/// validation error naming it, rather than as a decoding failure. The holder
/// is deliberately absent: it always comes from the principal.
///
/// # Examples
///
/// ```
/// use cajuhub::operations::ReservationRequest;
///
/// let request: ReservationRequest = serde_json::from_str(
///     r#"{"space_id": 1, "reservation_date": "2025-03-10", "shift": "morning"}"#,
/// ).unwrap();
/// let validated = request.validate().unwrap();
/// assert_eq!(validated.slot.to_string(), "space:1/2025-03-10/morning");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationRequest {
    /// Space to book.
    #[serde(default)]
    pub space_id: Option<i64>,
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub reservation_date: Option<String>,
    /// One of `morning`, `afternoon`, `evening`.
    #[serde(default)]
    pub shift: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReservationRequest {
    /// Creates a request with all required fields present.
    pub fn new(space_id: i64, reservation_date: impl Into<String>, shift: impl Into<String>) -> Self {
        Self {
            space_id: Some(space_id),
            reservation_date: Some(reservation_date.into()),
            shift: Some(shift.into()),
            notes: None,
        }
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks required fields and types.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing or malformed
    /// field, in the order `space_id`, `reservation_date`, `shift`, `notes`.
    pub fn validate(self) -> Result<NewReservation, ValidationError> {
        let space_id = match self.space_id {
            None => return Err(ValidationError::new("space_id", "space_id is required")),
            Some(id) if id <= 0 => {
                return Err(ValidationError::new(
                    "space_id",
                    format!("{id} is not a valid space id"),
                ))
            }
            Some(id) => SpaceId::new(id),
        };

        let date = match self.reservation_date.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ValidationError::new(
                    "reservation_date",
                    "reservation_date is required",
                ))
            }
            Some(raw) => parse_date(raw).map_err(|e| ValidationError {
                field: "reservation_date".into(),
                message: e.message,
            })?,
        };

        let shift: Shift = match self.shift.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::new("shift", "shift is required")),
            Some(raw) => raw.parse()?,
        };

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(ref notes) = notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(ValidationError::new(
                    "notes",
                    format!("notes must be at most {MAX_NOTES_LEN} characters"),
                ));
            }
        }

        Ok(NewReservation {
            slot: SlotKey::new(space_id, date, shift),
            notes,
        })
    }
}

/// A validated reservation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    /// The slot to claim.
    pub slot: SlotKey,
    /// Trimmed notes, absent when blank.
    pub notes: Option<String>,
}
