//! Shifts and slot keys.
//!
//! A slot is the unit of booking: one space, on one calendar date, for one
//! shift. At most one confirmed reservation may hold a given slot.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;
use crate::space::SpaceId;

/// Date format used for slot dates on the wire and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the three fixed booking windows of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    /// 08:00 to 12:00.
    Morning,
    /// 13:00 to 17:00.
    Afternoon,
    /// 18:00 to 22:00.
    Evening,
}

impl Shift {
    /// All shifts in chronological order.
    pub const ALL: [Self; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }

    /// Returns the `(start, end)` wall-clock window for this shift.
    ///
    /// Windows are informational; the booking unit is the shift itself.
    #[must_use]
    pub const fn window(self) -> (&'static str, &'static str) {
        match self {
            Self::Morning => ("08:00", "12:00"),
            Self::Afternoon => ("13:00", "17:00"),
            Self::Evening => ("18:00", "22:00"),
        }
    }

    /// Chronological rank within a day, starting at 1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Morning => 1,
            Self::Afternoon => 2,
            Self::Evening => 3,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(ValidationError::new(
                "shift",
                format!("'{other}' is not one of morning, afternoon, evening"),
            )),
        }
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns a validation error for anything that is not a real calendar date,
/// including impossible days such as `2025-02-30`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("date", "date is required"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        ValidationError::new("date", format!("'{trimmed}' is not a valid YYYY-MM-DD date: {e}"))
    })
}

/// Formats a date the way slots are stored.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The triple identifying one bookable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// The space being booked.
    pub space_id: SpaceId,
    /// The calendar date.
    pub date: NaiveDate,
    /// The shift within that date.
    pub shift: Shift,
}

impl SlotKey {
    /// Creates a new slot key.
    #[must_use]
    pub const fn new(space_id: SpaceId, date: NaiveDate, shift: Shift) -> Self {
        Self {
            space_id,
            date,
            shift,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "space:{}/{}/{}",
            self.space_id,
            self.date.format(DATE_FORMAT),
            self.shift
        )
    }
}
