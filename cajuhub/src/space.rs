//! Bookable spaces and the catalog seam used by the lifecycle manager.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reservation::ValidationError;

/// Store-assigned identifier of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(i64);

impl SpaceId {
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

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable room or desk area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Identity; never changes.
    pub id: SpaceId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Free-text size, e.g. "40m²".
    pub size: Option<String>,
    /// Maximum number of people.
    pub capacity: u32,
    /// Price of one shift, in cents.
    pub price_per_shift_cents: i64,
    /// Amenity labels.
    pub amenities: Vec<String>,
    /// Optional picture.
    pub image_url: Option<String>,
    /// Whether the space accepts new reservations.
    pub is_active: bool,
}

/// The editable attributes of a space, as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceDraft {
    /// Display name.
    pub name: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text size.
    #[serde(default)]
    pub size: Option<String>,
    /// Maximum number of people.
    pub capacity: u32,
    /// Price of one shift, in cents.
    pub price_per_shift_cents: i64,
    /// Amenity labels.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Optional picture.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the space accepts new reservations.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl SpaceDraft {
    /// Creates an active draft with the required attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, capacity: u32, price_per_shift_cents: i64) -> Self {
        Self {
            name: name.into(),
            capacity,
            price_per_shift_cents,
            is_active: true,
            ..Self::default()
        }
    }

    /// Validates the draft and normalizes its text fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the capacity is zero or the
    /// price is negative.
    pub fn validate(mut self) -> std::result::Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::new("name", "space name is required"));
        }
        if self.capacity == 0 {
            return Err(ValidationError::new("capacity", "capacity must be at least 1"));
        }
        if self.price_per_shift_cents < 0 {
            return Err(ValidationError::new(
                "price_per_shift_cents",
                "price cannot be negative",
            ));
        }

        self.description = normalize_optional(self.description);
        self.size = normalize_optional(self.size);
        self.image_url = normalize_optional(self.image_url);
        self.amenities = self
            .amenities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok(self)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Source of space metadata for the lifecycle manager.
///
/// The store implements this; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait SpaceCatalog {
    /// Looks a space up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn find_space(&self, id: SpaceId) -> Result<Option<Space>>;

    /// Returns true if the space exists and accepts reservations.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn is_active(&self, id: SpaceId) -> Result<bool> {
        Ok(self.find_space(id)?.is_some_and(|space| space.is_active))
    }
}
