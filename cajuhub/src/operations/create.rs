//! Create operation planning.

use chrono::Local;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::Principal;
use crate::space::SpaceCatalog;

use super::plan::{OperationPlan, PlanAction};
use super::request::NewReservation;

/// Options for a create operation.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Who is booking; becomes the holder.
    pub principal: Principal,
    /// What is being booked.
    pub reservation: NewReservation,
}

impl CreateOptions {
    /// Creates options for `principal` booking `reservation`.
    #[must_use]
    pub const fn new(principal: Principal, reservation: NewReservation) -> Self {
        Self {
            principal,
            reservation,
        }
    }
}

/// A create plan generator.
pub struct CreatePlan {
    options: CreateOptions,
}

impl CreatePlan {
    /// Creates a new create plan with the given options.
    #[must_use]
    pub const fn new(options: CreateOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this create request.
    ///
    /// Checks that the space exists and is active, and rejects early if the
    /// slot is already held. The early rejection is only a shortcut: the
    /// claim itself is what decides a race.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if the space does not exist
    /// - `Validation` if the space is inactive
    /// - `SlotConflict` if the slot is already held
    pub fn build_plan(&self, db: &Database, catalog: &dyn SpaceCatalog) -> Result<OperationPlan> {
        let slot = self.options.reservation.slot;
        let mut plan = OperationPlan::new(format!("Book {slot}"));

        let space = catalog
            .find_space(slot.space_id)?
            .ok_or_else(|| Error::NotFound {
                resource: format!("space {}", slot.space_id),
            })?;
        if !space.is_active {
            return Err(Error::Validation {
                field: "space_id".into(),
                message: format!("space '{}' is not accepting reservations", space.name),
            });
        }

        if Database::is_slot_occupied(db.connection(), &slot)? {
            return Err(Error::SlotConflict { slot });
        }

        if slot.date < Local::now().date_naive() {
            plan = plan.add_warning(format!("{} is in the past", slot.date));
        }

        plan = plan.add_action(PlanAction::ClaimSlot {
            slot,
            holder: self.options.principal.id,
            notes: self.options.reservation.notes.clone(),
        });

        Ok(plan)
    }
}
