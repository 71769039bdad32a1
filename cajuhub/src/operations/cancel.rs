//! Cancel operation planning.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::Principal;
use crate::reservation::ReservationId;

use super::plan::{OperationPlan, PlanAction};

/// Options for a cancel operation.
#[derive(Debug, Clone, Copy)]
pub struct CancelOptions {
    /// Who is cancelling.
    pub principal: Principal,
    /// Which reservation.
    pub reservation_id: ReservationId,
}

impl CancelOptions {
    /// Creates options for `principal` cancelling `reservation_id`.
    #[must_use]
    pub const fn new(principal: Principal, reservation_id: ReservationId) -> Self {
        Self {
            principal,
            reservation_id,
        }
    }
}

/// A cancel plan generator.
pub struct CancelPlan {
    options: CancelOptions,
}

impl CancelPlan {
    /// Creates a new cancel plan with the given options.
    #[must_use]
    pub const fn new(options: CancelOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this cancel request.
    ///
    /// Checks run in this order: existence, then owner-or-admin, then
    /// lifecycle state. A non-owner therefore learns nothing about the state
    /// of someone else's reservation.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if the reservation does not exist
    /// - `Forbidden` if the principal is neither the holder nor an admin
    /// - `StateConflict` if the reservation is already cancelled
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let id = self.options.reservation_id;
        let principal = self.options.principal;

        let reservation =
            Database::get_reservation(db.connection(), id)?.ok_or_else(|| Error::NotFound {
                resource: format!("reservation {id}"),
            })?;

        if !principal.can_act_for(reservation.holder()) {
            return Err(Error::Forbidden {
                details: format!("user {} may not cancel reservation {id}", principal.id),
            });
        }

        if !reservation.is_confirmed() {
            return Err(Error::StateConflict {
                details: format!("reservation {id} is already cancelled"),
            });
        }

        Ok(
            OperationPlan::new(format!("Cancel reservation {id}")).add_action(
                PlanAction::ReleaseSlot {
                    reservation: id,
                    slot: *reservation.slot(),
                },
            ),
        )
    }
}
