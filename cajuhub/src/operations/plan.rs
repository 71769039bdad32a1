//! Plan types for reservation operations.
//!
//! A plan describes what an operation will do after its checks have passed,
//! without doing it. Executing it is left to [`super::PlanExecutor`].

use crate::identity::UserId;
use crate::reservation::ReservationId;
use crate::slot::SlotKey;

/// A single store mutation within a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Insert a confirmed reservation for the slot.
    ClaimSlot {
        /// Slot to claim.
        slot: SlotKey,
        /// Holder of the new reservation.
        holder: UserId,
        /// Optional notes.
        notes: Option<String>,
    },

    /// Cancel a confirmed reservation.
    ReleaseSlot {
        /// Reservation to cancel.
        reservation: ReservationId,
        /// Slot it currently holds.
        slot: SlotKey,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::ClaimSlot { slot, holder, .. } => {
                format!("Claim {slot} for user {holder}")
            }
            Self::ReleaseSlot { reservation, slot } => {
                format!("Cancel reservation {reservation} and release {slot}")
            }
        }
    }
}

/// A plan describing the actions an operation will take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    /// Description of the overall operation.
    pub description: String,
    /// Actions, in execution order.
    pub actions: Vec<PlanAction>,
    /// Non-fatal notes for the caller.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Appends an action.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends a warning.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Returns true if the plan does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
