//! Reservation lifecycle operations.
//!
//! Operations follow a plan/execute split: a plan runs every check
//! (validation, catalog, authorization, lifecycle state) against the store
//! without writing, and the executor applies the resulting actions through
//! the [`SlotLedger`](crate::SlotLedger). Plans can be executed in dry-run
//! mode to preview an operation.
//!
//! [`ReservationManager`] bundles both steps for the common case.

mod cancel;
mod catalog;
mod create;
mod executor;
pub mod init;
mod manager;
mod plan;
mod request;

pub use cancel::{CancelOptions, CancelPlan};
pub use catalog::SpaceManager;
pub use create::{CreateOptions, CreatePlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use manager::{Page, ReservationManager};
pub use plan::{OperationPlan, PlanAction};
pub use request::{NewReservation, ReservationRequest};

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
