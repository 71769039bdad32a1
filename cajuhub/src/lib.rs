#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # cajuhub
//!
//! A library for booking spaces by date and shift.
//!
//! A space can be booked for a morning, afternoon or evening shift on a given
//! day. The library guarantees that at most one confirmed reservation holds
//! any `(space, date, shift)` slot, even when many clients race for it.
//!
//! ## Core Types
//!
//! - [`SlotKey`] and [`Shift`]: the unit of booking
//! - [`SlotLedger`]: occupancy reads and the atomic claim on a slot
//! - [`ReservationManager`]: validated, authorized create/cancel/list
//! - [`Reservation`] and [`ReservationStatus`]: booking records
//! - [`Space`] and [`SpaceCatalog`]: what can be booked
//! - [`Principal`]: the caller on whose behalf an operation runs
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use cajuhub::{Shift, SlotKey, SpaceId};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let slot = SlotKey::new(SpaceId::new(1), date, "morning".parse().unwrap());
//!
//! assert_eq!(slot.shift, Shift::Morning);
//! assert_eq!(slot.to_string(), "space:1/2025-03-10/morning");
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod operations;
pub mod reservation;
pub mod slot;
pub mod space;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder, OutputFormat};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, Result};
pub use identity::{
    Authenticator, Principal, PrincipalResolver, Registration, Role, Session, SessionToken, User,
    UserId,
};
pub use ledger::SlotLedger;
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    CancelOptions, CancelPlan, CreateOptions, CreatePlan, ExecutionResult, NewReservation,
    OperationPlan, Page, PlanAction, PlanExecutor, ReservationManager, ReservationRequest,
    SpaceManager,
};
pub use reservation::{
    Reservation, ReservationBuilder, ReservationDetails, ReservationId, ReservationStatus,
    ValidationError,
};
pub use slot::{Shift, SlotKey};
pub use space::{Space, SpaceCatalog, SpaceDraft, SpaceId};
