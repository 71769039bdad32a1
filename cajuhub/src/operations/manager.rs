//! The reservation lifecycle manager.

use crate::database::{Database, ReservationQuery};
use crate::error::{Error, Result};
use crate::identity::Principal;
use crate::reservation::{Reservation, ReservationDetails, ReservationId};
use crate::space::SpaceCatalog;

use super::cancel::{CancelOptions, CancelPlan};
use super::create::{CreateOptions, CreatePlan};
use super::executor::{ExecutionResult, PlanExecutor};
use super::plan::OperationPlan;
use super::request::{NewReservation, ReservationRequest};

/// A window into a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of rows; `None` is unbounded.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl Page {
    /// Every row.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// At most `limit` rows after skipping `offset`.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }
}

/// Authorization-aware orchestration of create, cancel and list.
///
/// The holder of a new reservation is always the calling principal. Cancel
/// and read follow the owner-or-admin rule. Space activity comes from a
/// [`SpaceCatalog`], the database's own unless another is supplied.
///
/// # Examples
///
/// ```no_run
/// use cajuhub::database::{Database, DatabaseConfig};
/// use cajuhub::operations::{Page, ReservationManager, ReservationRequest};
/// use cajuhub::{Principal, UserId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/cajuhub.db")).unwrap();
/// let principal = Principal::user(UserId::new(1));
///
/// let mut manager = ReservationManager::new(&mut db);
/// let request = ReservationRequest::new(1, "2025-03-10", "morning");
/// let reservation = manager.create(&principal, request).unwrap();
///
/// manager.cancel(&principal, reservation.id()).unwrap();
/// for details in manager.list(&principal, Page::all()).unwrap() {
///     println!("{} {}", details.reservation.id(), details.reservation.status());
/// }
/// ```
pub struct ReservationManager<'a> {
    db: &'a mut Database,
    catalog: Option<&'a dyn SpaceCatalog>,
}

impl<'a> ReservationManager<'a> {
    /// Creates a manager using the database as space catalog.
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, catalog: None }
    }

    /// Uses another space catalog for activity checks.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a dyn SpaceCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Plans a booking without executing it.
    ///
    /// # Errors
    ///
    /// See [`CreatePlan::build_plan`].
    pub fn plan_create(
        &self,
        principal: &Principal,
        reservation: NewReservation,
    ) -> Result<OperationPlan> {
        let catalog: &dyn SpaceCatalog = match self.catalog {
            Some(catalog) => catalog,
            None => &*self.db,
        };
        CreatePlan::new(CreateOptions::new(*principal, reservation)).build_plan(&*self.db, catalog)
    }

    /// Plans a cancellation without executing it.
    ///
    /// # Errors
    ///
    /// See [`CancelPlan::build_plan`].
    pub fn plan_cancel(&self, principal: &Principal, id: ReservationId) -> Result<OperationPlan> {
        CancelPlan::new(CancelOptions::new(*principal, id)).build_plan(&*self.db)
    }

    /// Executes a plan, or only reports it when `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns the first failing action's error.
    pub fn execute(&mut self, plan: &OperationPlan, dry_run: bool) -> Result<ExecutionResult> {
        let mut executor = PlanExecutor::new(&mut *self.db);
        if dry_run {
            executor = executor.dry_run();
        }
        executor.execute(plan)
    }

    /// Books a slot for the principal.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `Validation` for a missing or malformed field, or an inactive space
    /// - `NotFound` if the space does not exist
    /// - `SlotConflict` ("slot already booked") if the slot is taken,
    ///   including when another caller wins a race for it
    pub fn create(
        &mut self,
        principal: &Principal,
        request: ReservationRequest,
    ) -> Result<Reservation> {
        let reservation = request.validate()?;
        let plan = self.plan_create(principal, reservation)?;
        let result = self.execute(&plan, false)?;
        written(result, &plan)
    }

    /// Cancels a reservation on behalf of its holder or an admin.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if the reservation does not exist
    /// - `Forbidden` if the principal is neither holder nor admin
    /// - `StateConflict` if it is already cancelled
    pub fn cancel(&mut self, principal: &Principal, id: ReservationId) -> Result<Reservation> {
        let plan = self.plan_cancel(principal, id)?;
        let result = self.execute(&plan, false)?;
        written(result, &plan)
    }

    /// Lists reservations visible to the principal.
    ///
    /// Admins see everything; users see only what they hold. Rows are
    /// ordered by date descending, then shift (evening first), then id
    /// descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self, principal: &Principal, page: Page) -> Result<Vec<ReservationDetails>> {
        let query = if principal.is_admin() {
            ReservationQuery::all()
        } else {
            ReservationQuery::held_by(principal.id)
        };
        Database::list_reservation_details(
            self.db.connection(),
            &query.page(page.limit, page.offset),
        )
    }

    /// Reads one reservation under the owner-or-admin rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub fn get(&self, principal: &Principal, id: ReservationId) -> Result<Reservation> {
        let reservation =
            Database::get_reservation(self.db.connection(), id)?.ok_or_else(|| Error::NotFound {
                resource: format!("reservation {id}"),
            })?;
        if !principal.can_act_for(reservation.holder()) {
            return Err(Error::Forbidden {
                details: format!("user {} may not read reservation {id}", principal.id),
            });
        }
        Ok(reservation)
    }
}

fn written(result: ExecutionResult, plan: &OperationPlan) -> Result<Reservation> {
    result.reservation.ok_or_else(|| Error::StateConflict {
        details: format!("'{}' wrote nothing", plan.description),
    })
}
