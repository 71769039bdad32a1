//! Plan execution engine.

use crate::database::Database;
use crate::error::Result;
use crate::ledger::SlotLedger;
use crate::reservation::Reservation;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether every action was applied.
    pub success: bool,

    /// Whether this was a dry run (no changes made).
    pub dry_run: bool,

    /// Descriptions of actions taken, or that would be taken in a dry run.
    pub actions_taken: Vec<String>,

    /// Warnings carried over from the plan.
    pub warnings: Vec<String>,

    /// The reservation written by the last action, if any.
    pub reservation: Option<Reservation>,
}

impl ExecutionResult {
    fn completed(plan: &OperationPlan, dry_run: bool, reservation: Option<Reservation>) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation,
        }
    }
}

/// Executes operation plans through the slot ledger.
///
/// # Examples
///
/// ```no_run
/// use cajuhub::database::{Database, DatabaseConfig};
/// use cajuhub::operations::{OperationPlan, PlanExecutor};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/cajuhub.db")).unwrap();
/// let plan = OperationPlan::new("nothing to do");
///
/// let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Switches to dry-run mode: report the plan, touch nothing.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// Actions run in order; the first failure stops execution and is
    /// returned. Each action is atomic on its own.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing action, typically
    /// `SlotConflict` when a claim lost a race after planning.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            log::debug!("dry run: {}", plan.description);
            return Ok(ExecutionResult::completed(plan, true, None));
        }

        let mut ledger = SlotLedger::new(&mut *self.db);
        let mut last = None;
        for action in &plan.actions {
            log::debug!("executing: {}", action.description());
            let reservation = match action {
                PlanAction::ClaimSlot {
                    slot,
                    holder,
                    notes,
                } => ledger.claim(slot, *holder, notes.as_deref())?,
                PlanAction::ReleaseSlot { reservation, .. } => ledger.release(*reservation)?,
            };
            last = Some(reservation);
        }

        Ok(ExecutionResult::completed(plan, false, last))
    }
}
