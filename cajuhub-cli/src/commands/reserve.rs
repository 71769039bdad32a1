//! Reserve command implementation.
//!
//! Books a `(space, date, shift)` slot for the logged-in user and prints
//! the new reservation id.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, require_principal, GlobalOptions};
use cajuhub::operations::{ReservationManager, ReservationRequest};
use clap::Args;

/// Book a space for one shift.
#[derive(Args)]
pub struct ReserveCommand {
    /// Space id
    #[arg(long, value_name = "ID")]
    pub space: i64,

    /// Date to book (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Shift to book: morning, afternoon or evening
    #[arg(long, value_name = "SHIFT")]
    pub shift: String,

    /// Free-text notes (at most 500 characters)
    #[arg(long)]
    pub notes: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let principal = require_principal(global, &db)?;

        let mut request = ReservationRequest::new(self.space, self.date, self.shift);
        if let Some(notes) = self.notes {
            request = request.with_notes(notes);
        }
        let reservation = request.validate()?;

        let mut manager = ReservationManager::new(&mut db);
        let plan = manager.plan_create(&principal, reservation)?;
        if global.verbose {
            eprintln!("Plan: {}", plan.description);
            for action in &plan.actions {
                eprintln!("  - {}", action.description());
            }
        }
        let result = manager.execute(&plan, self.dry_run)?;

        if !global.quiet {
            for warning in &result.warnings {
                eprintln!("Warning: {warning}");
            }
        }

        if result.dry_run {
            println!("Dry run: no changes made");
            for action in &result.actions_taken {
                println!("  - {action}");
            }
            return Ok(());
        }

        if let Some(reservation) = result.reservation {
            println!("{}", reservation.id());
            if !global.quiet {
                let (start, end) = reservation.slot().shift.window();
                eprintln!(
                    "Booked {} ({start}-{end}) as reservation {}",
                    reservation.slot(),
                    reservation.id()
                );
            }
        }
        Ok(())
    }
}
