//! Cancel command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, require_principal, GlobalOptions};
use cajuhub::operations::ReservationManager;
use cajuhub::ReservationId;
use clap::Args;

/// Cancel a reservation (holder or admin).
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let principal = require_principal(global, &db)?;

        let mut manager = ReservationManager::new(&mut db);
        let plan = manager.plan_cancel(&principal, ReservationId::new(self.id))?;
        if global.verbose {
            eprintln!("Plan: {}", plan.description);
            for action in &plan.actions {
                eprintln!("  - {}", action.description());
            }
        }
        let result = manager.execute(&plan, self.dry_run)?;

        if result.dry_run {
            println!("Dry run: no changes made");
            for action in &result.actions_taken {
                println!("  - {action}");
            }
        } else if !global.quiet {
            if let Some(reservation) = result.reservation {
                println!(
                    "Cancelled reservation {}; {} is free again",
                    reservation.id(),
                    reservation.slot()
                );
            }
        }
        Ok(())
    }
}
