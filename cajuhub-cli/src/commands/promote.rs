//! Promote command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, require_principal, GlobalOptions};
use cajuhub::Authenticator;
use clap::Args;

/// Grant the admin role to a user (admins only).
#[derive(Args)]
pub struct PromoteCommand {
    /// Email of the user to promote
    #[arg(value_name = "EMAIL")]
    pub email: String,
}

impl PromoteCommand {
    /// Execute the promote command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let principal = require_principal(global, &db)?;

        let user = Authenticator::new(&mut db).promote(&principal, &self.email)?;
        if !global.quiet {
            println!("{} is now an admin", user.email);
        }
        Ok(())
    }
}
