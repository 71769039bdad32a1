//! Logout command implementation.

use crate::error::CliError;
use crate::utils::{clear_saved_token, current_token, load_configuration, open_database, GlobalOptions};
use cajuhub::Authenticator;
use clap::Args;

/// End the current session.
#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    /// Execute the logout command. Succeeds even when no session is open.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        if let Some(token) = current_token(global)? {
            let existed = Authenticator::new(&mut db).logout(&token)?;
            log::debug!("session existed: {existed}");
        }
        if global.token.is_none() {
            clear_saved_token(global)?;
        }

        if !global.quiet {
            eprintln!("Logged out");
        }
        Ok(())
    }
}
