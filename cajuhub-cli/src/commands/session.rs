//! Session command implementation.

use crate::error::CliError;
use crate::utils::{
    current_token, format_timestamp, load_configuration, open_database, write_json, GlobalOptions,
};
use cajuhub::{Authenticator, Error};
use clap::Args;

/// Show the user behind the current session.
#[derive(Args)]
pub struct SessionCommand {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl SessionCommand {
    /// Execute the session command.
    ///
    /// Exits with the unauthenticated status when no live session exists.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let not_logged_in = || {
            CliError::Library(Error::Unauthenticated {
                reason: "no live session".into(),
            })
        };
        let token = current_token(global)?.ok_or_else(not_logged_in)?;
        let user = Authenticator::new(&mut db)
            .session(&token)?
            .ok_or_else(not_logged_in)?;

        if self.json {
            write_json(&serde_json::json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role.as_str(),
                "created_at": format_timestamp(user.created_at),
            }))
        } else {
            println!("{}\t{}\t{}\t{}", user.id, user.email, user.name, user.role);
            Ok(())
        }
    }
}
