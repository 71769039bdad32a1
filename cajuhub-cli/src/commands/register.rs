//! Register command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use cajuhub::{Authenticator, Registration};
use clap::Args;

/// Create a user account.
#[derive(Args)]
pub struct RegisterCommand {
    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Login email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Password
    #[arg(long, value_name = "PASSWORD", env = "CAJUHUB_PASSWORD")]
    pub password: String,
}

impl RegisterCommand {
    /// Execute the register command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let user = Authenticator::new(&mut db)
            .register(Registration::new(self.name, self.email, self.password))?;

        println!("{}", user.id);
        if !global.quiet {
            eprintln!("Registered {} as user {}", user.email, user.id);
        }
        Ok(())
    }
}
