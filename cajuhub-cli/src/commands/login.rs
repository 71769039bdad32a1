//! Login command implementation.
//!
//! Prints the session token and saves it in the data directory so that
//! later commands act as this user without `--token`.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, save_token, GlobalOptions};
use cajuhub::Authenticator;
use clap::Args;
use std::time::Duration;

/// Log in and open a session.
#[derive(Args)]
pub struct LoginCommand {
    /// Login email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Password
    #[arg(long, value_name = "PASSWORD", env = "CAJUHUB_PASSWORD")]
    pub password: String,

    /// Only succeed for administrators
    #[arg(long)]
    pub admin: bool,

    /// Print the token without saving it
    #[arg(long)]
    pub no_save: bool,
}

impl LoginCommand {
    /// Execute the login command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let ttl = config
            .session_ttl_hours()
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| CliError::Config("session_ttl_hours is too large".into()))?;
        let (user, session) = Authenticator::new(&mut db)
            .with_session_ttl(ttl)
            .login(&self.email, &self.password, self.admin)?;

        if !self.no_save {
            save_token(global, &session.token)?;
        }

        println!("{}", session.token);
        if !global.quiet {
            eprintln!("Logged in as {} ({})", user.email, user.role);
        }
        Ok(())
    }
}
