//! Init command implementation.
//!
//! Explicitly initializes the data directory and database, optionally
//! registering the first administrator.

use crate::error::CliError;
use crate::utils::{data_dir, GlobalOptions};
use cajuhub::operations::{init_database, InitOptions};
use cajuhub::Registration;
use clap::Parser;

/// Initialize the cajuhub data directory and database.
#[derive(Parser)]
pub struct InitCommand {
    /// Overwrite an existing database
    #[arg(long)]
    overwrite: bool,

    /// Create a default configuration file
    #[arg(long)]
    with_config: bool,

    /// Email of the first administrator
    #[arg(long, value_name = "EMAIL", requires = "admin_password")]
    admin_email: Option<String>,

    /// Display name of the first administrator
    #[arg(long, value_name = "NAME", default_value = "Administrator")]
    admin_name: String,

    /// Password of the first administrator
    #[arg(long, value_name = "PASSWORD", env = "CAJUHUB_ADMIN_PASSWORD")]
    admin_password: Option<String>,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` is ignored here; initializing is the point.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = data_dir(global)?;

        let mut options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        if let Some(email) = self.admin_email {
            let password = self.admin_password.unwrap_or_default();
            options = options.with_admin(Registration::new(self.admin_name, email, password));
        }

        let result = init_database(&options)?;

        if global.quiet {
            return Ok(());
        }

        println!("Initialized cajuhub in: {}", result.data_dir.display());
        if result.data_dir_created {
            println!("  - Created data directory");
        }
        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }
        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }
        if let Some(admin) = result.admin {
            println!("  - Registered administrator {} (id {})", admin.email, admin.id);
        }

        Ok(())
    }
}
