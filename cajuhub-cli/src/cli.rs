//! CLI structure and command definitions.

use crate::commands::{
    AvailabilityCommand, CancelCommand, CompletionsCommand, InitCommand, ListCommand,
    LoginCommand, LogoutCommand, PromoteCommand, RegisterCommand, ReserveCommand, SessionCommand,
    SpaceCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Book spaces by date and shift.
#[derive(Parser)]
#[command(name = "cajuhub")]
#[command(version, about = "Book spaces by date and shift", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "CAJUHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "CAJUHUB_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    /// Session token (default: the one saved by `login`)
    #[arg(
        long,
        value_name = "TOKEN",
        global = true,
        env = "CAJUHUB_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Create a user account
    Register(RegisterCommand),

    /// Log in and open a session
    Login(LoginCommand),

    /// End the current session
    Logout(LogoutCommand),

    /// Show the user behind the current session
    Session(SessionCommand),

    /// Grant the admin role to a user
    Promote(PromoteCommand),

    /// Manage the space catalog
    Space(SpaceCommand),

    /// Book a space for one shift
    Reserve(ReserveCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// List reservations
    List(ListCommand),

    /// Show free and booked shifts of a space on a date
    Availability(AvailabilityCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
