//! Main entry point for the cajuhub CLI.
//!
//! Every subcommand maps onto one operation of the booking library and
//! reports failures through the exit code.

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::{Cli, Command};
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    cajuhub::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        token: cli.token,
    };

    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Register(cmd) => cmd.execute(&global),
        Command::Login(cmd) => cmd.execute(&global),
        Command::Logout(cmd) => cmd.execute(&global),
        Command::Session(cmd) => cmd.execute(&global),
        Command::Promote(cmd) => cmd.execute(&global),
        Command::Space(cmd) => cmd.execute(&global),
        Command::Reserve(cmd) => cmd.execute(&global),
        Command::Cancel(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Availability(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
