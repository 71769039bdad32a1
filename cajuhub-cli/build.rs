//! Build script for cajuhub-cli.
//!
//! Generates the `cajuhub.1` man page in OUT_DIR with clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! tree is restated here. Keep it in step with src/cli.rs.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("cajuhub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book spaces by date and shift")
        .long_about(
            "Command-line tool for booking spaces by date and shift without double-booking",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("CAJUHUB_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("CAJUHUB_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .help("Session token (default: the one saved by `login`)")
                .value_name("TOKEN")
                .global(true)
                .env("CAJUHUB_TOKEN"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the database and optionally the first administrator"),
            Command::new("register").about("Create a user account"),
            Command::new("login")
                .about("Log in and open a session")
                .long_about("Verify credentials, print a session token and remember it"),
            Command::new("logout").about("End the current session"),
            Command::new("session").about("Show the user behind the current session"),
            Command::new("promote").about("Grant the admin role to a user"),
            Command::new("space")
                .about("Manage the space catalog")
                .subcommands(vec![
                    Command::new("add").about("Add a space (admins only)"),
                    Command::new("update").about("Change a space (admins only)"),
                    Command::new("list").about("List spaces"),
                    Command::new("show").about("Show one space"),
                ]),
            Command::new("reserve")
                .about("Book a space for one shift")
                .long_about("Book a (space, date, shift) slot; fails if it is already booked"),
            Command::new("cancel")
                .about("Cancel a reservation")
                .long_about("Cancel a confirmed reservation, freeing its slot"),
            Command::new("list")
                .about("List reservations")
                .long_about("List your reservations, or all reservations for admins"),
            Command::new("availability")
                .about("Show free and booked shifts of a space on a date"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("cajuhub.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
