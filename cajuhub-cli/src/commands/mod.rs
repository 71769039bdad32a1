//! CLI command implementations.
//!
//! - `init`: Create the data directory, database and first admin
//! - `register`, `login`, `logout`, `session`, `promote`: accounts and sessions
//! - `space`: Space catalog management
//! - `reserve`: Book a space for a shift
//! - `cancel`: Cancel a reservation
//! - `list`: List reservations
//! - `availability`: Show free shifts of a space on a date
//! - `completions`: Generate shell completion scripts

pub mod availability;
pub mod cancel;
pub mod completions;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
pub mod promote;
pub mod register;
pub mod reserve;
pub mod session;
pub mod space;

pub use availability::AvailabilityCommand;
pub use cancel::CancelCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use promote::PromoteCommand;
pub use register::RegisterCommand;
pub use reserve::ReserveCommand;
pub use session::SessionCommand;
pub use space::SpaceCommand;
