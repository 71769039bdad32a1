//! SQLite-backed persistent store.
//!
//! The store owns the one guarantee the booking core cannot provide on its
//! own: at most one confirmed reservation per slot, enforced by a partial
//! unique index so that concurrent writers in separate processes are
//! serialized by `SQLite` itself.
//!
//! # Examples
//!
//! ```no_run
//! use cajuhub::database::{Database, DatabaseConfig, ReservationQuery};
//!
//! let config = DatabaseConfig::new("/tmp/cajuhub.db");
//! let db = Database::open(config).unwrap();
//!
//! for details in Database::list_reservation_details(db.connection(), &ReservationQuery::all()).unwrap() {
//!     println!("{} {}", details.reservation.id(), details.space_name);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod reservations;
mod schema;
mod spaces;
mod users;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use reservations::ReservationQuery;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
