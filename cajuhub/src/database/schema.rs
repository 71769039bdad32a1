//! Database schema definitions and SQL constants.

/// Current schema version for the database.
///
/// Stored in the metadata table and compared on every open.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key/value metadata, currently only the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Registered accounts. Emails are stored lowercased.
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        created_at INTEGER NOT NULL
    )";

/// Login sessions keyed by their opaque token.
pub const CREATE_SESSIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )";

/// Bookable spaces. Amenities are a JSON array of strings.
pub const CREATE_SPACES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS spaces (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        size TEXT,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        price_per_shift_cents INTEGER NOT NULL CHECK (price_per_shift_cents >= 0),
        amenities TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        is_active INTEGER NOT NULL DEFAULT 1
    )";

/// Reservations, confirmed and cancelled alike. Cancelled rows are kept.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        space_id INTEGER NOT NULL REFERENCES spaces(id),
        user_id INTEGER NOT NULL REFERENCES users(id),
        reservation_date TEXT NOT NULL,
        shift TEXT NOT NULL CHECK (shift IN ('morning', 'afternoon', 'evening')),
        status TEXT NOT NULL DEFAULT 'confirmed' CHECK (status IN ('confirmed', 'cancelled')),
        notes TEXT,
        created_at INTEGER NOT NULL,
        cancelled_at INTEGER
    )";

/// At most one confirmed reservation per slot.
///
/// This partial index is the store-level guarantee against double booking.
/// Cancelled rows fall outside the index, so a released slot is immediately
/// claimable again.
pub const CREATE_CONFIRMED_SLOT_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_confirmed_slot
    ON reservations(space_id, reservation_date, shift)
    WHERE status = 'confirmed'";

/// Speeds up per-holder listings.
pub const CREATE_HOLDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_user ON reservations(user_id)";

/// Speeds up the date-descending listing order.
pub const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(reservation_date)";

/// Speeds up session cleanup by user.
pub const CREATE_SESSION_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)";

/// Name of the partial unique index on confirmed slots.
#[cfg(test)]
pub const CONFIRMED_SLOT_INDEX_NAME: &str = "idx_reservations_confirmed_slot";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
