use rusqlite::Connection;

use crate::error::GuestlistResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// Guests and links hold restricting references to their guest list: a list
/// that still has either cannot be deleted, and neither can its event.
pub fn initialize(conn: &Connection) -> GuestlistResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS organizations (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            organization_id TEXT REFERENCES organizations(id)
        );

        CREATE TABLE IF NOT EXISTS venues (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            address TEXT,
            capacity INTEGER NOT NULL CHECK (capacity >= 1),
            organization_id TEXT REFERENCES organizations(id)
        );

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            venue_id TEXT NOT NULL REFERENCES venues(id),
            starts_at TEXT NOT NULL,
            created_by TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS guest_lists (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            max_capacity INTEGER CHECK (max_capacity IS NULL OR max_capacity >= 1),
            closed INTEGER NOT NULL DEFAULT 0,
            created_by TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS guest_lists_event_idx ON guest_lists(event_id);

        CREATE TABLE IF NOT EXISTS guests (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            guest_list_id TEXT NOT NULL REFERENCES guest_lists(id),
            confirmed INTEGER NOT NULL DEFAULT 0,
            plus_one INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS guests_list_idx ON guests(guest_list_id);

        CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY NOT NULL,
            guest_list_id TEXT NOT NULL REFERENCES guest_lists(id),
            name TEXT NOT NULL,
            capacity INTEGER NOT NULL CHECK (capacity >= 1),
            plus_one INTEGER NOT NULL DEFAULT 0,
            can_view INTEGER NOT NULL DEFAULT 0,
            can_edit INTEGER NOT NULL DEFAULT 0,
            needs_confirmation INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            is_one_time INTEGER NOT NULL DEFAULT 1,
            redeemed INTEGER NOT NULL DEFAULT 0 CHECK (redeemed <= capacity),
            created_by TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS links_list_idx ON links(guest_list_id);
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
