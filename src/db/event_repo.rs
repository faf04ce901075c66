use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{Event, Id, User, Venue};

const SELECT_EVENT: &str =
    "SELECT id, name, venue_id, starts_at, created_by, created_at, updated_at FROM events";

pub fn insert(conn: &Connection, event: &Event) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO events (id, name, venue_id, starts_at, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.id,
            event.name,
            event.venue_id,
            event.starts_at,
            event.created_by,
            event.created_at,
            event.updated_at,
        ],
    )?;
    Ok(())
}

/// Updates name, venue and date. Creator and creation time never change.
pub fn update(conn: &Connection, event: &Event) -> GuestlistResult<()> {
    conn.execute(
        "UPDATE events SET name = ?1, venue_id = ?2, starts_at = ?3, updated_at = ?4 WHERE id = ?5",
        params![
            event.name,
            event.venue_id,
            event.starts_at,
            event.updated_at,
            event.id,
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Id<Event>) -> GuestlistResult<()> {
    conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
    Ok(())
}

fn map_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        venue_id: row.get(2)?,
        starts_at: row.get(3)?,
        created_by: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Event>) -> GuestlistResult<Option<Event>> {
    let event = conn
        .query_row(&format!("{} WHERE id = ?1", SELECT_EVENT), params![id], map_event)
        .optional()?;
    Ok(event)
}

/// Most recent first.
pub fn find_all(conn: &Connection) -> GuestlistResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY starts_at DESC", SELECT_EVENT))?;
    let events = stmt
        .query_map([], map_event)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

pub fn find_by_venue(conn: &Connection, venue_id: Id<Venue>) -> GuestlistResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE venue_id = ?1 ORDER BY starts_at DESC",
        SELECT_EVENT
    ))?;
    let events = stmt
        .query_map(params![venue_id], map_event)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

pub fn find_by_creator(conn: &Connection, user_id: Id<User>) -> GuestlistResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE created_by = ?1 ORDER BY starts_at DESC",
        SELECT_EVENT
    ))?;
    let events = stmt
        .query_map(params![user_id], map_event)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

pub fn exists(conn: &Connection, id: Id<Event>) -> GuestlistResult<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(found)
}
