use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{Event, GuestList, Id, Venue};

const SELECT_LIST: &str = "SELECT gl.id, gl.name, gl.event_id, gl.max_capacity, gl.closed, \
     gl.created_by, gl.created_at, gl.updated_at FROM guest_lists gl";

pub fn insert(conn: &Connection, list: &GuestList) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO guest_lists (id, name, event_id, max_capacity, closed, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            list.id,
            list.name,
            list.event_id,
            list.max_capacity,
            list.closed,
            list.created_by,
            list.created_at,
            list.updated_at,
        ],
    )?;
    Ok(())
}

/// Writes name and max capacity only; `closed` and ownership are left alone.
pub fn update_details(conn: &Connection, list: &GuestList) -> GuestlistResult<()> {
    conn.execute(
        "UPDATE guest_lists SET name = ?1, max_capacity = ?2, updated_at = ?3 WHERE id = ?4",
        params![list.name, list.max_capacity, list.updated_at, list.id],
    )?;
    Ok(())
}

pub fn set_closed(conn: &Connection, id: Id<GuestList>, closed: bool) -> GuestlistResult<()> {
    conn.execute(
        "UPDATE guest_lists SET closed = ?1, updated_at = ?2 WHERE id = ?3",
        params![closed, chrono::Utc::now(), id],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Id<GuestList>) -> GuestlistResult<()> {
    conn.execute("DELETE FROM guest_lists WHERE id = ?1", params![id])?;
    Ok(())
}

fn map_list(row: &Row<'_>) -> rusqlite::Result<GuestList> {
    Ok(GuestList {
        id: row.get(0)?,
        name: row.get(1)?,
        event_id: row.get(2)?,
        max_capacity: row.get(3)?,
        closed: row.get(4)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<GuestList>) -> GuestlistResult<Option<GuestList>> {
    let list = conn
        .query_row(&format!("{} WHERE gl.id = ?1", SELECT_LIST), params![id], map_list)
        .optional()?;
    Ok(list)
}

/// Lists of one event in creation order.
pub fn find_by_event(conn: &Connection, event_id: Id<Event>) -> GuestlistResult<Vec<GuestList>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE gl.event_id = ?1 ORDER BY gl.created_at, gl.rowid",
        SELECT_LIST
    ))?;
    let lists = stmt
        .query_map(params![event_id], map_list)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

pub fn find_by_venue(conn: &Connection, venue_id: Id<Venue>) -> GuestlistResult<Vec<GuestList>> {
    let mut stmt = conn.prepare(&format!(
        "{} JOIN events e ON e.id = gl.event_id WHERE e.venue_id = ?1 \
         ORDER BY e.starts_at DESC, gl.created_at, gl.rowid",
        SELECT_LIST
    ))?;
    let lists = stmt
        .query_map(params![venue_id], map_list)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

pub fn exists(conn: &Connection, id: Id<GuestList>) -> GuestlistResult<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM guest_lists WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// Number of guests and links still pointing at the list.
pub fn reference_counts(conn: &Connection, id: Id<GuestList>) -> GuestlistResult<(i64, i64)> {
    let counts = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM guests WHERE guest_list_id = ?1),
                (SELECT COUNT(*) FROM links WHERE guest_list_id = ?1)",
        params![id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}
