use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{Guest, GuestList, Id};

pub fn insert(conn: &Connection, guest: &Guest) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO guests (id, name, guest_list_id, confirmed, plus_one, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            guest.id,
            guest.name,
            guest.guest_list_id,
            guest.confirmed,
            guest.plus_one,
            guest.created_at,
        ],
    )?;
    Ok(())
}

pub fn set_confirmed(conn: &Connection, id: Id<Guest>, confirmed: bool) -> GuestlistResult<()> {
    conn.execute(
        "UPDATE guests SET confirmed = ?1 WHERE id = ?2",
        params![confirmed, id],
    )?;
    Ok(())
}

fn map_guest(row: &Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        name: row.get(1)?,
        guest_list_id: row.get(2)?,
        confirmed: row.get(3)?,
        plus_one: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Guest>) -> GuestlistResult<Option<Guest>> {
    let guest = conn
        .query_row(
            "SELECT id, name, guest_list_id, confirmed, plus_one, created_at FROM guests WHERE id = ?1",
            params![id],
            map_guest,
        )
        .optional()?;
    Ok(guest)
}

pub fn find_by_list(conn: &Connection, list_id: Id<GuestList>) -> GuestlistResult<Vec<Guest>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, guest_list_id, confirmed, plus_one, created_at FROM guests
         WHERE guest_list_id = ?1 ORDER BY created_at, rowid",
    )?;
    let guests = stmt
        .query_map(params![list_id], map_guest)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(guests)
}

pub fn count_by_list(conn: &Connection, list_id: Id<GuestList>) -> GuestlistResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM guests WHERE guest_list_id = ?1",
        params![list_id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
