use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{GuestList, Id, Link};

const SELECT_LINK: &str = "SELECT id, guest_list_id, name, capacity, plus_one, can_view, can_edit, \
     needs_confirmation, active, is_one_time, redeemed, created_by, created_at FROM links";

pub fn insert(conn: &Connection, link: &Link) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO links (id, guest_list_id, name, capacity, plus_one, can_view, can_edit,
             needs_confirmation, active, is_one_time, redeemed, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            link.id,
            link.guest_list_id,
            link.name,
            link.capacity,
            link.plus_one,
            link.can_view,
            link.can_edit,
            link.needs_confirmation,
            link.active,
            link.is_one_time,
            link.redeemed,
            link.created_by,
            link.created_at,
        ],
    )?;
    Ok(())
}

fn map_link(row: &Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link {
        id: row.get(0)?,
        guest_list_id: row.get(1)?,
        name: row.get(2)?,
        capacity: row.get(3)?,
        plus_one: row.get(4)?,
        can_view: row.get(5)?,
        can_edit: row.get(6)?,
        needs_confirmation: row.get(7)?,
        active: row.get(8)?,
        is_one_time: row.get(9)?,
        redeemed: row.get(10)?,
        created_by: row.get(11)?,
        created_at: row.get(12)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Link>) -> GuestlistResult<Option<Link>> {
    let link = conn
        .query_row(&format!("{} WHERE id = ?1", SELECT_LINK), params![id], map_link)
        .optional()?;
    Ok(link)
}

pub fn find_by_list(conn: &Connection, list_id: Id<GuestList>) -> GuestlistResult<Vec<Link>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE guest_list_id = ?1 ORDER BY created_at, rowid",
        SELECT_LINK
    ))?;
    let links = stmt
        .query_map(params![list_id], map_link)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(links)
}

/// Adds `count` to the redeemed counter if the link is active and has room.
/// Returns false when the guard rejected the update.
pub fn record_redemption(conn: &Connection, id: Id<Link>, count: i32) -> GuestlistResult<bool> {
    let changed = conn.execute(
        "UPDATE links SET redeemed = redeemed + ?1
         WHERE id = ?2 AND active = 1 AND redeemed + ?1 <= capacity",
        params![count, id],
    )?;
    Ok(changed == 1)
}

pub fn set_active(conn: &Connection, id: Id<Link>, active: bool) -> GuestlistResult<()> {
    conn.execute(
        "UPDATE links SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    Ok(())
}
