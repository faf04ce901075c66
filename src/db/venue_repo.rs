use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{Id, Venue};

pub fn insert(conn: &Connection, venue: &Venue) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO venues (id, name, address, capacity, organization_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            venue.id,
            venue.name,
            venue.address,
            venue.capacity,
            venue.organization_id,
        ],
    )?;
    Ok(())
}

fn map_venue(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        capacity: row.get(3)?,
        organization_id: row.get(4)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Venue>) -> GuestlistResult<Option<Venue>> {
    let venue = conn
        .query_row(
            "SELECT id, name, address, capacity, organization_id FROM venues WHERE id = ?1",
            params![id],
            map_venue,
        )
        .optional()?;
    Ok(venue)
}

pub fn find_all(conn: &Connection) -> GuestlistResult<Vec<Venue>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, address, capacity, organization_id FROM venues ORDER BY name",
    )?;
    let venues = stmt
        .query_map([], map_venue)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(venues)
}
