use rusqlite::Connection;

use crate::db::{event_repo, guest_list_repo, guest_repo, link_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Id, Link, LinkDetails};

/// Loads a link with its guest list, event, venue and the list's guests.
pub fn link_details(conn: &Connection, link_id: Id<Link>) -> GuestlistResult<LinkDetails> {
    let link = link_repo::find_by_id(conn, link_id)?
        .ok_or_else(|| GuestlistError::not_found("Link", link_id))?;
    let guest_list = guest_list_repo::find_by_id(conn, link.guest_list_id)?
        .ok_or_else(|| GuestlistError::not_found("GuestList", link.guest_list_id))?;
    let event = event_repo::find_by_id(conn, guest_list.event_id)?
        .ok_or_else(|| GuestlistError::not_found("Event", guest_list.event_id))?;
    let venue = venue_repo::find_by_id(conn, event.venue_id)?
        .ok_or_else(|| GuestlistError::not_found("Venue", event.venue_id))?;
    let guests = guest_repo::find_by_list(conn, guest_list.id)?;

    Ok(LinkDetails {
        link,
        guest_list,
        event,
        venue,
        guests,
    })
}
