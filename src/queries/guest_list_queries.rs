use rusqlite::Connection;
use serde::Serialize;

use crate::db::{event_repo, guest_list_repo, guest_repo, user_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Event, Guest, GuestList, Id, User, Venue};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListWithGuests {
    #[serde(flatten)]
    pub list: GuestList,
    pub guests: Vec<Guest>,
}

impl GuestListWithGuests {
    pub fn remaining(&self) -> Option<i32> {
        self.list.remaining(self.guests.len())
    }

    pub fn confirmed_count(&self) -> usize {
        self.guests.iter().filter(|g| g.confirmed).count()
    }
}

/// A guest list with its event, venue and creator, as shown on venue pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListOverview {
    #[serde(flatten)]
    pub list: GuestListWithGuests,
    pub event: Event,
    pub venue: Venue,
    pub created_by: Option<User>,
}

pub fn with_guests(conn: &Connection, lists: Vec<GuestList>) -> GuestlistResult<Vec<GuestListWithGuests>> {
    lists
        .into_iter()
        .map(|list| {
            let guests = guest_repo::find_by_list(conn, list.id)?;
            Ok(GuestListWithGuests { list, guests })
        })
        .collect()
}

pub fn event_guest_lists(conn: &Connection, event_id: Id<Event>) -> GuestlistResult<Vec<GuestListWithGuests>> {
    with_guests(conn, guest_list_repo::find_by_event(conn, event_id)?)
}

pub fn guest_list(conn: &Connection, id: Id<GuestList>) -> GuestlistResult<GuestListWithGuests> {
    let list = guest_list_repo::find_by_id(conn, id)?
        .ok_or_else(|| GuestlistError::not_found("GuestList", id))?;
    let guests = guest_repo::find_by_list(conn, id)?;
    Ok(GuestListWithGuests { list, guests })
}

pub fn venue_guest_lists(conn: &Connection, venue_id: Id<Venue>) -> GuestlistResult<Vec<GuestListOverview>> {
    let venue = venue_repo::find_by_id(conn, venue_id)?
        .ok_or_else(|| GuestlistError::not_found("Venue", venue_id))?;

    let mut overviews = Vec::new();
    for list in with_guests(conn, guest_list_repo::find_by_venue(conn, venue_id)?)? {
        let event = event_repo::find_by_id(conn, list.list.event_id)?
            .ok_or_else(|| GuestlistError::not_found("Event", list.list.event_id))?;
        let created_by = user_repo::find_by_id(conn, list.list.created_by)?;
        overviews.push(GuestListOverview {
            list,
            event,
            venue: venue.clone(),
            created_by,
        });
    }
    Ok(overviews)
}
