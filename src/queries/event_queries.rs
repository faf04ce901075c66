use rusqlite::Connection;
use serde::Serialize;

use crate::db::{event_repo, user_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Event, Id, User, Venue};
use crate::queries::guest_list_queries::{self, GuestListWithGuests};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithVenue {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Venue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Venue,
    pub created_by: Option<User>,
    pub guest_lists: Vec<GuestListWithGuests>,
}

impl EventDetails {
    pub fn guest_count(&self) -> usize {
        self.guest_lists.iter().map(|l| l.guests.len()).sum()
    }
}

fn attach_venue(conn: &Connection, event: Event) -> GuestlistResult<EventWithVenue> {
    let venue = venue_repo::find_by_id(conn, event.venue_id)?
        .ok_or_else(|| GuestlistError::not_found("Venue", event.venue_id))?;
    Ok(EventWithVenue { event, venue })
}

/// Every event, most recent first.
pub fn all_events(conn: &Connection) -> GuestlistResult<Vec<EventWithVenue>> {
    event_repo::find_all(conn)?
        .into_iter()
        .map(|e| attach_venue(conn, e))
        .collect()
}

pub fn events_for_user(conn: &Connection, user_id: Id<User>) -> GuestlistResult<Vec<EventWithVenue>> {
    event_repo::find_by_creator(conn, user_id)?
        .into_iter()
        .map(|e| attach_venue(conn, e))
        .collect()
}

pub fn events_for_venue(conn: &Connection, venue_id: Id<Venue>) -> GuestlistResult<Vec<EventDetails>> {
    event_repo::find_by_venue(conn, venue_id)?
        .into_iter()
        .map(|e| details_for(conn, e))
        .collect()
}

pub fn event_details(conn: &Connection, event_id: Id<Event>) -> GuestlistResult<EventDetails> {
    let event = event_repo::find_by_id(conn, event_id)?
        .ok_or_else(|| GuestlistError::not_found("Event", event_id))?;
    details_for(conn, event)
}

fn details_for(conn: &Connection, event: Event) -> GuestlistResult<EventDetails> {
    let EventWithVenue { event, venue } = attach_venue(conn, event)?;
    let created_by = user_repo::find_by_id(conn, event.created_by)?;
    let guest_lists = guest_list_queries::event_guest_lists(conn, event.id)?;
    Ok(EventDetails {
        event,
        venue,
        created_by,
        guest_lists,
    })
}
