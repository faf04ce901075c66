use chrono::Utc;
use rusqlite::Connection;
use tracing::instrument;

use crate::auth::Session;
use crate::db::{event_repo, guest_list_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Event, EventForm, GuestList, Id};
use crate::ops::guest_list_ops;
use crate::queries::event_queries::{self, EventDetails};
use crate::validation;

/// Creates an event together with its initial guest lists.
#[instrument(skip_all, fields(user_id = %session.user_id), err)]
pub fn create_event(conn: &Connection, session: &Session, form: &EventForm) -> GuestlistResult<EventDetails> {
    let name = validation::non_blank(&form.name, "name")?;
    if venue_repo::find_by_id(conn, form.venue_id)?.is_none() {
        return Err(GuestlistError::not_found("Venue", form.venue_id));
    }

    let event = Event::create(name, form.venue_id, form.starts_at, session.user_id);

    let tx = conn.unchecked_transaction()?;
    event_repo::insert(&tx, &event)?;
    for input in form.guest_lists.iter().flatten() {
        let list_name = validation::non_blank(&input.name, "name")?;
        let max_capacity = validation::positive(input.max_capacity, "max_capacity")?;
        let list = GuestList::create(list_name, event.id, Some(max_capacity), session.user_id);
        guest_list_repo::insert(&tx, &list)?;
    }
    tx.commit()?;

    tracing::info!(event_id = %event.id, "event created");
    event_queries::event_details(conn, event.id)
}

/// Updates name, venue and date, and reconciles guest lists when the form
/// carries them, all in one transaction.
#[instrument(skip_all, fields(event_id = %event_id, user_id = %session.user_id), err)]
pub fn update_event(
    conn: &Connection,
    session: &Session,
    event_id: Id<Event>,
    form: &EventForm,
) -> GuestlistResult<EventDetails> {
    let mut event = event_repo::find_by_id(conn, event_id)?
        .ok_or_else(|| GuestlistError::not_found("Event", event_id))?;
    let name = validation::non_blank(&form.name, "name")?;
    if venue_repo::find_by_id(conn, form.venue_id)?.is_none() {
        return Err(GuestlistError::not_found("Venue", form.venue_id));
    }

    event.name = name;
    event.venue_id = form.venue_id;
    event.starts_at = form.starts_at;
    event.updated_at = Utc::now();

    let tx = conn.unchecked_transaction()?;
    event_repo::update(&tx, &event)?;
    if let Some(desired) = &form.guest_lists {
        guest_list_ops::reconcile_within(&tx, session.user_id, event_id, desired)?;
    }
    tx.commit()?;

    event_queries::event_details(conn, event_id)
}

/// Deletes an event and its guest lists. Refused while any list still has
/// guests or links.
#[instrument(skip_all, fields(event_id = %event_id), err)]
pub fn delete_event(conn: &Connection, _session: &Session, event_id: Id<Event>) -> GuestlistResult<()> {
    if !event_repo::exists(conn, event_id)? {
        return Err(GuestlistError::not_found("Event", event_id));
    }
    for list in guest_list_repo::find_by_event(conn, event_id)? {
        let (guests, links) = guest_list_repo::reference_counts(conn, list.id)?;
        if guests > 0 || links > 0 {
            return Err(GuestlistError::InUse {
                entity_type: "Event".into(),
                id: event_id.to_string(),
            });
        }
    }
    event_repo::delete(conn, event_id)
}
