use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use tracing::instrument;

use crate::auth::Session;
use crate::db::{event_repo, guest_list_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Event, GuestList, GuestListInput, Id, User};
use crate::ops::reconcile::{self, ReconcilePlan};
use crate::queries::guest_list_queries::{self, GuestListWithGuests};
use crate::validation;

/// Result of reconciling an event's guest lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub guest_lists: Vec<GuestListWithGuests>,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl Reconciliation {
    pub fn write_count(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Makes the event's guest lists match `desired` in one transaction.
///
/// Deletes run first, then updates, then inserts. Any failure, such as a
/// list that still has guests, rolls back the whole call.
#[instrument(name = "reconcile", skip_all, fields(event_id = %event_id, user_id = %session.user_id), err)]
pub fn reconcile(
    conn: &Connection,
    session: &Session,
    event_id: Id<Event>,
    desired: &[GuestListInput],
) -> GuestlistResult<Reconciliation> {
    let tx = conn.unchecked_transaction()?;
    let plan = reconcile_within(&tx, session.user_id, event_id, desired)?;
    tx.commit()?;

    tracing::info!(
        created = plan.to_create.len(),
        updated = plan.to_update.len(),
        deleted = plan.to_delete.len(),
        "guest lists reconciled"
    );

    Ok(Reconciliation {
        guest_lists: guest_list_queries::event_guest_lists(conn, event_id)?,
        created: plan.to_create.len(),
        updated: plan.to_update.len(),
        deleted: plan.to_delete.len(),
    })
}

/// Diffs and applies on a connection that is already inside a transaction.
pub(crate) fn reconcile_within(
    conn: &Connection,
    actor: Id<User>,
    event_id: Id<Event>,
    desired: &[GuestListInput],
) -> GuestlistResult<ReconcilePlan> {
    if !event_repo::exists(conn, event_id)? {
        return Err(GuestlistError::not_found("Event", event_id));
    }

    let current = guest_list_repo::find_by_event(conn, event_id)?;
    let plan = reconcile::diff(&current, desired)?;
    if plan.is_noop() {
        return Ok(plan);
    }

    for id in &plan.to_delete {
        guest_list_repo::delete(conn, *id)?;
    }

    let now = Utc::now();
    for update in &plan.to_update {
        if let Some(mut list) = current.iter().find(|c| c.id == update.id).cloned() {
            list.name = update.name.clone();
            list.max_capacity = Some(update.max_capacity);
            list.updated_at = now;
            guest_list_repo::update_details(conn, &list)?;
        }
    }

    for draft in &plan.to_create {
        let list = GuestList::create(draft.name.clone(), event_id, Some(draft.max_capacity), actor);
        guest_list_repo::insert(conn, &list)?;
    }

    Ok(plan)
}

/// Adds new lists to an event. Ids on the inputs are ignored.
#[instrument(skip_all, fields(event_id = %event_id), err)]
pub fn create_guest_lists(
    conn: &Connection,
    session: &Session,
    event_id: Id<Event>,
    lists: &[GuestListInput],
) -> GuestlistResult<Vec<GuestList>> {
    if lists.is_empty() {
        return Ok(Vec::new());
    }
    if !event_repo::exists(conn, event_id)? {
        return Err(GuestlistError::not_found("Event", event_id));
    }

    let tx = conn.unchecked_transaction()?;
    let mut created = Vec::with_capacity(lists.len());
    for input in lists {
        let name = validation::non_blank(&input.name, "name")?;
        let max_capacity = validation::positive(input.max_capacity, "max_capacity")?;
        let list = GuestList::create(name, event_id, Some(max_capacity), session.user_id);
        guest_list_repo::insert(&tx, &list)?;
        created.push(list);
    }
    tx.commit()?;
    Ok(created)
}

#[instrument(skip_all, fields(guest_list_id = %id), err)]
pub fn update_guest_list(
    conn: &Connection,
    _session: &Session,
    id: Id<GuestList>,
    name: &str,
    max_capacity: Option<i32>,
) -> GuestlistResult<GuestList> {
    let mut list = guest_list_repo::find_by_id(conn, id)?
        .ok_or_else(|| GuestlistError::not_found("GuestList", id))?;

    list.name = validation::non_blank(name, "name")?;
    list.max_capacity = validation::optional_positive(max_capacity, "max_capacity")?;
    list.updated_at = Utc::now();

    guest_list_repo::update_details(conn, &list)?;
    Ok(list)
}

/// Deletes a list that has no guests and no links.
#[instrument(skip_all, fields(guest_list_id = %id), err)]
pub fn delete_guest_list(conn: &Connection, _session: &Session, id: Id<GuestList>) -> GuestlistResult<()> {
    if !guest_list_repo::exists(conn, id)? {
        return Err(GuestlistError::not_found("GuestList", id));
    }
    let (guests, links) = guest_list_repo::reference_counts(conn, id)?;
    if guests > 0 || links > 0 {
        return Err(GuestlistError::InUse {
            entity_type: "GuestList".into(),
            id: id.to_string(),
        });
    }
    guest_list_repo::delete(conn, id)
}

/// Opens or closes the signup gate of a list.
#[instrument(skip_all, fields(guest_list_id = %id, closed = closed), err)]
pub fn set_closed(
    conn: &Connection,
    _session: &Session,
    id: Id<GuestList>,
    closed: bool,
) -> GuestlistResult<GuestList> {
    if !guest_list_repo::exists(conn, id)? {
        return Err(GuestlistError::not_found("GuestList", id));
    }
    guest_list_repo::set_closed(conn, id, closed)?;
    guest_list_repo::find_by_id(conn, id)?
        .ok_or_else(|| GuestlistError::not_found("GuestList", id))
}
