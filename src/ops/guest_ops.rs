use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::instrument;

use crate::auth::Session;
use crate::db::{guest_list_repo, guest_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Guest, GuestList, Id};
use crate::validation;

/// Adds one guest to a list.
#[instrument(skip_all, fields(guest_list_id = %guest_list_id), err)]
pub fn create_guest(
    conn: &Connection,
    session: &Session,
    guest_list_id: Id<GuestList>,
    name: &str,
    plus_one: bool,
    confirmed: bool,
) -> GuestlistResult<Guest> {
    let mut guests = create_guests(conn, session, guest_list_id, &[name.to_string()], plus_one, confirmed)?;
    guests
        .pop()
        .ok_or_else(|| GuestlistError::Other("guest insert returned nothing".into()))
}

/// Adds a batch of guests sharing the same flags, all or none.
#[instrument(skip_all, fields(guest_list_id = %guest_list_id, count = names.len()), err)]
pub fn create_guests(
    conn: &Connection,
    _session: &Session,
    guest_list_id: Id<GuestList>,
    names: &[String],
    plus_one: bool,
    confirmed: bool,
) -> GuestlistResult<Vec<Guest>> {
    let names = validation::non_blank_names(names, "names")?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let guests = insert_guests_within(&tx, guest_list_id, &names, plus_one, confirmed)?;
    tx.commit()?;
    Ok(guests)
}

/// Inserts guests after checking the list is open and has room. Must run
/// inside a transaction so the count and the inserts cannot interleave with
/// another writer.
pub(crate) fn insert_guests_within(
    conn: &Connection,
    guest_list_id: Id<GuestList>,
    names: &[String],
    plus_one: bool,
    confirmed: bool,
) -> GuestlistResult<Vec<Guest>> {
    let list = guest_list_repo::find_by_id(conn, guest_list_id)?
        .ok_or_else(|| GuestlistError::not_found("GuestList", guest_list_id))?;

    if list.closed {
        return Err(GuestlistError::GuestListClosed {
            id: list.id.to_string(),
        });
    }

    if let Some(max_capacity) = list.max_capacity {
        let count = guest_repo::count_by_list(conn, list.id)?;
        if count + names.len() > max_capacity as usize {
            return Err(GuestlistError::GuestListFull {
                id: list.id.to_string(),
                max_capacity,
            });
        }
    }

    let mut guests = Vec::with_capacity(names.len());
    for name in names {
        let guest = Guest::create(name.clone(), list.id, plus_one, confirmed);
        guest_repo::insert(conn, &guest)?;
        guests.push(guest);
    }
    Ok(guests)
}

#[instrument(skip_all, fields(guest_id = %guest_id, confirmed = confirmed), err)]
pub fn set_confirmed(
    conn: &Connection,
    _session: &Session,
    guest_id: Id<Guest>,
    confirmed: bool,
) -> GuestlistResult<Guest> {
    let mut guest = guest_repo::find_by_id(conn, guest_id)?
        .ok_or_else(|| GuestlistError::not_found("Guest", guest_id))?;

    guest_repo::set_confirmed(conn, guest_id, confirmed)?;
    guest.confirmed = confirmed;
    Ok(guest)
}
