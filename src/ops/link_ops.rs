use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use tracing::instrument;

use crate::auth::Session;
use crate::db::{guest_list_repo, link_repo, user_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Guest, GuestList, Id, Link, LinkConsumption, LinkDetails, NewLink};
use crate::ops::guest_ops;
use crate::queries::link_queries;
use crate::token::LinkSigner;
use crate::validation;

const DEFAULT_LINK_NAME: &str = "tempLink";

/// Guests registered through a link, and the link as it stands afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub link: Link,
    pub guests: Vec<Guest>,
}

/// Mints a one-time link on a guest list, created by the session user.
#[instrument(skip_all, fields(guest_list_id = %params.guest_list_id, user_id = %session.user_id), err)]
pub fn create_link(conn: &Connection, session: &Session, params: &NewLink) -> GuestlistResult<Link> {
    let capacity = validation::positive(params.capacity, "capacity")?;
    let name = validation::trim_optional(Some(params.name.as_str())).unwrap_or_else(|| DEFAULT_LINK_NAME.to_string());

    if !user_repo::exists(conn, session.user_id)? {
        return Err(GuestlistError::InvalidUser {
            id: session.user_id.to_string(),
        });
    }
    if !guest_list_repo::exists(conn, params.guest_list_id)? {
        return Err(GuestlistError::not_found("GuestList", params.guest_list_id));
    }

    let link = Link::create_one_time(params, name, session.user_id);
    link_repo::insert(conn, &link)?;

    tracing::info!(link_id = %link.id, capacity, "one-time link created");
    Ok(link)
}

#[instrument(skip_all, fields(guest_list_id = %guest_list_id), err)]
pub fn links_for_guest_list(
    conn: &Connection,
    _session: &Session,
    guest_list_id: Id<GuestList>,
) -> GuestlistResult<Vec<Link>> {
    if !guest_list_repo::exists(conn, guest_list_id)? {
        return Err(GuestlistError::not_found("GuestList", guest_list_id));
    }
    link_repo::find_by_list(conn, guest_list_id)
}

#[instrument(skip_all, fields(link_id = %link_id), err)]
pub fn get_link(conn: &Connection, _session: &Session, link_id: Id<Link>) -> GuestlistResult<LinkDetails> {
    link_queries::link_details(conn, link_id)
}

/// Revokes or re-enables a link by hand.
#[instrument(skip_all, fields(link_id = %link_id, active = active), err)]
pub fn set_active(
    conn: &Connection,
    _session: &Session,
    link_id: Id<Link>,
    active: bool,
) -> GuestlistResult<Link> {
    let mut link = link_repo::find_by_id(conn, link_id)?
        .ok_or_else(|| GuestlistError::not_found("Link", link_id))?;
    link_repo::set_active(conn, link_id, active)?;
    link.active = active;
    Ok(link)
}

/// Signs a token for the link. Only the token goes into the public URL.
#[instrument(skip_all, fields(link_id = %link_id), err)]
pub fn issue_token(_session: &Session, signer: &LinkSigner, link_id: Id<Link>) -> GuestlistResult<String> {
    signer.issue(link_id)
}

/// Verifies a token and loads the link it points at. No session required.
#[instrument(skip_all, err)]
pub fn resolve_token(conn: &Connection, signer: &LinkSigner, token: &str) -> GuestlistResult<LinkDetails> {
    let claims = signer.verify(token)?;
    link_queries::link_details(conn, claims.link_id)
}

/// Registers `names` on the link's guest list.
///
/// The capacity check, the guest inserts and the counter update share one
/// immediate transaction, so two visitors racing on the same link cannot
/// both take the last place.
#[instrument(skip_all, fields(count = names.len(), policy = %policy), err)]
pub fn redeem(
    conn: &Connection,
    signer: &LinkSigner,
    token: &str,
    names: &[String],
    policy: LinkConsumption,
) -> GuestlistResult<Redemption> {
    let claims = signer.verify(token)?;
    let names = validation::non_blank_names(names, "names")?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut link = link_repo::find_by_id(&tx, claims.link_id)?
        .ok_or_else(|| GuestlistError::not_found("Link", claims.link_id))?;

    if !link.active {
        return Err(GuestlistError::LinkInactive {
            id: link.id.to_string(),
        });
    }
    if names.len() > link.remaining() as usize {
        return Err(GuestlistError::LinkCapacityExceeded {
            id: link.id.to_string(),
            remaining: link.remaining(),
            requested: names.len(),
        });
    }

    let guests = guest_ops::insert_guests_within(
        &tx,
        link.guest_list_id,
        &names,
        link.plus_one,
        !link.needs_confirmation,
    )?;

    let count = names.len() as i32;
    if !link_repo::record_redemption(&tx, link.id, count)? {
        return Err(GuestlistError::LinkCapacityExceeded {
            id: link.id.to_string(),
            remaining: link.remaining(),
            requested: names.len(),
        });
    }
    link.redeemed += count;

    if policy.deactivates(link.redeemed, link.capacity) {
        link_repo::set_active(&tx, link.id, false)?;
        link.active = false;
    }
    tx.commit()?;

    tracing::info!(
        link_id = %link.id,
        redeemed = link.redeemed,
        capacity = link.capacity,
        active = link.active,
        "link redeemed"
    );
    Ok(Redemption { link, guests })
}
