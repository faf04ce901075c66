use rusqlite::Connection;
use tracing::instrument;

use crate::auth::Session;
use crate::db::{user_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Id, Organization, Venue};
use crate::validation::{self, trim_optional};

#[instrument(skip_all, err)]
pub fn create_organization(conn: &Connection, name: &str) -> GuestlistResult<Organization> {
    let org = Organization::create(validation::non_blank(name, "name")?);
    user_repo::insert_organization(conn, &org)?;
    Ok(org)
}

#[instrument(skip_all, err)]
pub fn create_venue(
    conn: &Connection,
    _session: &Session,
    name: &str,
    address: Option<&str>,
    capacity: i32,
    organization_id: Option<Id<Organization>>,
) -> GuestlistResult<Venue> {
    let name = validation::non_blank(name, "name")?;
    let capacity = validation::positive(capacity, "capacity")?;

    if let Some(org_id) = organization_id {
        if user_repo::find_organization(conn, org_id)?.is_none() {
            return Err(GuestlistError::not_found("Organization", org_id));
        }
    }

    let mut venue = Venue::create(name, trim_optional(address), capacity);
    venue.organization_id = organization_id;
    venue_repo::insert(conn, &venue)?;
    Ok(venue)
}

#[instrument(skip_all, err)]
pub fn list_venues(conn: &Connection) -> GuestlistResult<Vec<Venue>> {
    venue_repo::find_all(conn)
}
