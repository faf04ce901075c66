use rusqlite::Connection;
use tracing::instrument;

use crate::auth::{self, Session};
use crate::db::user_repo;
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Id, Organization, User};
use crate::validation;

#[instrument(skip_all, fields(email = %email), err)]
pub fn register_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    organization_id: Option<Id<Organization>>,
) -> GuestlistResult<User> {
    let name = validation::non_blank(name, "name")?;
    let email = validation::non_blank(email, "email")?;
    let role = validation::non_blank(role, "role")?;
    if password.is_empty() {
        return Err(GuestlistError::BlankField {
            field: "password".into(),
        });
    }

    if user_repo::find_by_email(conn, &email)?.is_some() {
        return Err(GuestlistError::AlreadyExists {
            entity_type: "User".into(),
            identifier: email,
        });
    }

    let mut user = User::create(name, email, auth::hash_password(password)?, role);
    user.organization_id = organization_id;
    user_repo::insert(conn, &user)?;
    Ok(user)
}

/// Checks credentials and opens a session. Unknown email and wrong
/// password fail the same way.
#[instrument(skip_all, fields(email = %email), err)]
pub fn login(conn: &Connection, email: &str, password: &str) -> GuestlistResult<Session> {
    let user = user_repo::find_by_email(conn, email.trim())?
        .ok_or(GuestlistError::InvalidCredentials)?;
    if !auth::verify_password(password, &user.password_hash) {
        return Err(GuestlistError::InvalidCredentials);
    }
    Ok(Session::for_user(&user))
}
