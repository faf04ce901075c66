use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::GuestlistResult;
use crate::model::{Id, Organization, User};

pub fn insert_organization(conn: &Connection, org: &Organization) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO organizations (id, name) VALUES (?1, ?2)",
        params![org.id, org.name],
    )?;
    Ok(())
}

pub fn find_organization(conn: &Connection, id: Id<Organization>) -> GuestlistResult<Option<Organization>> {
    let org = conn
        .query_row(
            "SELECT id, name FROM organizations WHERE id = ?1",
            params![id],
            |row| {
                Ok(Organization {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(org)
}

pub fn insert(conn: &Connection, user: &User) -> GuestlistResult<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, role, organization_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.role,
            user.organization_id,
        ],
    )?;
    Ok(())
}

const SELECT_USER: &str =
    "SELECT id, name, email, password_hash, role, organization_id FROM users";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        organization_id: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<User>) -> GuestlistResult<Option<User>> {
    let user = conn
        .query_row(&format!("{} WHERE id = ?1", SELECT_USER), params![id], map_user)
        .optional()?;
    Ok(user)
}

pub fn find_by_email(conn: &Connection, email: &str) -> GuestlistResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("{} WHERE email = ?1 COLLATE NOCASE", SELECT_USER),
            params![email],
            map_user,
        )
        .optional()?;
    Ok(user)
}

pub fn exists(conn: &Connection, id: Id<User>) -> GuestlistResult<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn count(conn: &Connection) -> GuestlistResult<i64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(n)
}
