use serde::{Deserialize, Serialize};

use super::ids::Id;

/// A tenant grouping users and venues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Id<Organization>,
    pub name: String,
}

impl Organization {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
        }
    }
}

/// An account that can manage events. `password_hash` is an argon2 PHC
/// string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id<User>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub organization_id: Option<Id<Organization>>,
}

impl User {
    pub fn create(name: String, email: String, password_hash: String, role: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            email,
            password_hash,
            role,
            organization_id: None,
        }
    }
}
