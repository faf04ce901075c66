use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::user::{Organization, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Id<Venue>,
    pub name: String,
    pub address: Option<String>,
    pub capacity: i32,
    pub organization_id: Option<Id<Organization>>,
}

impl Venue {
    pub fn create(name: String, address: Option<String>, capacity: i32) -> Self {
        Self {
            id: Id::generate(),
            name,
            address,
            capacity,
            organization_id: None,
        }
    }
}

/// A dated occurrence at a venue. Owns zero or more guest lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Id<Event>,
    pub name: String,
    pub venue_id: Id<Venue>,
    pub starts_at: DateTime<Utc>,
    pub created_by: Id<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn create(
        name: String,
        venue_id: Id<Venue>,
        starts_at: DateTime<Utc>,
        created_by: Id<User>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Id::generate(),
            name,
            venue_id,
            starts_at,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What an editor submits when creating or editing an event.
///
/// On edit, `guest_lists: None` leaves the lists alone while `Some` makes
/// them match exactly, so `Some(vec![])` removes every list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub name: String,
    pub venue_id: Id<Venue>,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub guest_lists: Option<Vec<super::guest_list::GuestListInput>>,
}
