use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::ids::Id;
use super::user::User;

/// A named, optionally capacity-bounded list of guests for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestList {
    pub id: Id<GuestList>,
    pub name: String,
    pub event_id: Id<Event>,
    /// `None` means unlimited.
    pub max_capacity: Option<i32>,
    /// When set, no further guests can be added.
    pub closed: bool,
    pub created_by: Id<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuestList {
    pub fn create(
        name: String,
        event_id: Id<Event>,
        max_capacity: Option<i32>,
        created_by: Id<User>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Id::generate(),
            name,
            event_id,
            max_capacity,
            closed: false,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Places left, or `None` when the list is unlimited.
    pub fn remaining(&self, guest_count: usize) -> Option<i32> {
        self.max_capacity
            .map(|max| (max - guest_count as i32).max(0))
    }
}

/// One entry of an editor's submitted guest lists. Entries without an id
/// are new lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestListInput {
    #[serde(default)]
    pub id: Option<Id<GuestList>>,
    pub name: String,
    pub max_capacity: i32,
}

impl GuestListInput {
    pub fn new(name: &str, max_capacity: i32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            max_capacity,
        }
    }

    pub fn existing(id: Id<GuestList>, name: &str, max_capacity: i32) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
            max_capacity,
        }
    }
}

/// A guest registered on a list. Only `confirmed` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Id<Guest>,
    pub name: String,
    pub guest_list_id: Id<GuestList>,
    pub confirmed: bool,
    pub plus_one: bool,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn create(name: String, guest_list_id: Id<GuestList>, plus_one: bool, confirmed: bool) -> Self {
        Self {
            id: Id::generate(),
            name,
            guest_list_id,
            confirmed,
            plus_one,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_none_for_unlimited_lists() {
        let list = GuestList::create("Door".into(), Id::generate(), None, Id::generate());
        assert_eq!(list.remaining(500), None);
    }

    #[test]
    fn remaining_never_goes_negative() {
        let list = GuestList::create("Door".into(), Id::generate(), Some(2), Id::generate());
        assert_eq!(list.remaining(1), Some(1));
        assert_eq!(list.remaining(5), Some(0));
    }

    #[test]
    fn input_deserializes_without_id() {
        let input: GuestListInput =
            serde_json::from_str(r#"{"name":"VIP","maxCapacity":20}"#).unwrap();
        assert_eq!(input, GuestListInput::new("VIP", 20));
    }
}
