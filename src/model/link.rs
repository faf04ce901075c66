use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::event::{Event, Venue};
use super::guest_list::{Guest, GuestList};
use super::ids::Id;
use super::user::User;

/// A shareable invitation that lets an unauthenticated guest register up to
/// `capacity` names on one guest list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: Id<Link>,
    pub guest_list_id: Id<GuestList>,
    pub name: String,
    pub capacity: i32,
    pub plus_one: bool,
    pub can_view: bool,
    pub can_edit: bool,
    pub needs_confirmation: bool,
    pub active: bool,
    pub is_one_time: bool,
    /// Names registered through this link so far.
    pub redeemed: i32,
    pub created_by: Id<User>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn create_one_time(params: &NewLink, name: String, created_by: Id<User>) -> Self {
        Self {
            id: Id::generate(),
            guest_list_id: params.guest_list_id,
            name,
            capacity: params.capacity,
            plus_one: params.plus_one,
            can_view: params.can_view,
            can_edit: params.can_edit,
            needs_confirmation: params.needs_confirmation,
            active: true,
            is_one_time: true,
            redeemed: 0,
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn remaining(&self) -> i32 {
        (self.capacity - self.redeemed).max(0)
    }
}

/// Parameters for minting a one-time link. The creator comes from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub guest_list_id: Id<GuestList>,
    #[serde(default)]
    pub name: String,
    pub capacity: i32,
    #[serde(default)]
    pub plus_one: bool,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub needs_confirmation: bool,
}

impl NewLink {
    pub fn new(guest_list_id: Id<GuestList>, capacity: i32) -> Self {
        Self {
            guest_list_id,
            name: String::new(),
            capacity,
            plus_one: false,
            can_view: false,
            can_edit: false,
            needs_confirmation: false,
        }
    }
}

/// When a link stops accepting redemptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkConsumption {
    /// Stays active; only the capacity bounds redemptions.
    Never,
    /// Deactivated by the first successful redemption.
    FirstUse,
    /// Deactivated once every place has been used.
    #[default]
    Exhausted,
}

impl LinkConsumption {
    pub fn deactivates(&self, redeemed: i32, capacity: i32) -> bool {
        match self {
            LinkConsumption::Never => false,
            LinkConsumption::FirstUse => redeemed > 0,
            LinkConsumption::Exhausted => redeemed >= capacity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkConsumption::Never => "never",
            LinkConsumption::FirstUse => "first-use",
            LinkConsumption::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for LinkConsumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkConsumption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(LinkConsumption::Never),
            "first-use" | "first_use" => Ok(LinkConsumption::FirstUse),
            "exhausted" => Ok(LinkConsumption::Exhausted),
            other => Err(format!(
                "unknown link consumption policy '{}', expected never, first-use or exhausted",
                other
            )),
        }
    }
}

/// A link with everything the public signup page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetails {
    pub link: Link,
    pub guest_list: GuestList,
    pub event: Event,
    pub venue: Venue,
    pub guests: Vec<Guest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_policy_waits_for_full_capacity() {
        let policy = LinkConsumption::Exhausted;
        assert!(!policy.deactivates(2, 3));
        assert!(policy.deactivates(3, 3));
    }

    #[test]
    fn first_use_policy_deactivates_after_any_redemption() {
        assert!(!LinkConsumption::FirstUse.deactivates(0, 3));
        assert!(LinkConsumption::FirstUse.deactivates(1, 3));
    }

    #[test]
    fn never_policy_keeps_link_active() {
        assert!(!LinkConsumption::Never.deactivates(3, 3));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("first_use".parse::<LinkConsumption>().unwrap(), LinkConsumption::FirstUse);
        assert_eq!(" Never ".parse::<LinkConsumption>().unwrap(), LinkConsumption::Never);
        assert!("sometimes".parse::<LinkConsumption>().is_err());
    }

    #[test]
    fn remaining_counts_down_with_redemptions() {
        let mut link = Link::create_one_time(&NewLink::new(Id::generate(), 3), "x".into(), Id::generate());
        assert_eq!(link.remaining(), 3);
        link.redeemed = 2;
        assert_eq!(link.remaining(), 1);
    }
}
