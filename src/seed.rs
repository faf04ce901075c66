use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::auth;
use crate::db::{event_repo, guest_list_repo, user_repo, venue_repo};
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Event, GuestList, Organization, User, Venue};
use crate::ops::guest_ops;

#[derive(Debug, Default)]
pub struct SeedStats {
    pub organizations: usize,
    pub users: usize,
    pub venues: usize,
    pub events: usize,
    pub guest_lists: usize,
    pub guests: usize,
}

struct DemoEvent {
    name: &'static str,
    venue: usize,
    host: usize,
    days_ahead: i64,
    guests: &'static [(&'static str, bool)],
}

const DEMO_EVENTS: &[DemoEvent] = &[
    DemoEvent {
        name: "Konzert1",
        venue: 0,
        host: 0,
        days_ahead: 1,
        guests: &[("John Doe", true), ("Jane Smith", false)],
    },
    DemoEvent {
        name: "Entrance",
        venue: 1,
        host: 0,
        days_ahead: 7,
        guests: &[("Bob Wilson", true), ("Alice Brown", true)],
    },
    DemoEvent {
        name: "Konzert2",
        venue: 0,
        host: 1,
        days_ahead: 14,
        guests: &[("Tom Johnson", true), ("Sarah Miller", false)],
    },
    DemoEvent {
        name: "NiteBox",
        venue: 1,
        host: 1,
        days_ahead: 21,
        guests: &[("Mike Davis", false), ("Lisa Taylor", false)],
    },
];

/// Fills an empty database with demo data in one transaction. Every demo
/// user gets `password`.
pub fn seed(conn: &Connection, password: &str) -> GuestlistResult<SeedStats> {
    if user_repo::count(conn)? > 0 {
        return Err(GuestlistError::DatabaseNotEmpty);
    }

    let mut stats = SeedStats::default();
    let password_hash = auth::hash_password(password)?;
    let tx = conn.unchecked_transaction()?;

    let org = Organization::create("Demo Events GmbH".into());
    user_repo::insert_organization(&tx, &org)?;
    stats.organizations += 1;

    let mut hosts = Vec::new();
    for (name, email) in [
        ("Carlos Frank", "carlos@example.com"),
        ("Alexander Haase", "alex@example.com"),
        ("Test User", "test@example.com"),
    ] {
        let mut user = User::create(name.into(), email.into(), password_hash.clone(), "admin".into());
        user.organization_id = Some(org.id);
        user_repo::insert(&tx, &user)?;
        hosts.push(user);
        stats.users += 1;
    }

    let mut venues = Vec::new();
    for name in ["Bahnhof Pauli", "Tranzit"] {
        let mut venue = Venue::create(
            name.into(),
            Some("Spielbudenplatz 21/22, 20359 Hamburg".into()),
            450,
        );
        venue.organization_id = Some(org.id);
        venue_repo::insert(&tx, &venue)?;
        venues.push(venue);
        stats.venues += 1;
    }

    for demo in DEMO_EVENTS {
        let host = hosts[demo.host].id;
        let starts_at = Utc::now() + Duration::days(demo.days_ahead);
        let event = Event::create(demo.name.into(), venues[demo.venue].id, starts_at, host);
        event_repo::insert(&tx, &event)?;
        stats.events += 1;

        let list = GuestList::create("Default Guest List".into(), event.id, Some(50), host);
        guest_list_repo::insert(&tx, &list)?;
        stats.guest_lists += 1;

        for (name, plus_one) in demo.guests {
            guest_ops::insert_guests_within(&tx, list.id, &[name.to_string()], *plus_one, true)?;
            stats.guests += 1;
        }
    }

    tx.commit()?;
    tracing::info!(events = stats.events, guests = stats.guests, "demo data seeded");
    Ok(stats)
}
