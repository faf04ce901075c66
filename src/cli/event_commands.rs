use chrono::{DateTime, Utc};
use std::path::Path;

use crate::cli::context::{yes_no, CliContext};
use crate::cli::EventCommand;
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{EventForm, GuestListInput};
use crate::ops::event_ops;
use crate::queries::event_queries::{self, EventDetails, EventWithVenue};

pub fn run(ctx: &CliContext, cmd: EventCommand) -> GuestlistResult<()> {
    match cmd {
        EventCommand::Create {
            name,
            venue,
            starts_at,
            guest_lists,
        } => {
            let session = ctx.session()?;
            let form = EventForm {
                name,
                venue_id: ctx.parse_id(&venue, "venue")?,
                starts_at: parse_time(&starts_at)?,
                guest_lists: guest_lists.as_deref().map(read_guest_lists).transpose()?,
            };
            let details = event_ops::create_event(&ctx.conn, &session, &form)?;
            println!("Created event: {} ({})", details.event.name, details.event.id);
            print_details(&details);
            Ok(())
        }
        EventCommand::List { mine, venue } => {
            let events = match (mine, venue) {
                (_, Some(venue)) => {
                    let venue_id = ctx.parse_id(&venue, "venue")?;
                    event_queries::events_for_venue(&ctx.conn, venue_id)?
                        .into_iter()
                        .map(|d| EventWithVenue {
                            event: d.event,
                            venue: d.venue,
                        })
                        .collect()
                }
                (true, None) => {
                    let session = ctx.session()?;
                    event_queries::events_for_user(&ctx.conn, session.user_id)?
                }
                (false, None) => event_queries::all_events(&ctx.conn)?,
            };
            print_events(&events);
            Ok(())
        }
        EventCommand::Show { id } => {
            let details = event_queries::event_details(&ctx.conn, ctx.parse_id(&id, "event")?)?;
            print_details(&details);
            Ok(())
        }
        EventCommand::Update {
            id,
            name,
            venue,
            starts_at,
            guest_lists,
        } => {
            let session = ctx.session()?;
            let event_id = ctx.parse_id(&id, "event")?;
            let current = event_queries::event_details(&ctx.conn, event_id)?;
            let form = EventForm {
                name: name.unwrap_or(current.event.name),
                venue_id: match venue {
                    Some(v) => ctx.parse_id(&v, "venue")?,
                    None => current.event.venue_id,
                },
                starts_at: match starts_at {
                    Some(s) => parse_time(&s)?,
                    None => current.event.starts_at,
                },
                guest_lists: guest_lists.as_deref().map(read_guest_lists).transpose()?,
            };
            let details = event_ops::update_event(&ctx.conn, &session, event_id, &form)?;
            println!("Updated event: {}", details.event.name);
            print_details(&details);
            Ok(())
        }
        EventCommand::Delete { id } => {
            let session = ctx.session()?;
            event_ops::delete_event(&ctx.conn, &session, ctx.parse_id(&id, "event")?)?;
            println!("Deleted event {}", id);
            Ok(())
        }
    }
}

pub fn parse_time(value: &str) -> GuestlistResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| GuestlistError::InvalidValue {
            field: "startsAt".into(),
            value: value.to_string(),
        })
}

/// A JSON array of `{ "id"?, "name", "maxCapacity" }` objects. An unreadable
/// file or a malformed entry is rejected as bad input.
pub fn read_guest_lists(path: &Path) -> GuestlistResult<Vec<GuestListInput>> {
    let invalid = |reason: String| GuestlistError::InvalidValue {
        field: "guestLists".into(),
        value: format!("{}: {}", path.display(), reason),
    };
    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
}

fn print_events(events: &[EventWithVenue]) {
    if events.is_empty() {
        println!("No events yet.");
        return;
    }
    println!("Events ({}):", events.len());
    for e in events {
        println!(
            "  {}  {}  {} @ {}",
            e.event.id,
            e.event.starts_at.format("%Y-%m-%d %H:%M"),
            e.event.name,
            e.venue.name
        );
    }
}

fn print_details(details: &EventDetails) {
    println!();
    println!("Event: {} ({})", details.event.name, details.event.id);
    println!("Venue: {}", details.venue.name);
    println!("Starts: {}", details.event.starts_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(user) = &details.created_by {
        println!("Created by: {}", user.name);
    }
    if details.guest_lists.is_empty() {
        println!("Guest lists: (none)");
    }
    for entry in &details.guest_lists {
        let limit = entry
            .list
            .max_capacity
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unlimited".into());
        println!(
            "  {}  {} [{} / {}] closed: {}",
            entry.list.id,
            entry.list.name,
            entry.guests.len(),
            limit,
            yes_no(entry.list.closed)
        );
    }
    println!("Total guests: {}", details.guest_count());
    println!();
}
