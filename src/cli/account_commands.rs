use crate::cli::context::CliContext;
use crate::cli::{UserCommand, VenueCommand};
use crate::db::user_repo;
use crate::error::GuestlistResult;
use crate::ops::{user_ops, venue_ops};
use crate::seed;

pub fn seed(ctx: &CliContext, password: &str) -> GuestlistResult<()> {
    let stats = seed::seed(&ctx.conn, password)?;
    println!("Seed complete!");
    println!("  Organizations: {}", stats.organizations);
    println!("  Users: {}", stats.users);
    println!("  Venues: {}", stats.venues);
    println!("  Events: {}", stats.events);
    println!("  Guest lists: {}", stats.guest_lists);
    println!("  Guests: {}", stats.guests);
    Ok(())
}

pub fn user(ctx: &CliContext, cmd: UserCommand) -> GuestlistResult<()> {
    match cmd {
        UserCommand::Add {
            name,
            email,
            password,
            role,
        } => {
            // The first account can be created without logging in.
            let org = match ctx.session() {
                Ok(session) => user_repo::find_by_id(&ctx.conn, session.user_id)?
                    .and_then(|u| u.organization_id),
                Err(_) if user_repo::count(&ctx.conn)? == 0 => None,
                Err(e) => return Err(e),
            };
            let user = user_ops::register_user(&ctx.conn, &name, &email, &password, &role, org)?;
            println!("Registered {} <{}> ({})", user.name, user.email, user.id);
            Ok(())
        }
    }
}

pub fn venue(ctx: &CliContext, cmd: VenueCommand) -> GuestlistResult<()> {
    match cmd {
        VenueCommand::Add {
            name,
            capacity,
            address,
        } => {
            let session = ctx.session()?;
            let org = user_repo::find_by_id(&ctx.conn, session.user_id)?
                .and_then(|u| u.organization_id);
            let venue =
                venue_ops::create_venue(&ctx.conn, &session, &name, address.as_deref(), capacity, org)?;
            println!("Created venue: {} ({})", venue.name, venue.id);
            Ok(())
        }
        VenueCommand::List => {
            let venues = venue_ops::list_venues(&ctx.conn)?;
            if venues.is_empty() {
                println!("No venues yet. Use 'venue add <name> --capacity <n>' to create one.");
                return Ok(());
            }
            println!("Venues ({}):", venues.len());
            for venue in &venues {
                println!(
                    "  {}  {} (capacity {}){}",
                    venue.id,
                    venue.name,
                    venue.capacity,
                    venue.address.as_deref().map(|a| format!(", {}", a)).unwrap_or_default()
                );
            }
            Ok(())
        }
    }
}
