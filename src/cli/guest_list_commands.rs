use crate::cli::context::{yes_no, CliContext};
use crate::cli::event_commands::read_guest_lists;
use crate::cli::{GuestCommand, GuestListCommand};
use crate::error::GuestlistResult;
use crate::ops::{guest_list_ops, guest_ops};
use crate::queries::guest_list_queries::{self, GuestListWithGuests};

pub fn run(ctx: &CliContext, cmd: GuestListCommand) -> GuestlistResult<()> {
    match cmd {
        GuestListCommand::Set { event, file } => {
            let session = ctx.session()?;
            let desired = read_guest_lists(&file)?;
            let result =
                guest_list_ops::reconcile(&ctx.conn, &session, ctx.parse_id(&event, "event")?, &desired)?;
            println!(
                "Guest lists updated: {} created, {} updated, {} deleted",
                result.created, result.updated, result.deleted
            );
            for entry in &result.guest_lists {
                print_summary(entry);
            }
            Ok(())
        }
        GuestListCommand::Show { id } => {
            let entry = guest_list_queries::guest_list(&ctx.conn, ctx.parse_id(&id, "guestList")?)?;
            print_summary(&entry);
            if entry.guests.is_empty() {
                println!("    (no guests)");
            }
            for guest in &entry.guests {
                println!(
                    "    {}  {}{}{}",
                    guest.id,
                    guest.name,
                    if guest.plus_one { " +1" } else { "" },
                    if guest.confirmed { "" } else { " (pending)" }
                );
            }
            Ok(())
        }
        GuestListCommand::Venue { venue } => {
            let lists = guest_list_queries::venue_guest_lists(&ctx.conn, ctx.parse_id(&venue, "venue")?)?;
            if lists.is_empty() {
                println!("No guest lists at this venue.");
            }
            for overview in &lists {
                println!(
                    "  {}  {} / {} ({})",
                    overview.list.list.id,
                    overview.event.name,
                    overview.list.list.name,
                    overview.created_by.as_ref().map(|u| u.name.as_str()).unwrap_or("unknown")
                );
            }
            Ok(())
        }
        GuestListCommand::Update { id, name, max } => {
            let session = ctx.session()?;
            let list_id = ctx.parse_id(&id, "guestList")?;
            let list = guest_list_ops::update_guest_list(&ctx.conn, &session, list_id, &name, max)?;
            println!("Updated guest list: {}", list.name);
            Ok(())
        }
        GuestListCommand::Close { id } => set_closed(ctx, &id, true),
        GuestListCommand::Open { id } => set_closed(ctx, &id, false),
        GuestListCommand::Delete { id } => {
            let session = ctx.session()?;
            guest_list_ops::delete_guest_list(&ctx.conn, &session, ctx.parse_id(&id, "guestList")?)?;
            println!("Deleted guest list {}", id);
            Ok(())
        }
    }
}

pub fn guest(ctx: &CliContext, cmd: GuestCommand) -> GuestlistResult<()> {
    match cmd {
        GuestCommand::Add {
            list,
            names,
            plus_one,
            pending,
        } => {
            let session = ctx.session()?;
            let guests = guest_ops::create_guests(
                &ctx.conn,
                &session,
                ctx.parse_id(&list, "guestList")?,
                &names,
                plus_one,
                !pending,
            )?;
            println!("Added {} guest(s)", guests.len());
            Ok(())
        }
        GuestCommand::Confirm { id } => set_confirmed(ctx, &id, true),
        GuestCommand::Unconfirm { id } => set_confirmed(ctx, &id, false),
    }
}

fn set_closed(ctx: &CliContext, id: &str, closed: bool) -> GuestlistResult<()> {
    let session = ctx.session()?;
    let list = guest_list_ops::set_closed(&ctx.conn, &session, ctx.parse_id(id, "guestList")?, closed)?;
    println!("{}: closed {}", list.name, yes_no(list.closed));
    Ok(())
}

fn set_confirmed(ctx: &CliContext, id: &str, confirmed: bool) -> GuestlistResult<()> {
    let session = ctx.session()?;
    let guest = guest_ops::set_confirmed(&ctx.conn, &session, ctx.parse_id(id, "guest")?, confirmed)?;
    println!("{}: confirmed {}", guest.name, yes_no(guest.confirmed));
    Ok(())
}

fn print_summary(entry: &GuestListWithGuests) {
    let places = match entry.remaining() {
        Some(n) => format!("{} places left", n),
        None => "no limit".to_string(),
    };
    println!(
        "  {}  {} [{} guests, {} confirmed, {}]{}",
        entry.list.id,
        entry.list.name,
        entry.guests.len(),
        entry.confirmed_count(),
        places,
        if entry.list.closed { " closed" } else { "" }
    );
}
