use crate::cli::context::{yes_no, CliContext};
use crate::cli::LinkCommand;
use crate::error::GuestlistResult;
use crate::model::{Id, Link, NewLink};
use crate::ops::link_ops;
use crate::signup::{signup_url, SignupForm};

pub fn run(ctx: &CliContext, cmd: LinkCommand) -> GuestlistResult<()> {
    match cmd {
        LinkCommand::Create {
            list,
            capacity,
            name,
            plus_one,
            can_view,
            can_edit,
            needs_confirmation,
        } => {
            let session = ctx.session()?;
            let signer = ctx.signer()?;
            let params = NewLink {
                name,
                plus_one,
                can_view,
                can_edit,
                needs_confirmation,
                ..NewLink::new(ctx.parse_id(&list, "guestList")?, capacity)
            };
            let link = link_ops::create_link(&ctx.conn, &session, &params)?;
            let token = link_ops::issue_token(&session, &signer, link.id)?;
            println!("Created link: {} ({} places)", link.name, link.capacity);
            println!("{}", signup_url(&ctx.config.public_origin, &token));
            Ok(())
        }
        LinkCommand::List { list } => {
            let session = ctx.session()?;
            let links = link_ops::links_for_guest_list(&ctx.conn, &session, ctx.parse_id(&list, "guestList")?)?;
            if links.is_empty() {
                println!("No links on this guest list.");
            }
            for link in &links {
                print_link(link);
            }
            Ok(())
        }
        LinkCommand::Show { id } => {
            let session = ctx.session()?;
            let details = link_ops::get_link(&ctx.conn, &session, ctx.parse_id(&id, "link")?)?;
            print_link(&details.link);
            println!("  Event: {} @ {}", details.event.name, details.venue.name);
            println!("  Guest list: {}", details.guest_list.name);
            for guest in &details.guests {
                println!("    {}", guest.name);
            }
            Ok(())
        }
        LinkCommand::Url { id } => {
            let session = ctx.session()?;
            let signer = ctx.signer()?;
            let link_id: Id<Link> = ctx.parse_id(&id, "link")?;
            link_ops::get_link(&ctx.conn, &session, link_id)?;
            let token = link_ops::issue_token(&session, &signer, link_id)?;
            println!("{}", signup_url(&ctx.config.public_origin, &token));
            Ok(())
        }
        LinkCommand::Revoke { id } => set_active(ctx, &id, false),
        LinkCommand::Restore { id } => set_active(ctx, &id, true),
        LinkCommand::Open { token } => {
            let signer = ctx.signer()?;
            let details = link_ops::resolve_token(&ctx.conn, &signer, &token)?;
            print!("{}", SignupForm::from_details(&details, &token).render_html());
            Ok(())
        }
        LinkCommand::Redeem { token, names } => {
            let signer = ctx.signer()?;
            let redemption =
                link_ops::redeem(&ctx.conn, &signer, &token, &names, ctx.config.link_consumption)?;
            println!("Signed up {} guest(s)", redemption.guests.len());
            println!(
                "{} places left, link active: {}",
                redemption.link.remaining(),
                yes_no(redemption.link.active)
            );
            Ok(())
        }
    }
}

fn set_active(ctx: &CliContext, id: &str, active: bool) -> GuestlistResult<()> {
    let session = ctx.session()?;
    let link = link_ops::set_active(&ctx.conn, &session, ctx.parse_id(id, "link")?, active)?;
    println!("{}: active {}", link.name, yes_no(link.active));
    Ok(())
}

fn print_link(link: &Link) {
    println!(
        "  {}  {} [{}/{} used] active: {}{}{}",
        link.id,
        link.name,
        link.redeemed,
        link.capacity,
        yes_no(link.active),
        if link.plus_one { ", plus one" } else { "" },
        if link.needs_confirmation { ", needs confirmation" } else { "" }
    );
}
