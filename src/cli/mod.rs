pub mod context;
pub mod account_commands;
pub mod event_commands;
pub mod guest_list_commands;
pub mod link_commands;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::schema;
use crate::error::{ErrorKind, GuestlistResult};
use context::CliContext;

#[derive(Parser)]
#[command(name = "guestlist")]
#[command(about = "Events, guest lists and one-time signup links")]
pub struct Cli {
    /// Database file (default: .data/guestlist.db)
    #[arg(long, short = 'f', env = "GUESTLIST_DB")]
    pub db: Option<PathBuf>,

    /// Email to log in with
    #[arg(long, env = "GUESTLIST_USER")]
    pub user: Option<String>,

    /// Password to log in with
    #[arg(long, env = "GUESTLIST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database schema
    Init,
    /// Fill an empty database with demo venues, users and events
    Seed {
        /// Password given to every demo user
        #[arg(long, default_value = "123456")]
        password: String,
    },
    /// User accounts
    User {
        #[command(subcommand)]
        cmd: UserCommand,
    },
    /// Venues
    Venue {
        #[command(subcommand)]
        cmd: VenueCommand,
    },
    /// Events
    Event {
        #[command(subcommand)]
        cmd: EventCommand,
    },
    /// Guest lists
    #[command(name = "guestlist")]
    GuestList {
        #[command(subcommand)]
        cmd: GuestListCommand,
    },
    /// Guests on a list
    Guest {
        #[command(subcommand)]
        cmd: GuestCommand,
    },
    /// One-time signup links
    Link {
        #[command(subcommand)]
        cmd: LinkCommand,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "admin")]
        role: String,
    },
}

#[derive(Subcommand)]
pub enum VenueCommand {
    /// Add a venue
    Add {
        name: String,
        #[arg(long)]
        capacity: i32,
        #[arg(long)]
        address: Option<String>,
    },
    /// List venues
    List,
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Create an event, optionally with guest lists from a JSON file
    Create {
        name: String,
        #[arg(long)]
        venue: String,
        /// RFC 3339 start time, e.g. 2026-05-01T20:00:00Z
        #[arg(long)]
        starts_at: String,
        #[arg(long)]
        guest_lists: Option<PathBuf>,
    },
    /// List events
    List {
        /// Only events created by the logged-in user
        #[arg(long)]
        mine: bool,
        #[arg(long)]
        venue: Option<String>,
    },
    /// Show an event with its guest lists
    Show { id: String },
    /// Edit an event. With --guest-lists the event's lists are made to match the file.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        starts_at: Option<String>,
        #[arg(long)]
        guest_lists: Option<PathBuf>,
    },
    /// Delete an event that has no guests or links
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum GuestListCommand {
    /// Make an event's guest lists match a JSON file
    Set { event: String, file: PathBuf },
    /// Show a guest list and its guests
    Show { id: String },
    /// Guest lists across a venue's events
    Venue { venue: String },
    /// Rename or resize a list. Omit --max for no limit.
    Update {
        id: String,
        name: String,
        #[arg(long)]
        max: Option<i32>,
    },
    /// Stop accepting guests
    Close { id: String },
    /// Accept guests again
    Open { id: String },
    /// Delete a list that has no guests or links
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum GuestCommand {
    /// Add guests by name
    Add {
        list: String,
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(long)]
        plus_one: bool,
        /// Add unconfirmed
        #[arg(long)]
        pending: bool,
    },
    /// Confirm a guest
    Confirm { id: String },
    /// Withdraw a guest's confirmation
    Unconfirm { id: String },
}

#[derive(Subcommand)]
pub enum LinkCommand {
    /// Create a one-time link and print its signup URL
    Create {
        list: String,
        #[arg(long)]
        capacity: i32,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        plus_one: bool,
        #[arg(long)]
        can_view: bool,
        #[arg(long)]
        can_edit: bool,
        #[arg(long)]
        needs_confirmation: bool,
    },
    /// Links on a guest list
    List { list: String },
    /// Show a link with its event and guests
    Show { id: String },
    /// Print a fresh signup URL for an existing link
    Url { id: String },
    /// Stop a link from accepting signups
    Revoke { id: String },
    /// Let a revoked link accept signups again
    Restore { id: String },
    /// Render the signup form a token opens
    Open { token: String },
    /// Sign names up through a token
    Redeem {
        token: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Opens the database and runs one command. Returns the process exit code.
pub fn run(cli: Cli, mut config: Config) -> i32 {
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let conn = match open_database(&config) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, path = %config.db_path.display(), "failed to open database");
            context::print_error(&e);
            return 1;
        }
    };

    let ctx = CliContext::new(conn, config, cli.user, cli.password);
    match dispatch(&ctx, cli.command) {
        Ok(()) => 0,
        Err(e) => {
            if e.kind() == ErrorKind::Internal {
                tracing::error!(error = %e, "command failed");
            }
            ctx.print_error(&e);
            1
        }
    }
}

fn open_database(config: &Config) -> GuestlistResult<Connection> {
    if let Some(dir) = config.db_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(&config.db_path)?;
    schema::initialize(&conn)?;
    Ok(conn)
}

fn dispatch(ctx: &CliContext, command: Command) -> GuestlistResult<()> {
    match command {
        Command::Init => {
            println!("Database ready at {}", ctx.config.db_path.display());
            Ok(())
        }
        Command::Seed { password } => account_commands::seed(ctx, &password),
        Command::User { cmd } => account_commands::user(ctx, cmd),
        Command::Venue { cmd } => account_commands::venue(ctx, cmd),
        Command::Event { cmd } => event_commands::run(ctx, cmd),
        Command::GuestList { cmd } => guest_list_commands::run(ctx, cmd),
        Command::Guest { cmd } => guest_list_commands::guest(ctx, cmd),
        Command::Link { cmd } => link_commands::run(ctx, cmd),
    }
}
