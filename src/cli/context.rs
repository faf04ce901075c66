use rusqlite::Connection;

use crate::auth::{self, Session};
use crate::config::Config;
use crate::error::{GuestlistError, GuestlistResult};
use crate::model::Id;
use crate::ops::user_ops;
use crate::token::LinkSigner;
use crate::validation;

pub struct CliContext {
    pub conn: Connection,
    pub config: Config,
    email: Option<String>,
    password: Option<String>,
}

impl CliContext {
    pub fn new(conn: Connection, config: Config, email: Option<String>, password: Option<String>) -> Self {
        Self {
            conn,
            config,
            email,
            password,
        }
    }

    /// Logs in with the credentials given on the command line or in the
    /// environment. Commands that change data call this first.
    pub fn session(&self) -> GuestlistResult<Session> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => user_ops::login(&self.conn, email, password),
            _ => auth::require(None).cloned(),
        }
    }

    pub fn signer(&self) -> GuestlistResult<LinkSigner> {
        self.config.link_signer()
    }

    pub fn parse_id<T>(&self, value: &str, field: &str) -> GuestlistResult<Id<T>> {
        validation::parse_id(value, field)
    }

    pub fn print_error(&self, err: &GuestlistError) {
        print_error(err);
    }
}

/// Prints the user-facing message and its kind. Internal details only go to
/// the log.
pub fn print_error(err: &GuestlistError) {
    let page = err.to_page_error();
    eprintln!("Error: {} [{}]", page.message, page.code.as_str());
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
