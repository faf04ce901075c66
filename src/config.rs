//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! ```bash
//! GUESTLIST_DB=.data/guestlist.db
//! GUESTLIST_LINK_SECRET=change-me          # required for link commands
//! GUESTLIST_PUBLIC_ORIGIN=https://door.example
//! GUESTLIST_LINK_TTL_SECS=604800           # unset: tokens never expire
//! GUESTLIST_LINK_CONSUMPTION=exhausted     # never | first-use | exhausted
//! GUESTLIST_LOG_FORMAT=text                # text | json
//! RUST_LOG=guestlist=info
//! ```

use chrono::Duration;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::GuestlistResult;
use crate::model::LinkConsumption;
use crate::token::LinkSigner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub link_secret: Option<String>,
    pub public_origin: String,
    pub link_ttl: Option<Duration>,
    pub link_consumption: LinkConsumption,
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0}")]
    InvalidPolicy(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(".data").join("guestlist.db"),
            link_secret: None,
            public_origin: "http://localhost:3000".to_string(),
            link_ttl: None,
            link_consumption: LinkConsumption::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let link_ttl = match get("GUESTLIST_LINK_TTL_SECS") {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => Some(Duration::seconds(secs)),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "GUESTLIST_LINK_TTL_SECS",
                        value: raw,
                    })
                }
            },
        };

        let link_consumption = match get("GUESTLIST_LINK_CONSUMPTION") {
            None => defaults.link_consumption,
            Some(raw) => raw.parse().map_err(ConfigError::InvalidPolicy)?,
        };

        let log_format = match get("GUESTLIST_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "GUESTLIST_LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            db_path: get("GUESTLIST_DB").map(PathBuf::from).unwrap_or(defaults.db_path),
            link_secret: get("GUESTLIST_LINK_SECRET"),
            public_origin: get("GUESTLIST_PUBLIC_ORIGIN").unwrap_or(defaults.public_origin),
            link_ttl,
            link_consumption,
            log_format,
        })
    }

    /// Fails with `MissingSecret` when no secret is configured.
    pub fn link_signer(&self) -> GuestlistResult<LinkSigner> {
        LinkSigner::new(self.link_secret.as_deref().unwrap_or_default(), self.link_ttl)
    }
}
