use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuestlistError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Broken link: {reason}")]
    BrokenLink { reason: String },

    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be positive")]
    NonPositive { field: String },

    #[error("{field} cannot be empty")]
    EmptySet { field: String },

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Guest list {id} appears more than once")]
    DuplicateId { id: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid user: {id}")]
    InvalidUser { id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("{entity_type} {id} is still referenced and cannot be deleted")]
    InUse { entity_type: String, id: String },

    #[error("Guest list {id} is closed")]
    GuestListClosed { id: String },

    #[error("Guest list {id} is full ({max_capacity} places)")]
    GuestListFull { id: String, max_capacity: i32 },

    #[error("Link {id} has {remaining} place(s) left, {requested} requested")]
    LinkCapacityExceeded {
        id: String,
        remaining: i32,
        requested: usize,
    },

    #[error("Link {id} is no longer active")]
    LinkInactive { id: String },

    #[error("Database already has users; seeding only runs on an empty database")]
    DatabaseNotEmpty,

    #[error("Link signing secret is not configured")]
    MissingSecret,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type GuestlistResult<T> = Result<T, GuestlistError>;

/// Coarse error class callers branch on: redirect to login, show "not
/// found", or show a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Auth,
    Generic,
    MissingResource,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Generic => "generic",
            ErrorKind::MissingResource => "missingResource",
            ErrorKind::Internal => "internal",
        }
    }
}

/// The user-facing shape of a failure. Internal details stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    pub code: ErrorKind,
    pub message: String,
}

impl GuestlistError {
    pub fn kind(&self) -> ErrorKind {
        use GuestlistError::*;
        match self {
            Unauthenticated | InvalidCredentials | BrokenLink { .. } => ErrorKind::Auth,
            NotFound { .. } | InvalidUser { .. } => ErrorKind::MissingResource,
            BlankField { .. }
            | NonPositive { .. }
            | EmptySet { .. }
            | InvalidValue { .. }
            | DuplicateId { .. }
            | AlreadyExists { .. }
            | InUse { .. }
            | GuestListClosed { .. }
            | GuestListFull { .. }
            | LinkCapacityExceeded { .. }
            | LinkInactive { .. }
            | DatabaseNotEmpty => ErrorKind::Generic,
            MissingSecret | PasswordHash(_) | Database(_) | Io(_) | Json(_) | Other(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn to_page_error(&self) -> PageError {
        let message = match self.kind() {
            ErrorKind::Internal => "Something went wrong".to_string(),
            ErrorKind::Auth => match self {
                GuestlistError::BrokenLink { .. } => "Broken link".to_string(),
                other => other.to_string(),
            },
            _ => self.to_string(),
        };
        PageError {
            code: self.kind(),
            message,
        }
    }

    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        GuestlistError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn broken_link(reason: impl Into<String>) -> Self {
        GuestlistError::BrokenLink {
            reason: reason.into(),
        }
    }
}
