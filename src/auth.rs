//! Authenticated identity passed explicitly into every mutating operation.
//!
//! Callers establish a [`Session`] once (via [`crate::ops::user_ops::login`]
//! or from their own session layer) and hand it to the operations. A caller
//! without one turns that absence into an `Auth` error with [`require`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};

use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Id, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Id<User>,
    pub name: String,
    pub role: String,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

pub fn require(session: Option<&Session>) -> GuestlistResult<&Session> {
    session.ok_or(GuestlistError::Unauthenticated)
}

pub fn hash_password(password: &str) -> GuestlistResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GuestlistError::PasswordHash(e.to_string()))
}

/// Verifies `password` against a stored PHC string. Unparseable hashes
/// never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn require_without_session_is_auth_error() {
        let err = require(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn require_passes_session_through() {
        let user = User::create("Ada".into(), "ada@example.com".into(), String::new(), "admin".into());
        let session = Session::for_user(&user);
        assert_eq!(require(Some(&session)).unwrap().user_id, user.id);
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("123456").unwrap();
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("123456", "not a phc string"));
    }
}
