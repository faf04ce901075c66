//! Signed link tokens.
//!
//! A token is `base64url(json claims) "." base64url(hmac_sha256(secret, first part))`,
//! both parts unpadded. Only the token, never the raw link id, goes into a
//! public URL.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{GuestlistError, GuestlistResult};
use crate::model::{Id, Link};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkClaims {
    pub link_id: Id<Link>,
    /// Expiry as unix seconds. Absent tokens never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Clone)]
pub struct LinkSigner {
    key: Vec<u8>,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for LinkSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSigner")
            .field("key", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl LinkSigner {
    /// Fails with `MissingSecret` for an empty secret.
    pub fn new(secret: &str, ttl: Option<Duration>) -> GuestlistResult<Self> {
        if secret.is_empty() {
            return Err(GuestlistError::MissingSecret);
        }
        Ok(Self {
            key: secret.as_bytes().to_vec(),
            ttl,
        })
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn issue(&self, link_id: Id<Link>) -> GuestlistResult<String> {
        self.issue_at(link_id, Utc::now())
    }

    pub fn issue_at(&self, link_id: Id<Link>, now: DateTime<Utc>) -> GuestlistResult<String> {
        let claims = LinkClaims {
            link_id,
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{}.{}", payload, signature))
    }

    pub fn verify(&self, token: &str) -> GuestlistResult<LinkClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Any tampered, malformed or expired token is a `BrokenLink`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> GuestlistResult<LinkClaims> {
        let token = token.trim();
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| GuestlistError::broken_link("malformed token"))?;
        if signature.contains('.') {
            return Err(GuestlistError::broken_link("malformed token"));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| GuestlistError::broken_link("malformed signature"))?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| GuestlistError::broken_link("signature mismatch"))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| GuestlistError::broken_link("malformed payload"))?;
        let claims: LinkClaims = serde_json::from_slice(&bytes)
            .map_err(|_| GuestlistError::broken_link("malformed payload"))?;

        if let Some(exp) = claims.exp {
            if now.timestamp() >= exp {
                return Err(GuestlistError::broken_link("token expired"));
            }
        }
        Ok(claims)
    }

    fn mac(&self, payload: &str) -> GuestlistResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| GuestlistError::Other(format!("Invalid signing key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
