//! Session cookies
//!
//! Cookie layout: `<subject>.<expires_unix>.<nonce>.<signature>`, where
//! subject, nonce and signature are lowercase hex and the signature is
//! HMAC-SHA256 over the first three fields.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Session cookie lifetime
pub const SESSION_LIFETIME_DAYS: i64 = 5;

/// Bytes of the id-token digest kept as the session subject
const SUBJECT_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing id token")]
    MissingToken,

    #[error("Malformed session cookie")]
    Malformed,

    #[error("Session signature mismatch")]
    BadSignature,

    #[error("Session expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("Invalid session secret")]
    InvalidSecret,
}

/// Verified content of a session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session cookies.
///
/// `create_session_cookie` exchanges an identity token obtained by the
/// client for a long-lived cookie; `verify_session_cookie` validates one.
pub trait SessionAuthority: Send + Sync {
    fn create_session_cookie(&self, id_token: &str) -> Result<String, AuthError>;

    fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, AuthError>;
}

/// Collapse verification into a yes/no answer. A missing cookie, or any
/// verification failure, means unauthenticated.
pub fn is_authenticated(authority: &dyn SessionAuthority, cookie: Option<&str>) -> bool {
    match cookie {
        Some(cookie) => match authority.verify_session_cookie(cookie) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Session rejected: {}", e);
                false
            }
        },
        None => false,
    }
}

/// Locally signed sessions keyed by a server secret
#[derive(Clone)]
pub struct SignedSessionAuthority {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl std::fmt::Debug for SignedSessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedSessionAuthority")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl SignedSessionAuthority {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            lifetime: Duration::days(SESSION_LIFETIME_DAYS),
        }
    }

    pub fn issue_at(&self, id_token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let id_token = id_token.trim();
        if id_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let digest = Sha256::digest(id_token.as_bytes());
        let subject = hex::encode(&digest[..SUBJECT_BYTES]);
        let expires = (now + self.lifetime).timestamp();
        let nonce = hex::encode(rand::random::<[u8; 8]>());

        let payload = format!("{}.{}.{}", subject, expires, nonce);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    pub fn verify_at(&self, cookie: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let (payload, signature) = cookie.rsplit_once('.').ok_or(AuthError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::Malformed)?;

        let mut parts = payload.split('.');
        let (subject, expires, nonce) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(subject), Some(expires), Some(nonce), None) => (subject, expires, nonce),
            _ => return Err(AuthError::Malformed),
        };
        if subject.is_empty() || nonce.is_empty() {
            return Err(AuthError::Malformed);
        }

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let expires: i64 = expires.parse().map_err(|_| AuthError::Malformed)?;
        let expires_at = DateTime::from_timestamp(expires, 0).ok_or(AuthError::Malformed)?;
        if expires_at <= now {
            return Err(AuthError::Expired(expires_at));
        }

        Ok(SessionClaims {
            subject: subject.to_string(),
            expires_at,
        })
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthError::InvalidSecret)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}

impl SessionAuthority for SignedSessionAuthority {
    fn create_session_cookie(&self, id_token: &str) -> Result<String, AuthError> {
        self.issue_at(id_token, Utc::now())
    }

    fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, AuthError> {
        self.verify_at(cookie, Utc::now())
    }
}
