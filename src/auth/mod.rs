//! Authentication module
//!
//! Session cookies gate every write route. The identity provider sits
//! behind `SessionAuthority`; the bundled implementation signs cookies
//! locally with HMAC-SHA256.

mod session;

pub use session::{
    is_authenticated, AuthError, SessionAuthority, SessionClaims, SignedSessionAuthority,
    SESSION_LIFETIME_DAYS,
};
