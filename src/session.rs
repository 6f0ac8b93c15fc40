//! Signed cookie sessions
//!
//! The whole session lives client-side in one cookie: the JSON body,
//! base64url encoded, followed by `.` and an HMAC-SHA256 of that encoding.
//! A cookie whose signature does not verify is treated as an empty session.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

/// Name of the cookie holding the session
pub const SESSION_COOKIE: &str = "session";

/// Session key holding the logged-in user's id
pub const CURR_USER_KEY: &str = "curr_user";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Warning,
    Danger,
}

impl fmt::Display for FlashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlashCategory::Success => "success",
            FlashCategory::Warning => "warning",
            FlashCategory::Danger => "danger",
        };
        f.write_str(name)
    }
}

/// A one-shot notice shown on the next rendered page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Stored under [`CURR_USER_KEY`]
    #[serde(rename = "curr_user", default, skip_serializing_if = "Option::is_none")]
    pub curr_user: Option<i32>,

    #[serde(rename = "_flashes", default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

impl Session {
    pub fn login(&mut self, user_id: i32) {
        self.curr_user = Some(user_id);
    }

    pub fn logout(&mut self) {
        self.curr_user = None;
    }

    pub fn flash(&mut self, message: impl Into<String>, category: FlashCategory) {
        self.flashes.push(Flash {
            category,
            message: message.into(),
        });
    }

    /// Drain pending flashes for rendering
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}

/// Signs and verifies session cookies
#[derive(Clone)]
pub struct SessionKey {
    secret: Arc<[u8]>,
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

impl SessionKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
        }
    }

    fn mac(&self) -> Option<Hmac<Sha256>> {
        Hmac::<Sha256>::new_from_slice(&self.secret).ok()
    }

    /// Serialize and sign a session into a cookie value
    pub fn encode(&self, session: &Session) -> Option<String> {
        let json = serde_json::to_vec(session).ok()?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Some(format!("{}.{}", payload, signature))
    }

    /// Verify and deserialize a cookie value
    pub fn decode(&self, value: &str) -> Option<Session> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Decode a cookie, falling back to an empty session
    pub fn load(&self, value: Option<&str>) -> Session {
        match value {
            Some(value) => self.decode(value).unwrap_or_else(|| {
                tracing::warn!("discarding session cookie with a bad signature");
                Session::default()
            }),
            None => Session::default(),
        }
    }

    /// Full `Set-Cookie` header value for a session
    pub fn set_cookie_header(&self, session: &Session) -> Option<String> {
        let value = self.encode(session)?;
        Some(format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, value
        ))
    }
}
