//! Session state and the auth-guarded executor.
//!
//! A [`Session`] is the single context object shared by every component that
//! needs session-wide state: the current [`AuthState`] and the
//! [`TrackCache`]. Each field has one writer:
//!
//! - `auth` is replaced wholesale by login/logout, never patched
//! - `tracks` is written by album/playlist loads
//!
//! Every call that reads authenticated feeds or mutates the library goes
//! through [`Session::with_auth`].

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use sha1::{Digest, Sha1};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::TrackCache;
use crate::error::{Error, Result};
use crate::model::{EXTRA_AUTH, EXTRA_COOKIE, User};

/// Origin used when hashing the SAPISID cookie.
pub const MUSIC_ORIGIN: &str = "https://music.youtube.com";

const SAPISID_COOKIE: &str = "SAPISID";

/// Credential headers of a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Raw `cookie` header value.
    pub cookie: String,
    /// `authorization` header value (`SAPISIDHASH ...`).
    pub authorization: String,
}

impl AuthHeaders {
    /// Header name/value pairs, ready to attach to a request.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("cookie".to_string(), self.cookie.clone()),
            ("authorization".to_string(), self.authorization.clone()),
        ]
    }
}

/// Identity and credentials of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// The session's own channel id, when known.
    pub own_channel_id: Option<String>,
    /// Credential headers.
    pub headers: AuthHeaders,
}

impl AuthState {
    /// Build the state for a user returned from login.
    ///
    /// An empty user id (the primary account) leaves the own channel id unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the user lacks the cookie or auth extras.
    pub fn from_user(user: &User) -> Result<Self> {
        let cookie = user
            .extras
            .get(EXTRA_COOKIE)
            .ok_or_else(|| Error::invalid_input("No cookie"))?;
        let authorization = user
            .extras
            .get(EXTRA_AUTH)
            .ok_or_else(|| Error::invalid_input("No auth"))?;
        Ok(Self {
            own_channel_id: Some(user.id.clone()).filter(|id| !id.is_empty()),
            headers: AuthHeaders {
                cookie: cookie.clone(),
                authorization: authorization.clone(),
            },
        })
    }
}

/// Session-wide mutable state.
#[derive(Debug, Default)]
pub struct Session {
    auth: RwLock<Option<AuthState>>,
    tracks: TrackCache,
}

impl Session {
    /// Create an anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the auth state (`None` logs out).
    pub async fn set_auth(&self, state: Option<AuthState>) {
        match &state {
            Some(s) => info!(
                "Session logged in as {}",
                s.own_channel_id.as_deref().unwrap_or("primary account")
            ),
            None => info!("Session logged out"),
        }
        *self.auth.write().await = state;
    }

    /// Snapshot of the current auth state.
    pub async fn auth_state(&self) -> Option<AuthState> {
        self.auth.read().await.clone()
    }

    /// Whether a session is set.
    pub async fn is_logged_in(&self) -> bool {
        self.auth.read().await.is_some()
    }

    /// The track-list cache.
    #[must_use]
    pub const fn tracks(&self) -> &TrackCache {
        &self.tracks
    }

    /// Run an operation that needs a session.
    ///
    /// - No session: fails with [`Error::LoginRequired`] without running it.
    /// - The operation fails with HTTP 401: fails with
    ///   [`Error::Unauthorized`] carrying the own channel id, or
    ///   [`Error::LoginRequired`] if that id is unknown.
    /// - Any other failure is returned unchanged.
    pub async fn with_auth<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(AuthState) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let state = self.auth_state().await.ok_or(Error::LoginRequired)?;
        let own_channel_id = state.own_channel_id.clone();

        match operation(state).await {
            Err(e) if e.is_unauthorized_status() => {
                warn!("Session rejected by server: {}", e);
                Err(own_channel_id.map_or(Error::LoginRequired, Error::Unauthorized))
            }
            other => other,
        }
    }
}

/// Derive the credential headers from the cookie captured by the login web view.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the cookie has no `SAPISID` entry.
pub fn derive_auth_headers(cookie: &str, timestamp_secs: u64) -> Result<AuthHeaders> {
    let sapisid = extract_cookie(cookie, SAPISID_COOKIE)
        .ok_or_else(|| Error::invalid_input("Login Failed, could not load SAPISID"))?;
    debug!("Deriving authorization header at {}", timestamp_secs);
    Ok(AuthHeaders {
        cookie: cookie.to_string(),
        authorization: sapisid_hash(sapisid, timestamp_secs),
    })
}

/// Derive the credential headers using the current time.
pub fn derive_auth_headers_now(cookie: &str) -> Result<AuthHeaders> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Configuration(format!("System clock before epoch: {e}")))?
        .as_secs();
    derive_auth_headers(cookie, now)
}

/// `SAPISIDHASH <ts>_<sha1("<ts> <sapisid> <origin>")>`.
fn sapisid_hash(sapisid: &str, timestamp_secs: u64) -> String {
    let input = format!("{timestamp_secs} {sapisid} {MUSIC_ORIGIN}");
    let digest = Sha1::digest(input.as_bytes());
    format!("SAPISIDHASH {timestamp_secs}_{digest:x}")
}

fn extract_cookie<'a>(cookie: &'a str, name: &str) -> Option<&'a str> {
    cookie.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then_some(value.trim())
    })
}
