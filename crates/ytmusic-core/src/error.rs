//! Error types for ytmusic-core operations.
//!
//! Every fallible operation in the crate returns [`Result`]. Authentication
//! failures are split in two so the host can tell an anonymous session
//! ([`Error::LoginRequired`]) apart from a session the server rejected
//! ([`Error::Unauthorized`]).

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status the catalog uses for a rejected session.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Errors that can occur in ytmusic-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation needs a session but none is set.
    #[error("Login required")]
    LoginRequired,

    /// The session was rejected by the server; carries the session's own channel id.
    #[error("Session unauthorized for user: {0}")]
    Unauthorized(String),

    /// A requested entity, seed or extra was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied malformed input (bad index, missing setId, bad cookie).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tracks were requested for a container that was never loaded.
    #[error("Track list not loaded for container: {0}")]
    TrackListNotLoaded(String),

    /// The remote service answered with a non-success status.
    #[error("Remote error (HTTP {status}): {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Transport failure before a status was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error category for host-side handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Login is needed or the session was rejected.
    Auth,
    /// Missing entity or unloaded container.
    NotFound,
    /// Caller error.
    InvalidInput,
    /// Remote or transport failure.
    Remote,
    /// Settings or decoding failure.
    Internal,
}

impl Error {
    /// Build a remote error from a status code and message.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Build a network error.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Build an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Build a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Get the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::LoginRequired | Self::Unauthorized(_) => ErrorKind::Auth,
            Self::NotFound(_) | Self::TrackListNotLoaded(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Remote { .. } | Self::Network(_) => ErrorKind::Remote,
            Self::Configuration(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Whether the remote signalled a rejected session (HTTP 401).
    #[must_use]
    pub const fn is_unauthorized_status(&self) -> bool {
        matches!(
            self,
            Self::Remote {
                status: STATUS_UNAUTHORIZED,
                ..
            }
        )
    }

    /// Whether the host should prompt for (re-)login.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::Auth)
    }
}
