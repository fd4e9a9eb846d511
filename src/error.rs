//! Error taxonomy surfaced by the session manager.
//!
//! Every failure here resolves to a well-defined `Unauthenticated` state;
//! nothing in this crate is fatal to the process.

use thiserror::Error;

/// Errors surfaced to callers of the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login rejected by the backend. The message comes from the backend's
    /// `detail` payload when available and is also recorded on the session
    /// read model for display.
    #[error("login rejected: {message}")]
    InvalidCredentials { message: String },

    /// The request could not complete at all.
    #[error("could not reach the backend: {reason}")]
    NetworkFailure { reason: String },

    /// Refresh failed and the session was force-logged-out. Not surfaced as
    /// an interactive message, only as the state change.
    #[error("session expired and could not be refreshed")]
    SessionExpiredAndUnrecoverable,
}

/// Errors produced by the backend endpoint client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {detail}")]
    Rejected {
        endpoint: String,
        status: u16,
        detail: String,
    },

    #[error("could not parse response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}
