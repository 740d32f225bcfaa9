//! Error types for thread-guard.

use thiserror::Error;

/// Main error type for thread-guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Hook input that is not an event record
    #[error("Invalid hook input: {0}")]
    Input(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failure of a single membership lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// The client does not know the server
    #[error("unknown server {0}")]
    UnknownServer(String),

    /// The lookup itself failed
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// The lookup did not settle before the per-query timeout
    #[error("timed out after {0} ms")]
    Timeout(u64),
}
