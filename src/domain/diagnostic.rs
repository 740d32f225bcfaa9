//! Non-fatal observability records produced by normalization and evaluation.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::MembershipError;

/// Target used for every diagnostic log line.
pub const LOG_TARGET: &str = "thread_guard";

/// Prefix prepended to every diagnostic log line.
pub const LOG_PREFIX: &str = "[Prevent Thread Creation]";

/// Severity of a diagnostic, mapped onto a tracing level by [`emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
}

/// A configuration or runtime decision worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Override key that is not part of the settings schema
    UnknownSetting { name: String },

    /// Override for an `*enabled*` key that is neither truthy nor falsy
    InvalidBoolean { name: String, value: String },

    /// Override of the wrong shape for its key; the default was kept
    InvalidValue { name: String, expected: &'static str },

    /// The plugin namespace in the host config is not a table
    InvalidNamespace { key: String },

    /// No prefixes and no servers configured
    Disengaged,

    /// Rules are configured but every hook is switched off
    NoHooksEnabled,

    /// The plugin registered at least one hook
    Engaged {
        prefixes: Vec<String>,
        server_ids: Vec<String>,
    },

    /// One prefix was compared against the message content
    PrefixTested { prefix: String, matched: bool },

    /// The membership rule could not run for this event
    MembershipSkipped { reason: &'static str },

    /// A single server lookup failed or timed out
    MembershipQueryFailed {
        server_id: String,
        error: MembershipError,
    },

    /// The acting user is in none of the configured servers
    MembershipAbsent { user_id: String },
}

impl Diagnostic {
    /// Build an invalid-boolean diagnostic from the raw override value.
    pub fn invalid_boolean(name: &str, value: &Value) -> Self {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Diagnostic::InvalidBoolean {
            name: name.to_string(),
            value,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnknownSetting { .. }
            | Diagnostic::InvalidBoolean { .. }
            | Diagnostic::InvalidValue { .. }
            | Diagnostic::InvalidNamespace { .. }
            | Diagnostic::MembershipQueryFailed { .. } => Severity::Warn,
            Diagnostic::Disengaged
            | Diagnostic::NoHooksEnabled
            | Diagnostic::Engaged { .. }
            | Diagnostic::PrefixTested { .. }
            | Diagnostic::MembershipAbsent { .. } => Severity::Info,
            Diagnostic::MembershipSkipped { .. } => Severity::Debug,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownSetting { name } => {
                write!(f, "Setting {} is not a valid setting", name)
            }
            Diagnostic::InvalidBoolean { name, value } => write!(
                f,
                "Value {} is not a valid truthy or falsy value for {}",
                value, name
            ),
            Diagnostic::InvalidValue { name, expected } => {
                write!(f, "Setting {} expects {}, keeping default", name, expected)
            }
            Diagnostic::InvalidNamespace { key } => {
                write!(f, "Config entry {} is not a table, using defaults", key)
            }
            Diagnostic::Disengaged => {
                write!(f, "Plugin disengaged, no configuration provided.")
            }
            Diagnostic::NoHooksEnabled => {
                write!(f, "Plugin disengaged, every hook is disabled.")
            }
            Diagnostic::Engaged {
                prefixes,
                server_ids,
            } => {
                write!(f, "Plugin engaged. Configured strings:")?;
                for prefix in prefixes {
                    write!(f, "\n{}", prefix)?;
                }
                if !server_ids.is_empty() {
                    write!(f, "\nRequired servers: {}", server_ids.join(", "))?;
                }
                Ok(())
            }
            Diagnostic::PrefixTested { prefix, matched } => write!(
                f,
                "{}reventing event for prefix {:?}",
                if *matched { "P" } else { "Not p" },
                prefix
            ),
            Diagnostic::MembershipSkipped { reason } => {
                write!(f, "Membership check skipped: {}", reason)
            }
            Diagnostic::MembershipQueryFailed { server_id, error } => {
                write!(f, "Membership query for server {} failed: {}", server_id, error)
            }
            Diagnostic::MembershipAbsent { user_id } => write!(
                f,
                "User {} is not a member of any configured server, preventing event",
                user_id
            ),
        }
    }
}

/// Write one diagnostic to the log sink.
pub fn emit(diagnostic: &Diagnostic) {
    match diagnostic.severity() {
        Severity::Warn => warn!(target: LOG_TARGET, "{} {}", LOG_PREFIX, diagnostic),
        Severity::Info => info!(target: LOG_TARGET, "{} {}", LOG_PREFIX, diagnostic),
        Severity::Debug => debug!(target: LOG_TARGET, "{} {}", LOG_PREFIX, diagnostic),
    }
}

/// Write every diagnostic in order.
pub fn emit_all(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        emit(diagnostic);
    }
}
