//! JSON adapter between the host's event records and internal types.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Event, GuardError, Message, StaticDirectory, User, Verdict};

/// Event record as the host writes it.
#[derive(Debug, Deserialize)]
struct EventInput {
    #[serde(default)]
    user: Option<UserInput>,

    #[serde(default)]
    message: Option<MessageInput>,

    /// Server id to member ids; becomes the message's client capability
    #[serde(default)]
    servers: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct UserInput {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageInput {
    content: String,

    #[serde(default)]
    author: Option<UserInput>,
}

/// Decode raw stdin bytes. Input that is not UTF-8 is rejected, never repaired.
pub fn decode_input(bytes: Vec<u8>) -> Result<String, GuardError> {
    String::from_utf8(bytes)
        .map_err(|e| GuardError::Input(format!("input is not valid UTF-8: {}", e)))
}

/// Parse one event record.
pub fn parse_event(input: &str) -> Result<Event, GuardError> {
    let raw: EventInput = serde_json::from_str(input)?;

    debug!(
        has_user = raw.user.is_some(),
        has_message = raw.message.is_some(),
        servers = ?raw.servers.as_ref().map(BTreeMap::len),
        "Parsed event input"
    );

    let client = raw
        .servers
        .map(|servers| Arc::new(StaticDirectory::new(servers)));

    let message = raw.message.map(|m| {
        let mut message = Message::new(m.content);
        message.author = m.author.map(|a| User::new(a.id));
        if let Some(client) = &client {
            message = message.with_client(client.clone());
        }
        message
    });

    Ok(Event {
        user: raw.user.map(|u| User::new(u.id)),
        message,
    })
}

/// Serialize a verdict for the host.
pub fn format_output(verdict: &Verdict) -> Result<String, GuardError> {
    Ok(serde_json::to_string(&verdict.clone().into_output())?)
}

/// Output for input that could not be processed. Fails closed.
pub fn format_error(message: &str) -> String {
    serde_json::json!({
        "decision": "cancel",
        "reason": format!("hook error (fail-closed): {}", message),
    })
    .to_string()
}

/// Exit code for error scenarios (fail-closed = cancel = exit 2).
pub fn error_exit_code() -> i32 {
    2
}
