//! thread-guard: message-interception filter for chat-bot plugin hosts.
//!
//! Decides, per inbound message or thread-creation event, whether to let it
//! through or cancel it, based on configured content prefixes and on the
//! acting user's membership in a set of servers.

pub mod config;
pub mod domain;
pub mod service;

pub use config::{HostConfig, Settings};
pub use domain::{Event, FilterEngine, Message, User, Verdict};
pub use service::{init, HookTable, Startup};
