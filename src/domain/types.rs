//! Core domain types for event evaluation.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::diagnostic::Diagnostic;
use super::membership::ServerDirectory;

/// Hook points a plugin can register on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookKind {
    /// A new modmail thread is about to be created
    BeforeNewThread,
    /// An inbound message is about to be relayed
    BeforeNewMessageReceived,
}

impl HookKind {
    /// Host-side hook name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::BeforeNewThread => "beforeNewThread",
            HookKind::BeforeNewMessageReceived => "beforeNewMessageReceived",
        }
    }
}

/// A chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Inbound chat message.
#[derive(Clone)]
pub struct Message {
    /// Raw message text
    pub content: String,

    /// Message author, if the host knows it
    pub author: Option<User>,

    /// Lookup capability for servers the bot can see
    pub client: Option<Arc<dyn ServerDirectory>>,
}

impl Message {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: None,
            client: None,
        }
    }

    pub fn with_author(mut self, author: User) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_client(mut self, client: Arc<dyn ServerDirectory>) -> Self {
        self.client = Some(client);
        self
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("content", &self.content)
            .field("author", &self.author)
            .field("client", &self.client.as_ref().map(|_| "<directory>"))
            .finish()
    }
}

/// Event record handed to a hook callback.
#[derive(Debug, Clone, Default)]
pub struct Event {
    /// User that triggered the event
    pub user: Option<User>,

    /// Message carried by the event
    pub message: Option<Message>,
}

impl Event {
    pub fn new(message: Message) -> Self {
        Self {
            user: None,
            message: Some(message),
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// User whose membership is checked: the event user, else the message author.
    pub fn acting_user(&self) -> Option<&User> {
        self.user
            .as_ref()
            .or_else(|| self.message.as_ref().and_then(|m| m.author.as_ref()))
    }
}

/// Why an event was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// Content starts with the configured prefix
    Prefix(String),
    /// Acting user is in none of the configured servers
    NotAMember,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Prefix(prefix) => write!(f, "content starts with {:?}", prefix),
            CancelReason::NotAMember => write!(f, "user is not a member of any required server"),
        }
    }
}

/// Outcome of evaluating one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the event through unmodified
    Allow,
    /// Cancel the event
    Cancel(CancelReason),
}

impl Verdict {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Verdict::Cancel(_))
    }

    /// Convert verdict to HookOutput.
    pub fn into_output(self) -> HookOutput {
        match self {
            Verdict::Allow => HookOutput {
                decision: "allow".to_string(),
                reason: None,
            },
            Verdict::Cancel(reason) => HookOutput {
                decision: "cancel".to_string(),
                reason: Some(reason.to_string()),
            },
        }
    }

    /// Get exit code for this verdict.
    ///
    /// - Allow: 0
    /// - Cancel: 2
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Allow => 0,
            Verdict::Cancel(_) => 2,
        }
    }
}

/// Verdict together with the trace records produced while reaching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub trace: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn allow(trace: Vec<Diagnostic>) -> Self {
        Self {
            verdict: Verdict::Allow,
            trace,
        }
    }
}

/// Hook output written back to the host.
#[derive(Debug, Clone, Serialize)]
pub struct HookOutput {
    /// Decision: "allow" or "cancel"
    pub decision: String,

    /// Optional reason (present when cancelling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
