//! Server membership rule implementation.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::Rule;
use crate::domain::membership::{check_presence, FailurePolicy};
use crate::domain::{CancelReason, Diagnostic, Event, Message, Verdict};

/// Cancels events from users who belong to none of the configured servers.
pub struct MembershipRule {
    server_ids: Vec<String>,
    per_query: Duration,
    policy: FailurePolicy,
}

impl MembershipRule {
    /// Create a new MembershipRule.
    pub fn new(server_ids: Vec<String>, per_query: Duration, policy: FailurePolicy) -> Self {
        Self {
            server_ids,
            per_query,
            policy,
        }
    }
}

#[async_trait]
impl Rule for MembershipRule {
    async fn evaluate(
        &self,
        event: &Event,
        message: &Message,
        trace: &mut Vec<Diagnostic>,
    ) -> Verdict {
        let Some(user) = event.acting_user() else {
            trace.push(Diagnostic::MembershipSkipped {
                reason: "event has no acting user",
            });
            return Verdict::Allow;
        };

        let Some(client) = message.client.as_deref() else {
            trace.push(Diagnostic::MembershipSkipped {
                reason: "message has no client",
            });
            return Verdict::Allow;
        };

        debug!(
            user_id = %user.id,
            servers = self.server_ids.len(),
            "Checking server membership"
        );

        let presence = check_presence(
            client,
            &self.server_ids,
            &user.id,
            self.per_query,
            self.policy,
        )
        .await;

        for (server_id, error) in presence.failures {
            trace.push(Diagnostic::MembershipQueryFailed { server_id, error });
        }

        if presence.present {
            Verdict::Allow
        } else {
            trace.push(Diagnostic::MembershipAbsent {
                user_id: user.id.clone(),
            });
            Verdict::Cancel(CancelReason::NotAMember)
        }
    }

    fn priority(&self) -> u32 {
        10 // Before prefixes
    }
}
