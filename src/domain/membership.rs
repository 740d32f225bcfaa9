//! Server membership lookups.
//!
//! The host hands the engine an opaque [`ServerDirectory`] with every message.
//! [`check_presence`] fans one lookup out per configured server, waits for all
//! of them to settle, and OR-aggregates the results.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::time::timeout;
use tracing::debug;

use super::error::MembershipError;

/// Lookup capability resolving a server to its member list.
#[async_trait]
pub trait ServerDirectory: Send + Sync {
    /// Return the subset of `user_ids` that are members of `server_id`.
    /// An empty result means none of them are.
    async fn fetch_members(
        &self,
        server_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<String>, MembershipError>;
}

/// How a failed or timed-out lookup counts toward presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Count as "not a member of that server"
    #[default]
    Absent,
    /// Count as "member of that server"
    Present,
}

impl FailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "absent" => Some(FailurePolicy::Absent),
            "present" => Some(FailurePolicy::Present),
            _ => None,
        }
    }
}

/// Aggregated result of one presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    /// User found in at least one server (after applying the failure policy)
    pub present: bool,
    /// Lookups that failed or timed out, in configuration order
    pub failures: Vec<(String, MembershipError)>,
}

/// Query every server concurrently and OR the outcomes.
///
/// An empty server list is vacuously present.
pub async fn check_presence(
    directory: &dyn ServerDirectory,
    server_ids: &[String],
    user_id: &str,
    per_query: Duration,
    policy: FailurePolicy,
) -> Presence {
    if server_ids.is_empty() {
        return Presence {
            present: true,
            failures: Vec::new(),
        };
    }

    let user_ids = [user_id.to_string()];
    let timeout_ms = u64::try_from(per_query.as_millis()).unwrap_or(u64::MAX);

    let lookups = server_ids.iter().map(|server_id| {
        let user_ids = &user_ids;
        async move {
            let lookup = directory.fetch_members(server_id, user_ids);
            let result = match timeout(per_query, lookup).await {
                Ok(result) => result,
                Err(_) => Err(MembershipError::Timeout(timeout_ms)),
            };
            (server_id, result)
        }
    });

    let mut present = false;
    let mut failures = Vec::new();

    for (server_id, result) in join_all(lookups).await {
        match result {
            Ok(members) => {
                debug!(
                    server_id = %server_id,
                    found = !members.is_empty(),
                    "Membership lookup settled"
                );
                present |= !members.is_empty();
            }
            Err(error) => {
                present |= policy == FailurePolicy::Present;
                failures.push((server_id.clone(), error));
            }
        }
    }

    Presence { present, failures }
}

/// In-memory directory: server id to member ids.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    servers: BTreeMap<String, BTreeSet<String>>,
}

impl StaticDirectory {
    pub fn new(servers: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            servers: servers
                .into_iter()
                .map(|(id, members)| (id, members.into_iter().collect()))
                .collect(),
        }
    }
}

#[async_trait]
impl ServerDirectory for StaticDirectory {
    async fn fetch_members(
        &self,
        server_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<String>, MembershipError> {
        let members = self
            .servers
            .get(server_id)
            .ok_or_else(|| MembershipError::UnknownServer(server_id.to_string()))?;

        Ok(user_ids
            .iter()
            .filter(|id| members.contains(id.as_str()))
            .cloned()
            .collect())
    }
}
