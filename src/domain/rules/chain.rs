//! Rule chain implementation.

use crate::config::Settings;
use crate::domain::{Diagnostic, Event, Message, Verdict};

use super::{MembershipRule, PrefixRule, Rule};

/// Ordered rules applied to every event that passes the guard.
pub struct RuleChain {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChain {
    /// Create a new RuleChain from settings.
    pub fn new(settings: &Settings) -> Self {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();

        if settings.features().membership_check_enabled {
            rules.push(Box::new(MembershipRule::new(
                settings.server_ids.clone(),
                settings.membership_timeout,
                settings.membership_failure_policy,
            )));
        }

        if !settings.ignored_starts_with.is_empty() {
            rules.push(Box::new(PrefixRule::new(
                &settings.ignored_starts_with,
                settings.case_sensitive,
                settings.debug,
            )));
        }

        Self::with_rules(rules)
    }

    /// Build a chain from explicit rules.
    pub fn with_rules(mut rules: Vec<Box<dyn Rule>>) -> Self {
        // Sort by priority (lower = higher priority)
        rules.sort_by_key(|r| r.priority());
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run rules in priority order and return the first cancelling verdict.
    pub async fn execute(
        &self,
        event: &Event,
        message: &Message,
        trace: &mut Vec<Diagnostic>,
    ) -> Verdict {
        for rule in &self.rules {
            let verdict = rule.evaluate(event, message, trace).await;
            if verdict.is_cancel() {
                return verdict;
            }
        }

        Verdict::Allow
    }
}
