//! Rule trait definition.

use async_trait::async_trait;

use crate::domain::{Diagnostic, Event, Message, Verdict};

/// Trait for event rules.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Evaluate the rule against an event whose message passed the guard.
    ///
    /// `Verdict::Allow` means "no match, fall through to the next rule".
    /// Trace records are appended to `trace` in the order they are produced.
    async fn evaluate(
        &self,
        event: &Event,
        message: &Message,
        trace: &mut Vec<Diagnostic>,
    ) -> Verdict;

    /// Get the priority of this rule (lower = evaluated first).
    fn priority(&self) -> u32;
}
