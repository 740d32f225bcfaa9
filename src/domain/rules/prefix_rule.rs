//! Prefix rule implementation.

use async_trait::async_trait;

use super::Rule;
use crate::domain::{CancelReason, Diagnostic, Event, Message, Verdict};

/// Cancels events whose content starts with one of the configured prefixes.
pub struct PrefixRule {
    /// (configured prefix, prefix folded to the case policy), in match order
    prefixes: Vec<(String, String)>,
    case_sensitive: bool,
    debug: bool,
}

impl PrefixRule {
    /// Create a new PrefixRule.
    pub fn new(prefixes: &[String], case_sensitive: bool, debug: bool) -> Self {
        let prefixes = prefixes
            .iter()
            .map(|prefix| (prefix.clone(), fold_case(prefix, case_sensitive)))
            .collect();
        Self {
            prefixes,
            case_sensitive,
            debug,
        }
    }

    /// Return the first configured prefix the content starts with.
    ///
    /// Scanning stops at the first match. With debug on, every tested prefix
    /// appends one trace record.
    fn first_match(&self, content: &str, trace: &mut Vec<Diagnostic>) -> Option<&str> {
        let content = fold_case(content, self.case_sensitive);

        for (prefix, folded) in &self.prefixes {
            let matched = content.starts_with(folded.as_str());

            if self.debug {
                trace.push(Diagnostic::PrefixTested {
                    prefix: prefix.clone(),
                    matched,
                });
            }

            if matched {
                return Some(prefix);
            }
        }

        None
    }
}

fn fold_case(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

#[async_trait]
impl Rule for PrefixRule {
    async fn evaluate(
        &self,
        _event: &Event,
        message: &Message,
        trace: &mut Vec<Diagnostic>,
    ) -> Verdict {
        match self.first_match(&message.content, trace) {
            Some(prefix) => Verdict::Cancel(CancelReason::Prefix(prefix.to_string())),
            None => Verdict::Allow,
        }
    }

    fn priority(&self) -> u32 {
        20 // After membership
    }
}
