//! Decision engine: guard plus rule chain over frozen settings.

use std::sync::Arc;

use crate::config::Settings;
use crate::domain::rules::RuleChain;
use crate::domain::{Evaluation, Event};

/// Evaluates events against frozen settings.
///
/// Holds no mutable state; evaluating the same event twice gives the same
/// verdict.
pub struct FilterEngine {
    settings: Arc<Settings>,
    chain: RuleChain,
}

impl FilterEngine {
    /// Create a new FilterEngine with the rules the settings call for.
    pub fn new(settings: Arc<Settings>) -> Self {
        let chain = RuleChain::new(&settings);
        Self { settings, chain }
    }

    /// Create an engine around an explicit rule chain.
    pub fn with_chain(settings: Arc<Settings>, chain: RuleChain) -> Self {
        Self { settings, chain }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True when the engine has no rule that could ever cancel.
    pub fn is_inert(&self) -> bool {
        self.chain.is_empty()
    }

    /// Evaluate one event.
    ///
    /// Events without a message, or whose content is only whitespace, are
    /// always allowed.
    pub async fn evaluate(&self, event: &Event) -> Evaluation {
        let Some(message) = event
            .message
            .as_ref()
            .filter(|m| !is_blank(&m.content))
        else {
            return Evaluation::allow(Vec::new());
        };

        let mut trace = Vec::new();
        let verdict = self.chain.execute(event, message, &mut trace).await;

        Evaluation { verdict, trace }
    }
}

/// Whitespace-only content, counting a byte order mark as whitespace.
fn is_blank(content: &str) -> bool {
    content
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}
