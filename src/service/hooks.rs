//! Hook registration surface and dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{emit_all, Evaluation, Event, FilterEngine, HookKind, Verdict};

/// Callback the host invokes for a hook point.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event) -> Evaluation;
}

#[async_trait]
impl EventHandler for FilterEngine {
    async fn handle(&self, event: &Event) -> Evaluation {
        self.evaluate(event).await
    }
}

/// Surface a plugin registers its callbacks on.
pub trait HookRegistry {
    fn register(&mut self, kind: HookKind, handler: Arc<dyn EventHandler>);
}

/// In-process hook table.
#[derive(Default)]
pub struct HookTable {
    handlers: BTreeMap<HookKind, Vec<Arc<dyn EventHandler>>>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook points with at least one handler.
    pub fn registered(&self) -> Vec<HookKind> {
        self.handlers.keys().copied().collect()
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every handler for `kind` in registration order.
    ///
    /// Trace records are written to the log sink as each handler finishes.
    /// The first cancelling handler decides; later handlers are not run.
    pub async fn dispatch(&self, kind: HookKind, event: &Event) -> Verdict {
        let Some(handlers) = self.handlers.get(&kind) else {
            debug!(hook = kind.as_str(), "No handlers registered");
            return Verdict::Allow;
        };

        for handler in handlers {
            let evaluation = handler.handle(event).await;
            emit_all(&evaluation.trace);
            if evaluation.verdict.is_cancel() {
                return evaluation.verdict;
            }
        }

        Verdict::Allow
    }

    /// Dispatch and realize a cancelling verdict through the host's capability.
    pub async fn dispatch_with_cancel<F>(&self, kind: HookKind, event: &Event, cancel: F) -> Verdict
    where
        F: FnOnce(),
    {
        let verdict = self.dispatch(kind, event).await;
        if verdict.is_cancel() {
            cancel();
        }
        verdict
    }
}

impl HookRegistry for HookTable {
    fn register(&mut self, kind: HookKind, handler: Arc<dyn EventHandler>) {
        debug!(hook = kind.as_str(), "Registering handler");
        self.handlers.entry(kind).or_default().push(handler);
    }
}
