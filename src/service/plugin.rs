//! Plugin startup: normalize settings once, then engage or disengage.

use std::sync::Arc;

use tracing::debug;

use super::hooks::HookRegistry;
use crate::config::{load_settings, HostConfig, Settings};
use crate::domain::{Diagnostic, FilterEngine, HookKind};

/// Outcome of plugin initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    /// Frozen settings the engine was built from
    pub settings: Settings,

    /// Hooks that were registered, empty when disengaged
    pub hooks: Vec<HookKind>,

    /// Everything worth reporting, in the order it was produced
    pub diagnostics: Vec<Diagnostic>,
}

impl Startup {
    pub fn engaged(&self) -> bool {
        !self.hooks.is_empty()
    }
}

/// Initialize the plugin against a host configuration.
///
/// With no prefixes and no servers configured the plugin registers nothing
/// and reports a single disengage notice.
pub fn init(config: &HostConfig, registry: &mut dyn HookRegistry) -> Startup {
    let (settings, mut diagnostics) = load_settings(config);

    if settings.has_no_rules() {
        diagnostics.push(Diagnostic::Disengaged);
        return Startup {
            settings,
            hooks: Vec::new(),
            diagnostics,
        };
    }

    let hooks: Vec<HookKind> = [
        (HookKind::BeforeNewThread, settings.before_new_thread_enabled),
        (
            HookKind::BeforeNewMessageReceived,
            settings.before_new_message_received_enabled,
        ),
    ]
    .into_iter()
    .filter_map(|(kind, enabled)| enabled.then_some(kind))
    .collect();

    if hooks.is_empty() {
        diagnostics.push(Diagnostic::NoHooksEnabled);
        return Startup {
            settings,
            hooks,
            diagnostics,
        };
    }

    let engine = Arc::new(FilterEngine::new(Arc::new(settings.clone())));
    debug!(features = ?engine.settings().features(), "Engine built");

    for kind in &hooks {
        registry.register(*kind, engine.clone());
    }

    diagnostics.push(Diagnostic::Engaged {
        prefixes: settings.ignored_starts_with.clone(),
        server_ids: settings.server_ids.clone(),
    });

    Startup {
        settings,
        hooks,
        diagnostics,
    }
}
