//! Configuration management module.
//!
//! Handles TOML configuration file loading, settings normalization against the
//! static schema, and typed validation.

mod normalize;
mod service;
mod types;
mod validation;

pub use normalize::{normalize, parse_bool_literal};
pub use service::ConfigService;
pub use types::{
    default_settings, Coercion, FilterFeatures, HostConfig, SettingKey, Settings, SettingsMap,
    DEFAULT_MEMBERSHIP_TIMEOUT_MS, PLUGIN_KEY,
};
pub use validation::{resolve, validate};

/// Normalize this plugin's overrides and freeze them into typed settings.
///
/// Diagnostics come back in the order they were produced: namespace problems,
/// then normalization, then typed validation.
pub fn load_settings(config: &HostConfig) -> (Settings, Vec<crate::domain::Diagnostic>) {
    let (overrides, mut diagnostics) = config.plugin_overrides();
    let (map, normalize_diagnostics) = normalize(&default_settings(), &overrides);
    diagnostics.extend(normalize_diagnostics);
    let (settings, resolve_diagnostics) = resolve(&map);
    diagnostics.extend(resolve_diagnostics);
    (settings, diagnostics)
}
