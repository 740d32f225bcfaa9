//! Settings normalization: defaults overlaid with host-supplied overrides.

use serde_json::{Map, Value};

use super::types::{Coercion, SettingKey, SettingsMap};
use crate::domain::Diagnostic;

/// Truthy literal strings.
const TRUTHY_VALUES: &[&str] = &["on", "1", "true"];

/// Falsy literal strings.
const FALSY_VALUES: &[&str] = &["off", "0", "false", "null"];

/// Parse a boolean literal.
///
/// Native booleans pass through. Strings must be one of the truthy or falsy
/// literals exactly; anything else returns `None`.
pub fn parse_bool_literal(input: &Value) -> Option<bool> {
    match input {
        Value::Bool(b) => Some(*b),
        Value::String(s) if TRUTHY_VALUES.contains(&s.as_str()) => Some(true),
        Value::String(s) if FALSY_VALUES.contains(&s.as_str()) => Some(false),
        _ => None,
    }
}

/// Overlay `overrides` onto `defaults`.
///
/// Overrides are visited in the order the configuration object supplies
/// them. Unknown keys and unparseable booleans are reported and skipped;
/// neither stops the fold.
pub fn normalize(
    defaults: &SettingsMap,
    overrides: &Map<String, Value>,
) -> (SettingsMap, Vec<Diagnostic>) {
    let mut settings = defaults.clone();
    let mut diagnostics = Vec::new();

    for (name, value) in overrides {
        let key = match SettingKey::from_name(name).filter(|k| defaults.contains_key(k)) {
            Some(key) => key,
            None => {
                diagnostics.push(Diagnostic::UnknownSetting { name: name.clone() });
                continue;
            }
        };

        match key.coercion() {
            Coercion::BooleanLiteral => match parse_bool_literal(value) {
                Some(parsed) => {
                    settings.insert(key, Value::Bool(parsed));
                }
                None => diagnostics.push(Diagnostic::invalid_boolean(name, value)),
            },
            Coercion::Verbatim => {
                settings.insert(key, value.clone());
            }
        }
    }

    (settings, diagnostics)
}
