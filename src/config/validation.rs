//! Configuration validation.

use anyhow::{bail, Result};
use serde_json::Value;
use std::time::Duration;

use super::types::{HostConfig, SettingKey, Settings, SettingsMap};
use crate::domain::{Diagnostic, FailurePolicy};

/// Validate the host-level parts of the configuration.
pub fn validate(config: &HostConfig) -> Result<()> {
    // Path will be created if it doesn't exist, so just check it's valid
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if config.log_to_file && config.log_path.as_os_str().is_empty() {
        bail!("log_to_file is set but log_path is empty");
    }

    Ok(())
}

/// Convert a normalized settings map into typed [`Settings`].
///
/// A value of the wrong shape is reported once and the typed default is used
/// for that key.
pub fn resolve(map: &SettingsMap) -> (Settings, Vec<Diagnostic>) {
    let defaults = Settings::default();
    let mut diagnostics = Vec::new();

    let mut report = |key: SettingKey, expected: &'static str| {
        diagnostics.push(Diagnostic::InvalidValue {
            name: key.name().to_string(),
            expected,
        });
    };

    let mut string_list = |key: SettingKey, default: Vec<String>| match map.get(&key) {
        None => default,
        Some(value) => as_string_list(value).unwrap_or_else(|| {
            report(key, "an array of strings");
            default
        }),
    };
    let ignored_starts_with =
        string_list(SettingKey::IgnoredStartsWith, defaults.ignored_starts_with);
    let server_ids = string_list(SettingKey::ServerIds, defaults.server_ids);

    let mut flag = |key: SettingKey, default: bool| match map.get(&key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            report(key, "a boolean");
            default
        }
    };
    let case_sensitive = flag(SettingKey::CaseSensitive, defaults.case_sensitive);
    let debug = flag(SettingKey::Debug, defaults.debug);
    let before_new_thread_enabled = flag(
        SettingKey::BeforeNewThreadEnabled,
        defaults.before_new_thread_enabled,
    );
    let before_new_message_received_enabled = flag(
        SettingKey::BeforeNewMessageReceivedEnabled,
        defaults.before_new_message_received_enabled,
    );

    let membership_timeout = match map.get(&SettingKey::MembershipTimeoutMs) {
        None => defaults.membership_timeout,
        Some(value) => match value.as_u64().filter(|ms| *ms > 0) {
            Some(ms) => Duration::from_millis(ms),
            None => {
                report(SettingKey::MembershipTimeoutMs, "a positive integer");
                defaults.membership_timeout
            }
        },
    };

    let membership_failure_policy = match map.get(&SettingKey::MembershipFailurePolicy) {
        None => defaults.membership_failure_policy,
        Some(value) => match value.as_str().and_then(FailurePolicy::parse) {
            Some(policy) => policy,
            None => {
                report(
                    SettingKey::MembershipFailurePolicy,
                    "\"absent\" or \"present\"",
                );
                defaults.membership_failure_policy
            }
        },
    };

    let settings = Settings {
        ignored_starts_with,
        case_sensitive,
        debug,
        server_ids,
        before_new_thread_enabled,
        before_new_message_received_enabled,
        membership_timeout,
        membership_failure_policy,
    };

    (settings, diagnostics)
}

fn as_string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::default_settings;
    use serde_json::json;
    use std::path::PathBuf;

    fn with(pairs: &[(SettingKey, Value)]) -> SettingsMap {
        let mut map = default_settings();
        for (key, value) in pairs {
            map.insert(*key, value.clone());
        }
        map
    }

    #[test]
    fn test_defaults_resolve_cleanly() {
        let (settings, diagnostics) = resolve(&default_settings());
        assert!(diagnostics.is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_lists_keep_configuration_order() {
        let (settings, diagnostics) = resolve(&with(&[
            (SettingKey::IgnoredStartsWith, json!(["!warn", "!mute", "!warn"])),
            (SettingKey::ServerIds, json!(["2", "1"])),
        ]));
        assert!(diagnostics.is_empty());
        assert_eq!(settings.ignored_starts_with, vec!["!warn", "!mute", "!warn"]);
        assert_eq!(settings.server_ids, vec!["2", "1"]);
    }

    #[test]
    fn test_wrong_shapes_fall_back_to_defaults() {
        let (settings, diagnostics) = resolve(&with(&[
            (SettingKey::IgnoredStartsWith, json!("!")),
            (SettingKey::ServerIds, json!([1, 2])),
            (SettingKey::CaseSensitive, json!("yes")),
            (SettingKey::MembershipTimeoutMs, json!(-5)),
            (SettingKey::MembershipFailurePolicy, json!("sometimes")),
        ]));

        assert_eq!(settings, Settings::default());
        let names: Vec<_> = diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::InvalidValue { name, .. } => name.as_str(),
                other => panic!("unexpected diagnostic {:?}", other),
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "ignoredStartsWith",
                "serverIds",
                "caseSensitive",
                "membershipTimeoutMs",
                "membershipFailurePolicy"
            ]
        );
    }

    #[test]
    fn test_timeout_and_policy_overrides() {
        let (settings, diagnostics) = resolve(&with(&[
            (SettingKey::MembershipTimeoutMs, json!(750)),
            (SettingKey::MembershipFailurePolicy, json!("present")),
        ]));
        assert!(diagnostics.is_empty());
        assert_eq!(settings.membership_timeout, Duration::from_millis(750));
        assert_eq!(settings.membership_failure_policy, FailurePolicy::Present);
    }

    #[test]
    fn test_validate_rejects_null_in_log_path() {
        let config = HostConfig {
            log_path: PathBuf::from("logs\0bad"),
            ..HostConfig::default()
        };
        assert!(validate(&config).is_err());
        assert!(validate(&HostConfig::default()).is_ok());
    }
}
