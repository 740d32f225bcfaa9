//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::validation;
use crate::domain::{Diagnostic, FailurePolicy};

/// Namespace of this plugin inside the host configuration.
pub const PLUGIN_KEY: &str = "pec";

/// Host configuration file.
///
/// Everything except the logging keys is a plugin namespace; this plugin only
/// reads the [`PLUGIN_KEY`] table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Path to log directory
    pub log_path: PathBuf,

    /// Also write logs to a daily rolling file under `log_path`
    pub log_to_file: bool,

    /// Plugin namespaces, in file order
    #[serde(flatten)]
    pub plugins: Map<String, Value>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            log_to_file: false,
            plugins: Map::new(),
        }
    }
}

impl HostConfig {
    /// Validate configuration and return errors if invalid.
    /// Delegates to the validation module.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Overrides supplied for this plugin.
    ///
    /// A missing namespace means no overrides. A namespace that is not a table
    /// is reported and treated the same way.
    pub fn plugin_overrides(&self) -> (Map<String, Value>, Vec<Diagnostic>) {
        match self.plugins.get(PLUGIN_KEY) {
            None => (Map::new(), Vec::new()),
            Some(Value::Object(table)) => (table.clone(), Vec::new()),
            Some(_) => (
                Map::new(),
                vec![Diagnostic::InvalidNamespace {
                    key: PLUGIN_KEY.to_string(),
                }],
            ),
        }
    }
}

/// How an override value is turned into a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Parsed against the truthy/falsy literal sets
    BooleanLiteral,
    /// Taken as supplied
    Verbatim,
}

/// Closed set of settings this plugin understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    IgnoredStartsWith,
    CaseSensitive,
    Debug,
    ServerIds,
    BeforeNewThreadEnabled,
    BeforeNewMessageReceivedEnabled,
    MembershipTimeoutMs,
    MembershipFailurePolicy,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::IgnoredStartsWith,
        SettingKey::CaseSensitive,
        SettingKey::Debug,
        SettingKey::ServerIds,
        SettingKey::BeforeNewThreadEnabled,
        SettingKey::BeforeNewMessageReceivedEnabled,
        SettingKey::MembershipTimeoutMs,
        SettingKey::MembershipFailurePolicy,
    ];

    /// Name as it appears in the host configuration.
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::IgnoredStartsWith => "ignoredStartsWith",
            SettingKey::CaseSensitive => "caseSensitive",
            SettingKey::Debug => "debug",
            SettingKey::ServerIds => "serverIds",
            SettingKey::BeforeNewThreadEnabled => "beforeNewThreadEnabled",
            SettingKey::BeforeNewMessageReceivedEnabled => "beforeNewMessageReceivedEnabled",
            SettingKey::MembershipTimeoutMs => "membershipTimeoutMs",
            SettingKey::MembershipFailurePolicy => "membershipFailurePolicy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }

    pub fn default_value(&self) -> Value {
        match self {
            SettingKey::IgnoredStartsWith | SettingKey::ServerIds => json!([]),
            SettingKey::CaseSensitive | SettingKey::Debug => json!(false),
            SettingKey::BeforeNewThreadEnabled => json!(true),
            SettingKey::BeforeNewMessageReceivedEnabled => json!(false),
            SettingKey::MembershipTimeoutMs => json!(DEFAULT_MEMBERSHIP_TIMEOUT_MS),
            SettingKey::MembershipFailurePolicy => json!("absent"),
        }
    }

    /// Keys whose name contains "enabled" go through boolean coercion.
    pub fn coercion(&self) -> Coercion {
        if self.name().to_lowercase().contains("enabled") {
            Coercion::BooleanLiteral
        } else {
            Coercion::Verbatim
        }
    }
}

/// Per-query membership timeout when none is configured.
pub const DEFAULT_MEMBERSHIP_TIMEOUT_MS: u64 = 5000;

/// Untyped settings, keyed by schema key.
pub type SettingsMap = BTreeMap<SettingKey, Value>;

/// Default table every normalization starts from.
pub fn default_settings() -> SettingsMap {
    SettingKey::ALL
        .iter()
        .map(|key| (*key, key.default_value()))
        .collect()
}

/// Typed, frozen plugin settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prefixes that cancel an event, in match order
    pub ignored_starts_with: Vec<String>,

    /// Compare prefixes case-sensitively
    pub case_sensitive: bool,

    /// Emit one trace record per tested prefix
    pub debug: bool,

    /// Servers the acting user must belong to (any of)
    pub server_ids: Vec<String>,

    /// Register the `beforeNewThread` hook
    pub before_new_thread_enabled: bool,

    /// Register the `beforeNewMessageReceived` hook
    pub before_new_message_received_enabled: bool,

    /// Upper bound for one membership lookup
    pub membership_timeout: Duration,

    /// How failed lookups count toward presence
    pub membership_failure_policy: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignored_starts_with: Vec::new(),
            case_sensitive: false,
            debug: false,
            server_ids: Vec::new(),
            before_new_thread_enabled: true,
            before_new_message_received_enabled: false,
            membership_timeout: Duration::from_millis(DEFAULT_MEMBERSHIP_TIMEOUT_MS),
            membership_failure_policy: FailurePolicy::Absent,
        }
    }
}

impl Settings {
    /// True when neither prefixes nor servers are configured.
    pub fn has_no_rules(&self) -> bool {
        self.ignored_starts_with.is_empty() && self.server_ids.is_empty()
    }

    pub fn features(&self) -> FilterFeatures {
        FilterFeatures {
            debug: self.debug,
            membership_check_enabled: !self.server_ids.is_empty(),
        }
    }
}

/// Feature switches that distinguish the plugin variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterFeatures {
    pub debug: bool,
    pub membership_check_enabled: bool,
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("thread-guard")
        })
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enabled_keys_are_coerced() {
        let coerced: Vec<_> = SettingKey::ALL
            .iter()
            .filter(|k| k.coercion() == Coercion::BooleanLiteral)
            .map(|k| k.name())
            .collect();
        assert_eq!(
            coerced,
            vec!["beforeNewThreadEnabled", "beforeNewMessageReceivedEnabled"]
        );
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_name(key.name()), Some(key));
        }
        assert_eq!(SettingKey::from_name("IgnoredStartsWith"), None);
    }

    #[test]
    fn test_plugin_overrides_namespace() {
        let mut config = HostConfig::default();
        let (overrides, diagnostics) = config.plugin_overrides();
        assert!(overrides.is_empty());
        assert!(diagnostics.is_empty());

        config
            .plugins
            .insert(PLUGIN_KEY.to_string(), json!({"debug": true}));
        let (overrides, _) = config.plugin_overrides();
        assert_eq!(overrides.get("debug"), Some(&json!(true)));

        config.plugins.insert(PLUGIN_KEY.to_string(), json!("oops"));
        let (overrides, diagnostics) = config.plugin_overrides();
        assert!(overrides.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_features_follow_settings() {
        let settings = Settings {
            debug: true,
            server_ids: vec!["1".to_string()],
            ..Settings::default()
        };
        assert_eq!(
            settings.features(),
            FilterFeatures {
                debug: true,
                membership_check_enabled: true
            }
        );
        assert!(Settings::default().has_no_rules());
    }
}
