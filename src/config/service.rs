//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::HostConfig;
use crate::domain::GuardError;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/thread-guard/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("thread-guard")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<HostConfig> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // log_path equal to the general default means it wasn't set in the file
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Parse configuration from TOML text. Plugin tables keep their key order.
    pub fn parse(content: &str) -> Result<HostConfig, GuardError> {
        Ok(toml::from_str(content)?)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> &'static str {
        r#"# thread-guard configuration file

# Also write logs to a daily rolling file (default: false)
log_to_file = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/thread-guard/logs"

# Plugin settings. Unknown keys are reported and ignored.
# With no prefixes and no servers the plugin stays disengaged.
[pec]
# Messages starting with any of these strings are cancelled, first match wins
ignoredStartsWith = []

# Compare prefixes case-sensitively (default: false)
caseSensitive = false

# Log every tested prefix (default: false)
debug = false

# The acting user must be a member of at least one of these servers
serverIds = []

# Hooks to register. Accepts true/false, "on"/"off", "1"/"0", "true"/"false", "null"
beforeNewThreadEnabled = true
beforeNewMessageReceivedEnabled = false

# Upper bound for one membership lookup, in milliseconds
membershipTimeoutMs = 5000

# How a failed or timed-out lookup counts: "absent" or "present"
membershipFailurePolicy = "absent"
"#
    }
}
