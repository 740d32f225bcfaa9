//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use thread_guard::domain::HookKind;

/// Prefix and server-membership filter for chat-bot plugin hosts
#[derive(Parser)]
#[command(
    name = "thread-guard",
    version,
    about = "Prefix and server-membership filter for chat-bot plugin hosts",
    long_about = "Decides whether inbound messages and new threads are allowed or cancelled, \
                  based on configured content prefixes and server membership."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Hook point the event belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Hook {
    /// A new thread is about to be created (default)
    #[default]
    BeforeNewThread,
    /// An inbound message is about to be relayed
    BeforeNewMessageReceived,
}

impl From<Hook> for HookKind {
    fn from(hook: Hook) -> Self {
        match hook {
            Hook::BeforeNewThread => HookKind::BeforeNewThread,
            Hook::BeforeNewMessageReceived => HookKind::BeforeNewMessageReceived,
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one event read from stdin (alias: hook)
    #[command(alias = "hook")]
    Run {
        /// Hook point the event is dispatched to
        #[arg(long, default_value = "before-new-thread")]
        hook: Hook,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Report configuration diagnostics and whether the plugin engages
    Check,
    /// Display version information
    Version,
}
