//! Hook processing service.

use anyhow::Result;
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info};

use super::adapter;
use super::hooks::HookTable;
use super::plugin::{self, Startup};
use crate::config::HostConfig;
use crate::domain::{emit_all, Event, GuardError, HookKind, Verdict};

/// Service for processing hook events.
pub struct HookService {
    hooks: HookTable,
    startup: Startup,
}

impl HookService {
    /// Initialize the plugin and write its startup diagnostics to the log.
    pub fn new(config: &HostConfig) -> Self {
        let mut hooks = HookTable::new();
        let startup = plugin::init(config, &mut hooks);
        emit_all(&startup.diagnostics);
        Self { hooks, startup }
    }

    pub fn startup(&self) -> &Startup {
        &self.startup
    }

    /// Read one event from stdin, dispatch it, and write the verdict to stdout.
    ///
    /// Returns the process exit code.
    pub async fn run(&self, kind: HookKind) -> Result<i32> {
        let input = match read_input().await {
            Ok(input) => input,
            Err(e) => {
                let error_msg = format!("Failed to read input: {}", e);
                error!("{}", error_msg);
                write_line(&adapter::format_error(&error_msg)).await?;
                return Ok(adapter::error_exit_code());
            }
        };

        if input.trim().is_empty() {
            error!("No input received from stdin");
            // Fail closed: cancel when no input received
            write_line(&adapter::format_error("No input received from stdin")).await?;
            return Ok(adapter::error_exit_code());
        }

        debug!("Received input: {}", input);

        let event = match adapter::parse_event(&input) {
            Ok(event) => event,
            Err(e) => {
                let error_msg = format!("Failed to parse input: {}", e);
                error!("{}", error_msg);
                write_line(&adapter::format_error(&error_msg)).await?;
                return Ok(adapter::error_exit_code());
            }
        };

        let verdict = self.process(kind, &event).await;

        let output = adapter::format_output(&verdict)?;
        info!("Output: {}", output);
        write_line(&output).await?;

        Ok(verdict.exit_code())
    }

    /// Dispatch one event to the handlers registered for `kind`.
    pub async fn process(&self, kind: HookKind, event: &Event) -> Verdict {
        debug!(hook = kind.as_str(), "Processing hook");
        self.hooks.dispatch(kind, event).await
    }
}

async fn read_input() -> Result<String, GuardError> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes).await?;
    adapter::decode_input(bytes)
}

/// Write one line to stdout and flush it before the process exits.
async fn write_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(format!("{}\n", line).as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
