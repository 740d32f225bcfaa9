//! thread-guard: message-interception filter for chat-bot plugin hosts
//!
//! Reads a host event from stdin and answers whether the host should let it
//! through or cancel it.

mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use thread_guard::config::ConfigService;
use thread_guard::domain::logger;
use thread_guard::service::HookService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    if !matches!(cli.command, Commands::Init { .. } | Commands::Version) {
        logger::init(&config, cli.debug)?;
    }

    match cli.command {
        Commands::Run { hook } => {
            let service = HookService::new(&config);
            let exit_code = service.run(hook.into()).await?;
            std::process::exit(exit_code);
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            let service = HookService::new(&config);
            if !cli.quiet {
                let startup = service.startup();
                if startup.engaged() {
                    let hooks: Vec<&str> = startup.hooks.iter().map(|h| h.as_str()).collect();
                    eprintln!("Plugin engaged on: {}", hooks.join(", "));
                } else {
                    eprintln!("Plugin disengaged.");
                }
            }
        }
        Commands::Version => {
            println!("thread-guard {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
