//! Saarthi - terminal client for the Saarthi wellness companion
//!
#![doc = "Saarthi - terminal client for the Saarthi wellness companion"]
#![doc = "Main entry point for the Saarthi application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use saarthi::cli::{Cli, Commands, SessionsCommand};
use saarthi::commands;
use saarthi::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { persona } => {
            if let Some(p) = &persona {
                tracing::debug!("Using persona override: {}", p);
            }
            commands::chat::run_chat(config, persona).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionsCommand::List { json } => {
                commands::sessions::list_sessions(&config, json).await?;
                Ok(())
            }
            SessionsCommand::Delete { id } => {
                commands::sessions::delete_session(&config, &id).await?;
                Ok(())
            }
        },
        Commands::Vent { animation_millis } => {
            commands::vent::run_vent(&config, animation_millis).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with chat output on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "saarthi=debug" } else { "saarthi=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
