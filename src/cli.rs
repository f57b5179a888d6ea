//! Command-line interface definition for Saarthi
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chatting, managing sessions, and venting.

use clap::{Parser, Subcommand};

/// Saarthi - your wellness companion in the terminal
///
/// Talk through what's on your mind with one of three personas, or let it
/// all out in the vent room.
#[derive(Parser, Debug, Clone)]
#[command(name = "saarthi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend URL from config
    #[arg(long)]
    pub api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Saarthi
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Persona to start with (wise_elder, empathizer, motivator)
        #[arg(short, long)]
        persona: Option<String>,
    },

    /// Manage saved chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionsCommand,
    },

    /// Open the vent room
    Vent {
        /// Length of the crumple animation in milliseconds
        #[arg(long)]
        animation_millis: Option<u64>,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionsCommand {
    /// List saved sessions
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a saved session
    Delete {
        /// Session id
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat() {
        let cli = Cli::try_parse_from(["saarthi", "chat"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Chat { persona } = cli.command {
            assert!(persona.is_none());
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_with_persona() {
        let cli = Cli::try_parse_from(["saarthi", "chat", "--persona", "motivator"]).unwrap();
        if let Commands::Chat { persona } = cli.command {
            assert_eq!(persona, Some("motivator".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_persona_short_flag() {
        let cli = Cli::try_parse_from(["saarthi", "chat", "-p", "wise_elder"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chat { persona: Some(ref p) } if p == "wise_elder"
        ));
    }

    #[test]
    fn test_cli_parse_default_config_path() {
        let cli = Cli::try_parse_from(["saarthi", "chat"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["saarthi", "--config", "custom.yaml", "vent"]).unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["saarthi", "-v", "chat"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_api_url() {
        let cli = Cli::try_parse_from([
            "saarthi",
            "--api-url",
            "http://10.0.0.5:5000",
            "sessions",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.api_url, Some("http://10.0.0.5:5000".to_string()));
    }

    #[test]
    fn test_cli_parse_sessions_list_json() {
        let cli = Cli::try_parse_from(["saarthi", "sessions", "list", "--json"]).unwrap();
        if let Commands::Sessions { command } = cli.command {
            assert!(matches!(command, SessionsCommand::List { json: true }));
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_delete() {
        let cli = Cli::try_parse_from(["saarthi", "sessions", "delete", "chat_1700000000"]).unwrap();
        if let Commands::Sessions { command } = cli.command {
            if let SessionsCommand::Delete { id } = command {
                assert_eq!(id, "chat_1700000000");
            } else {
                panic!("Expected Delete command");
            }
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_delete_requires_id() {
        assert!(Cli::try_parse_from(["saarthi", "sessions", "delete"]).is_err());
    }

    #[test]
    fn test_cli_parse_vent_animation() {
        let cli = Cli::try_parse_from(["saarthi", "vent", "--animation-millis", "0"]).unwrap();
        if let Commands::Vent { animation_millis } = cli.command {
            assert_eq!(animation_millis, Some(0));
        } else {
            panic!("Expected Vent command");
        }
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["saarthi"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["saarthi", "invalid"]);
        assert!(cli.is_err());
    }
}
