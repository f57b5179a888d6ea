//! Special commands parser for interactive chat mode
//!
//! Special commands let the user manage sessions and personas without
//! leaving the chat:
//! - Start, list, search, switch and delete sessions
//! - Pick a persona for the next reply
//! - View the current session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/`. The command word is case-insensitive;
//! arguments keep their case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// How a command names a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based position in the last `/list` output
    Index(usize),
    /// Session id
    Id(String),
}

impl SessionRef {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(n) => Self::Index(n),
            Err(_) => Self::Id(arg.to_string()),
        }
    }
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Create a session and switch to it
    NewChat,

    /// Refresh and show the session list
    ListSessions,

    /// Show sessions whose title matches the query
    Search(String),

    /// Make another session active
    Switch(SessionRef),

    /// Delete a session
    Delete(SessionRef),

    /// Show the selected persona, or select one
    Persona(Option<String>),

    /// List the available personas
    ListPersonas,

    /// Display the active session, persona and session count
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command takes no argument but got one.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use saarthi::commands::special_commands::{parse_special_command, SessionRef, SpecialCommand};
///
/// let cmd = parse_special_command("/switch 2").unwrap();
/// assert_eq!(cmd, SpecialCommand::Switch(SessionRef::Index(2)));
///
/// let cmd = parse_special_command("I had a rough day").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return match lower.as_str() {
            "exit" | "quit" => Ok(SpecialCommand::Exit),
            _ => Ok(SpecialCommand::None),
        };
    }

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match word.as_str() {
        "/new" => no_argument("/new", arg, SpecialCommand::NewChat),
        "/list" | "/sessions" => no_argument("/list", arg, SpecialCommand::ListSessions),
        "/personas" => no_argument("/personas", arg, SpecialCommand::ListPersonas),
        "/status" => no_argument("/status", arg, SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        "/search" => required("/search", arg, "/search <text>")
            .map(|q| SpecialCommand::Search(q.to_string())),
        "/switch" => required("/switch", arg, "/switch <number|id>")
            .map(|a| SpecialCommand::Switch(SessionRef::parse(a))),
        "/delete" => required("/delete", arg, "/delete <number|id>")
            .map(|a| SpecialCommand::Delete(SessionRef::parse(a))),

        "/persona" => Ok(SpecialCommand::Persona(if arg.is_empty() {
            None
        } else {
            Some(arg.to_lowercase())
        })),

        _ => Err(CommandError::UnknownCommand(word)),
    }
}

fn no_argument(
    command: &str,
    arg: &str,
    cmd: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
    }
}

fn required<'a>(command: &str, arg: &'a str, usage: &str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg)
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

SESSIONS:
  /new               - Start a new chat
  /list              - Show your chats (the first is always "A Happy Memory")
  /search <text>     - Show chats whose title contains <text>
  /switch <n|id>     - Open chat number <n> from /list, or by id
  /delete <n|id>     - Delete a chat

PERSONAS:
  /persona           - Show who is replying
  /persona <id>      - Reply as wise_elder, empathizer or motivator
  /personas          - List personas

OTHER:
  /status            - Show the current chat and persona
  /help              - Show this help
  exit, quit         - Leave the chat

Anything else you type is sent as a message.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(
            parse_special_command("I can't focus today").unwrap(),
            SpecialCommand::None
        );
        assert_eq!(parse_special_command("").unwrap(), SpecialCommand::None);
    }

    #[test]
    fn test_exit_aliases() {
        for input in ["exit", "QUIT", "/exit", "/quit", "  exit  "] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
        assert_eq!(parse_special_command("/LIST").unwrap(), SpecialCommand::ListSessions);
        assert_eq!(parse_special_command("/sessions").unwrap(), SpecialCommand::ListSessions);
        assert_eq!(parse_special_command("/personas").unwrap(), SpecialCommand::ListPersonas);
        assert_eq!(parse_special_command("/status").unwrap(), SpecialCommand::ShowStatus);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_no_argument_commands_reject_arguments() {
        assert_eq!(
            parse_special_command("/new chat").unwrap_err(),
            CommandError::UnsupportedArgument {
                command: "/new".to_string(),
                arg: "chat".to_string()
            }
        );
    }

    #[test]
    fn test_search_keeps_query_case() {
        assert_eq!(
            parse_special_command("/search Exam Stress").unwrap(),
            SpecialCommand::Search("Exam Stress".to_string())
        );
        assert!(matches!(
            parse_special_command("/search   "),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_switch_by_index_and_id() {
        assert_eq!(
            parse_special_command("/switch 3").unwrap(),
            SpecialCommand::Switch(SessionRef::Index(3))
        );
        assert_eq!(
            parse_special_command("/switch chat_1700000000").unwrap(),
            SpecialCommand::Switch(SessionRef::Id("chat_1700000000".to_string()))
        );
        assert!(parse_special_command("/switch").is_err());
    }

    #[test]
    fn test_delete_requires_target() {
        assert_eq!(
            parse_special_command("/delete 2").unwrap(),
            SpecialCommand::Delete(SessionRef::Index(2))
        );
        let err = parse_special_command("/delete").unwrap_err();
        assert!(err.to_string().contains("/delete <number|id>"));
    }

    #[test]
    fn test_persona_with_and_without_argument() {
        assert_eq!(
            parse_special_command("/persona").unwrap(),
            SpecialCommand::Persona(None)
        );
        assert_eq!(
            parse_special_command("/persona Motivator").unwrap(),
            SpecialCommand::Persona(Some("motivator".to_string()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_special_command("/mode write").unwrap_err(),
            CommandError::UnknownCommand("/mode".to_string())
        );
    }
}
