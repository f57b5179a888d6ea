/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`    : Interactive chat over the session controller
- `sessions`: One-shot session listing and deletion
- `vent`    : The vent room

Rendering helpers shared by the handlers live at this level.
*/

use crate::config::Config;
use crate::error::{Result, SaarthiError};
use crate::gateway::{HttpGateway, SessionGateway};
use crate::persona::resolve_persona;
use crate::session::{ChatSession, ChatSessionController, Message, Role, SessionRegistry};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the chat REPL
pub mod special_commands;

use special_commands::SessionRef;

/// Build the HTTP gateway for the configured backend
fn connect(config: &Config) -> Result<Arc<dyn SessionGateway>> {
    let gateway = HttpGateway::new(&config.server)?;
    Ok(Arc::new(gateway))
}

/// Format a session timestamp for listings
fn format_timestamp(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "-".to_string(),
    }
}

/// One line of a session listing
///
/// `index` is 1-based and matches what `/switch` and `/delete` accept.
pub fn format_session_line(index: usize, session: &ChatSession, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{} {:>2}. {}  ({}, {})",
        marker,
        index,
        session.display_title(),
        resolve_persona(&session.last_persona).display_name,
        format_timestamp(session.timestamp)
    )
}

/// Render a message for the terminal
pub fn format_message(message: &Message) -> String {
    let mut out = match message.role {
        Role::User => format!("{} {}", "you:".bold(), message.content),
        Role::Assistant => {
            let persona = resolve_persona(message.persona.as_deref().unwrap_or_default());
            format!("{} {}", format!("{}:", persona.display_name).cyan().bold(), message.content)
        }
    };
    if let Some(attachment) = &message.attachment {
        out.push_str(&format!("\n     [image: {}]", attachment.media_ref));
        if let Some(link) = &attachment.link {
            out.push_str(&format!(" -> {}", link));
        }
    }
    out
}

/// Resolve a session reference against the registry's display order
pub fn resolve_session_ref(registry: &SessionRegistry, target: &SessionRef) -> Option<String> {
    match target {
        SessionRef::Index(n) => n
            .checked_sub(1)
            .and_then(|i| registry.list().get(i).map(|s| s.id.clone())),
        SessionRef::Id(id) => registry.find(id).map(|s| s.id.clone()),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Builds the gateway and controller, runs the startup protocol, and then
    //! reads lines with rustyline. Lines starting with `/` are special
    //! commands; anything else is sent as a message in the active session.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::persona::{find_persona, PERSONAS};
    use crate::session::{IgnoreReason, SendOutcome};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `persona` - Optional persona to select after startup
    pub async fn run_chat(config: Config, persona: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let gateway = connect(&config)?;
        let mut controller = ChatSessionController::new(gateway, &config.chat.default_persona);

        if let Err(e) = controller.start().await {
            println!(
                "{}",
                format!(
                    "Could not reach Saarthi at {} ({}). Showing a happy memory instead; use /new once the backend is up.",
                    config.server.base_url, e
                )
                .yellow()
            );
        }

        if let Some(id) = persona {
            select_persona(&mut controller, &id);
        }

        let mut rl = DefaultEditor::new().map_err(SaarthiError::Readline)?;

        print_welcome_banner(&controller);
        print_transcript(&controller);

        loop {
            let prompt = format!("[{}] you> ", controller.persona().colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)
                        .map_err(SaarthiError::Readline)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::NewChat => match controller.new_chat().await {
                            Ok(session) => {
                                println!("{}", format!("Started a new chat ({})\n", session.id).green())
                            }
                            Err(e) => eprintln!("{}", format!("Could not start a new chat: {}", e).red()),
                        },
                        SpecialCommand::ListSessions => {
                            controller.refresh_sessions().await;
                            print_sessions(&controller, None);
                        }
                        SpecialCommand::Search(query) => print_sessions(&controller, Some(&query)),
                        SpecialCommand::Switch(target) => {
                            let Some(id) = resolve_session_ref(controller.registry(), &target) else {
                                eprintln!("{}", "No such chat. Use /list to see your chats.".red());
                                continue;
                            };
                            match controller.select_session(&id).await {
                                Ok(()) => print_transcript(&controller),
                                Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                            }
                        }
                        SpecialCommand::Delete(target) => {
                            let Some(id) = resolve_session_ref(controller.registry(), &target) else {
                                eprintln!("{}", "No such chat. Use /list to see your chats.".red());
                                continue;
                            };
                            let was_active = controller.active_session_id() == Some(id.as_str());
                            match controller.delete_session(&id).await {
                                Ok(()) => {
                                    println!("{}", "Chat deleted.".green());
                                    if was_active {
                                        print_transcript(&controller);
                                    }
                                }
                                Err(e) => eprintln!("{}", format!("Could not delete chat: {}", e).red()),
                            }
                        }
                        SpecialCommand::Persona(None) => {
                            println!("Replying as {}\n", controller.persona().colored_tag())
                        }
                        SpecialCommand::Persona(Some(id)) => select_persona(&mut controller, &id),
                        SpecialCommand::ListPersonas => {
                            for persona in PERSONAS.iter() {
                                println!("  {:<12} {}", persona.id, persona.colored_tag());
                            }
                            println!();
                        }
                        SpecialCommand::ShowStatus => print_status(&controller),
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => send(&mut controller, trimmed).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Take care. Goodbye!");
        Ok(())
    }

    async fn send(controller: &mut ChatSessionController, text: &str) {
        controller.set_input(text);
        println!("{}", "...".dimmed());
        match controller.send_message(text).await {
            SendOutcome::Replied(reply) => println!("\n{}\n", format_message(&reply)),
            SendOutcome::Failed(error) => {
                tracing::debug!("Send failed: {}", error);
                if let Some(message) = controller.transcript().last() {
                    println!("\n{}\n", format_message(message).red());
                }
            }
            SendOutcome::Ignored(IgnoreReason::ReadOnlySession) => println!(
                "{}",
                "This memory is read-only. Use /new to start a chat or /switch to open another.".yellow()
            ),
            SendOutcome::Ignored(reason) => println!("{}", reason.to_string().yellow()),
            SendOutcome::Discarded => {}
        }
    }

    fn select_persona(controller: &mut ChatSessionController, id: &str) {
        if find_persona(id).is_none() {
            let valid: Vec<&str> = PERSONAS.iter().map(|p| p.id).collect();
            eprintln!(
                "{}",
                format!("Unknown persona: {}. Choose one of: {}", id, valid.join(", ")).red()
            );
            return;
        }
        let persona = controller.select_persona(id);
        println!("Now replying as {}\n", persona.colored_tag());
    }

    fn print_sessions(controller: &ChatSessionController, query: Option<&str>) {
        let hits: Vec<String> = match query {
            Some(q) => controller
                .registry()
                .search(q)
                .iter()
                .map(|s| s.id.clone())
                .collect(),
            None => Vec::new(),
        };

        let mut shown = 0;
        for (i, session) in controller.registry().list().into_iter().enumerate() {
            if query.is_some() && !hits.contains(&session.id) {
                continue;
            }
            let active = controller.active_session_id() == Some(session.id.as_str());
            println!("{}", format_session_line(i + 1, session, active));
            shown += 1;
        }
        if shown == 0 {
            println!("{}", "No matching chats.".yellow());
        }
        println!();
    }

    fn print_transcript(controller: &ChatSessionController) {
        if let Some(session) = controller.active_session() {
            println!("{}\n", format!("== {} ==", session.display_title()).bold());
        }
        for message in controller.transcript() {
            println!("{}\n", format_message(message));
        }
        if controller.is_read_only() {
            println!("{}\n", "(read-only memory)".dimmed());
        }
    }

    /// Display welcome banner at the start of interactive chat
    fn print_welcome_banner(controller: &ChatSessionController) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Saarthi - You're not alone. Welcome!            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Persona: {}", controller.persona().colored_tag());
        println!("Chats:   {}", controller.registry().len());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status(controller: &ChatSessionController) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Saarthi Session Status                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        match controller.active_session() {
            Some(session) => {
                println!("Chat:      {}", session.display_title());
                println!("Id:        {}", session.id);
            }
            None => println!("Chat:      {}", controller.active_session_id().unwrap_or("-")),
        }
        println!("Persona:   {}", controller.persona().colored_tag());
        println!("Messages:  {}", controller.transcript().len());
        println!("Chats:     {}", controller.registry().len());
        println!("Read-only: {}", if controller.is_read_only() { "yes" } else { "no" });
        println!();
    }
}

// One-shot session management
pub mod sessions {
    //! `saarthi sessions list|delete`.

    use super::*;

    /// Print every known session, the embedded memory first
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be reached
    pub async fn list_sessions(config: &Config, json: bool) -> Result<()> {
        let gateway = connect(config)?;
        let mut registry = SessionRegistry::new();
        registry.upsert_from_remote(gateway.list_sessions().await?);

        if json {
            let json = serde_json::to_string_pretty(&registry.list())
                .map_err(SaarthiError::Serialization)?;
            println!("{}", json);
            return Ok(());
        }

        for (i, session) in registry.list().into_iter().enumerate() {
            println!("{}  [{}]", format_session_line(i + 1, session, false), session.id);
        }
        Ok(())
    }

    /// Delete a session by id
    ///
    /// # Errors
    ///
    /// Returns error if the id is the embedded memory or the backend refuses
    pub async fn delete_session(config: &Config, id: &str) -> Result<()> {
        let gateway = connect(config)?;
        let mut controller = ChatSessionController::new(gateway, &config.chat.default_persona);
        controller.delete_session(id).await?;
        println!("Deleted session {}", id);
        Ok(())
    }
}

// Vent room handler
pub mod vent {
    //! Interactive vent room.
    //!
    //! A background task ticks the room once per second while the user
    //! writes. Nothing written here is stored or sent anywhere.

    use super::*;
    use crate::vent::{format_elapsed, VentRoom};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::sync::Mutex;
    use std::time::Duration;

    const CRUMPLE_FRAMES: [&str; 4] = ["  ____  ", "  (~~)  ", "  (@)   ", "   .    "];

    /// Open the vent room
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `animation_millis` - Optional override for the crumple animation length
    pub async fn run_vent(config: &Config, animation_millis: Option<u64>) -> Result<()> {
        tracing::info!("Opening vent room");
        let animation = Duration::from_millis(animation_millis.unwrap_or(config.vent.animation_millis));

        let room = Arc::new(Mutex::new(VentRoom::new()));
        let ticker = {
            let room = Arc::clone(&room);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if let Ok(mut room) = room.lock() {
                        room.tick();
                    }
                }
            })
        };

        let result = vent_loop(&room, animation).await;
        ticker.abort();
        result
    }

    async fn vent_loop(room: &Mutex<VentRoom>, animation: Duration) -> Result<()> {
        let mut rl = DefaultEditor::new().map_err(SaarthiError::Readline)?;
        println!("\n{}\n", "Welcome to the vent room. Nothing you write here is saved.".bold());

        'outer: loop {
            let affirmation = with_room(room, |r| r.next_affirmation());
            println!("{}\n", affirmation.italic().cyan());

            match rl.readline("Press Enter to start venting, or type 'exit': ") {
                Ok(line) if matches!(line.trim().to_lowercase().as_str(), "exit" | "quit") => break,
                Ok(_) => {}
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }

            with_room(room, |r| r.start())?;
            println!(
                "{}",
                "Let go of all frustrations... Type /done on its own line when you're finished.".dimmed()
            );

            loop {
                let elapsed = with_room(room, |r| r.elapsed());
                match rl.readline(&format!("[{}] ", format_elapsed(elapsed))) {
                    Ok(line) if line.trim() == "/done" => break,
                    Ok(line) => with_room(room, |r| r.append_text(&line))?,
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        with_room(room, |r| r.vent_again());
                        break 'outer;
                    }
                    Err(err) => {
                        tracing::error!("Readline error: {:?}", err);
                        with_room(room, |r| r.vent_again());
                        break 'outer;
                    }
                }
            }

            let record = with_room(room, |r| r.end())?;
            let frame_delay = animation / CRUMPLE_FRAMES.len() as u32;
            for frame in CRUMPLE_FRAMES {
                println!("{}", frame.dimmed());
                tokio::time::sleep(frame_delay).await;
            }
            with_room(room, |r| r.animation_complete())?;

            println!(
                "\n{}",
                format!("Released. You let it out for {}.", record.duration_label()).green()
            );
            println!("\nHistory:");
            for entry in with_room(room, |r| r.history().to_vec()) {
                println!("  {}  {}", entry.start_label(), entry.duration_label());
            }
            println!();

            with_room(room, |r| r.vent_again());
        }

        println!("Be gentle with yourself. Goodbye!");
        Ok(())
    }

    fn with_room<T>(room: &Mutex<VentRoom>, f: impl FnOnce(&mut VentRoom) -> T) -> T {
        let mut guard = match room.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}
