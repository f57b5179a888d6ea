//! Vent room
//!
//! A private free-writing space. The user starts a session, writes for as
//! long as they like while a timer runs, and then watches the page crumple
//! away. Only the start time and duration of each session are kept; the text
//! itself never leaves memory and is dropped when the room is reset.

use chrono::{DateTime, Local};
use std::fmt;
use thiserror::Error;

/// Affirmations shown while the room is open, in rotation order
pub const AFFIRMATIONS: [&str; 3] = [
    "You are capable of amazing things.",
    "Your feelings are valid and important.",
    "You are resilient and can handle any challenge.",
];

/// Phase of the vent room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentState {
    Idle,
    Venting,
    Animating,
    Finished,
}

impl fmt::Display for VentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Venting => write!(f, "venting"),
            Self::Animating => write!(f, "animating"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Errors from the vent room state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VentError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// State the room was in
        from: VentState,
        /// Action that was attempted
        action: &'static str,
    },
}

/// A completed vent, as shown in the history panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VentRecord {
    pub started_at: DateTime<Local>,
    pub seconds: u64,
}

impl VentRecord {
    /// Clock time the vent started, e.g. `11:45 PM`
    pub fn start_label(&self) -> String {
        self.started_at.format("%I:%M %p").to_string()
    }

    /// Duration, e.g. `5 min 32 sec`
    pub fn duration_label(&self) -> String {
        format_duration(self.seconds)
    }
}

/// State machine behind the vent room
#[derive(Debug, Clone)]
pub struct VentRoom {
    state: VentState,
    elapsed: u64,
    text: String,
    started_at: Option<DateTime<Local>>,
    history: Vec<VentRecord>,
    affirmation: usize,
}

impl VentRoom {
    pub fn new() -> Self {
        Self {
            state: VentState::Idle,
            elapsed: 0,
            text: String::new(),
            started_at: None,
            history: Vec::new(),
            affirmation: 0,
        }
    }

    pub fn state(&self) -> VentState {
        self.state
    }

    /// Seconds spent in the current vent
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Completed vents, oldest first
    pub fn history(&self) -> &[VentRecord] {
        &self.history
    }

    /// Begin venting
    ///
    /// # Errors
    ///
    /// Returns [`VentError::InvalidTransition`] unless the room is idle
    pub fn start(&mut self) -> Result<(), VentError> {
        self.require(VentState::Idle, "start")?;
        self.state = VentState::Venting;
        self.elapsed = 0;
        self.started_at = Some(Local::now());
        tracing::debug!("Vent started");
        Ok(())
    }

    /// Advance the timer by one second; ignored unless venting
    pub fn tick(&mut self) {
        if self.state == VentState::Venting {
            self.elapsed += 1;
        }
    }

    /// Add free-written text
    ///
    /// # Errors
    ///
    /// Returns [`VentError::InvalidTransition`] unless venting
    pub fn append_text(&mut self, text: &str) -> Result<(), VentError> {
        self.require(VentState::Venting, "write")?;
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
        Ok(())
    }

    /// Stop venting and start the crumple animation
    ///
    /// Records the vent in the history and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`VentError::InvalidTransition`] unless venting
    pub fn end(&mut self) -> Result<VentRecord, VentError> {
        self.require(VentState::Venting, "end")?;
        let record = VentRecord {
            started_at: self.started_at.take().unwrap_or_else(Local::now),
            seconds: self.elapsed,
        };
        self.history.push(record.clone());
        self.state = VentState::Animating;
        tracing::debug!("Vent ended after {} seconds", self.elapsed);
        Ok(record)
    }

    /// Mark the crumple animation as done
    ///
    /// # Errors
    ///
    /// Returns [`VentError::InvalidTransition`] unless animating
    pub fn animation_complete(&mut self) -> Result<(), VentError> {
        self.require(VentState::Animating, "finish the animation")?;
        self.state = VentState::Finished;
        Ok(())
    }

    /// Return to idle from any state, discarding the timer and the text
    pub fn vent_again(&mut self) {
        self.state = VentState::Idle;
        self.elapsed = 0;
        self.text.clear();
        self.started_at = None;
    }

    /// Current affirmation; advances the rotation
    pub fn next_affirmation(&mut self) -> &'static str {
        let text = AFFIRMATIONS[self.affirmation];
        self.affirmation = (self.affirmation + 1) % AFFIRMATIONS.len();
        text
    }

    fn require(&self, state: VentState, action: &'static str) -> Result<(), VentError> {
        if self.state == state {
            Ok(())
        } else {
            Err(VentError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }
}

impl Default for VentRoom {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a timer as `MM:SS`
///
/// # Examples
///
/// ```
/// use saarthi::vent::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "00:00");
/// assert_eq!(format_elapsed(332), "05:32");
/// ```
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Render a duration as `{m} min {s} sec`
pub fn format_duration(seconds: u64) -> String {
    format!("{} min {} sec", seconds / 60, seconds % 60)
}
