//! Assistant personas
//!
//! The assistant speaks in one of three fixed voices. The set is closed and
//! known at compile time; lookups by id never fail and fall back to the
//! Empathizer so a message can always be rendered with some persona.

use colored::Colorize;
use std::fmt;

/// A named assistant voice with its avatar reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    /// Wire identifier sent to and received from the service
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Avatar image reference (opaque to this crate)
    pub avatar_ref: &'static str,
}

/// The Wise Elder persona
pub const WISE_ELDER: Persona = Persona {
    id: "wise_elder",
    display_name: "Wise Elder",
    avatar_ref: "/chatbot_img/wise_elder.jpg",
};

/// The Empathizer persona (the default)
pub const EMPATHIZER: Persona = Persona {
    id: "empathizer",
    display_name: "Empathizer",
    avatar_ref: "/chatbot_img/empathiser.jpg",
};

/// The Motivator persona
pub const MOTIVATOR: Persona = Persona {
    id: "motivator",
    display_name: "Motivator",
    avatar_ref: "/chatbot_img/motivator.jpg",
};

/// All personas in selector order
pub const PERSONAS: [Persona; 3] = [WISE_ELDER, EMPATHIZER, MOTIVATOR];

/// Persona used when an id is missing or unrecognized
pub const DEFAULT_PERSONA: Persona = EMPATHIZER;

/// Resolve a persona id to its persona
///
/// Total: unknown ids resolve to [`DEFAULT_PERSONA`].
///
/// # Examples
///
/// ```
/// use saarthi::persona::{resolve_persona, DEFAULT_PERSONA};
///
/// assert_eq!(resolve_persona("motivator").display_name, "Motivator");
/// assert_eq!(resolve_persona("no-such-voice"), DEFAULT_PERSONA);
/// ```
pub fn resolve_persona(id: &str) -> Persona {
    find_persona(id).unwrap_or(DEFAULT_PERSONA)
}

/// Look up a persona by id without falling back
///
/// Used where an unknown id should be rejected instead of silently replaced,
/// such as configuration validation.
pub fn find_persona(id: &str) -> Option<Persona> {
    PERSONAS.iter().copied().find(|p| p.id == id)
}

impl Persona {
    /// Colored label for terminal output
    pub fn colored_tag(&self) -> String {
        let label = match self.id {
            "wise_elder" => self.display_name.blue(),
            "motivator" => self.display_name.yellow(),
            _ => self.display_name.magenta(),
        };
        format!("[{}]", label)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
