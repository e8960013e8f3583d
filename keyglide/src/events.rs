//! Raw key event types exchanged with the host input subsystem.

use serde::{Deserialize, Serialize};

/// Modifier bits the host reports on a plain, unmodified keystroke.
///
/// Events carrying any bit outside this mask are treated as chorded input
/// and never participate in sequence matching.
pub const BASELINE_MODIFIER_MASK: u64 = 0x100;

/// One key transition as delivered by the host input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Hardware key code.
    pub key_code: u32,

    /// `true` for key-down, `false` for key-up.
    pub is_key_down: bool,

    /// The resolved character, when the host could resolve one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub character: Option<char>,

    /// Raw modifier-flag bitmask as reported by the host.
    pub modifiers: u64,

    /// Hardware auto-repeat flag.
    pub is_repeat: bool,
}

impl KeyEvent {
    /// A plain key-down with baseline modifiers. Convenience for hosts and
    /// tests; real event sources fill every field from the wire.
    pub fn key_down(key_code: u32, character: char) -> Self {
        Self {
            key_code,
            is_key_down: true,
            character: Some(character),
            modifiers: BASELINE_MODIFIER_MASK,
            is_repeat: false,
        }
    }

    /// A plain key-up with baseline modifiers.
    pub fn key_up(key_code: u32, character: char) -> Self {
        Self {
            key_code,
            is_key_down: false,
            character: Some(character),
            modifiers: BASELINE_MODIFIER_MASK,
            is_repeat: false,
        }
    }
}

/// Per-event decision returned to the host: deliver the event onward or
/// swallow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Deliver the event to the focused application untouched.
    PassThrough,
    /// Consume the event; it must not reach the focused application.
    Swallow,
}
