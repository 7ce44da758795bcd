//! Key table for the command hub.
//!
//! | Key      | Command            |
//! |----------|--------------------|
//! | `c`      | `ux_capture_image` |
//! | `p`      | `ux_previous`      |
//! | `n`      | `ux_next`          |
//! | `d`      | `ux_damage`        |
//! | `m`      | `ux_menu`          |
//! | `Ctrl+C` | exit               |
//!
//! Keys are case-sensitive; every other key is ignored.

use hub_core::{CommandKind, CommandMessage};

use crate::infrastructure::key_source::Keystroke;

/// What the command loop should do with one keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Broadcast this command.
    Emit(CommandMessage),
    /// Not a command key.
    Ignore,
    /// The operator asked to quit.
    Shutdown,
}

/// Maps a character to its UX command, if it has one.
pub fn command_for_key(key: char) -> Option<CommandKind> {
    match key {
        'c' => Some(CommandKind::UxCaptureImage),
        'p' => Some(CommandKind::UxPrevious),
        'n' => Some(CommandKind::UxNext),
        'm' => Some(CommandKind::UxMenu),
        'd' => Some(CommandKind::UxDamage),
        _ => None,
    }
}

/// The key bound to `command`.  Inverse of [`command_for_key`].
pub fn key_for_command(command: CommandKind) -> char {
    match command {
        CommandKind::UxCaptureImage => 'c',
        CommandKind::UxPrevious => 'p',
        CommandKind::UxNext => 'n',
        CommandKind::UxMenu => 'm',
        CommandKind::UxDamage => 'd',
    }
}

/// Interprets a keystroke, stamping commands with `timestamp` (epoch seconds).
pub fn interpret_at(key: Keystroke, timestamp: i64) -> KeyOutcome {
    interpret_with(key, |command| CommandMessage::new(command, timestamp))
}

/// Interprets a keystroke, stamping commands with the current time.
pub fn interpret(key: Keystroke) -> KeyOutcome {
    interpret_with(key, CommandMessage::now)
}

fn interpret_with(key: Keystroke, stamp: impl FnOnce(CommandKind) -> CommandMessage) -> KeyOutcome {
    match key {
        Keystroke::Interrupt => KeyOutcome::Shutdown,
        Keystroke::Char(c) => match command_for_key(c) {
            Some(command) => KeyOutcome::Emit(stamp(command)),
            None => KeyOutcome::Ignore,
        },
        Keystroke::Other => KeyOutcome::Ignore,
    }
}

/// One-line operator prompt listing the recognised keys.
pub fn banner() -> String {
    let mut keys: Vec<String> = CommandKind::ALL
        .iter()
        .map(|&command| format!("'{}'", key_for_command(command)))
        .collect();
    let last = keys.pop().unwrap_or_default();
    format!(
        "Keyboard command handler initialized. Press {} or {}. (Press Ctrl+C to exit)",
        keys.join(", "),
        last
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
