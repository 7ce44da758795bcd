//! Keystroke sources for the command hub.
//!
//! In production the keys come from the controlling terminal, switched to raw
//! mode so that a single key press is delivered immediately.  Reading the
//! terminal is a blocking operation, so it happens on a dedicated OS thread;
//! keystrokes are forwarded to the async runtime through a channel.
//!
//! # Testability
//!
//! The [`KeySource`] trait allows tests to inject synthetic keystrokes through
//! [`mock::MockKeySource`] without a terminal.

use tokio::sync::mpsc::UnboundedReceiver;

pub mod mock;
pub mod terminal;

/// One key press, reduced to what the command hub cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// A printable character with no Ctrl/Alt modifier.
    Char(char),
    /// `Ctrl+C`.  In raw mode the terminal no longer turns this into SIGINT,
    /// so the key source reports it explicitly.
    Interrupt,
    /// Anything else (arrows, function keys, modified characters).
    Other,
}

/// Error type for key source operations.
#[derive(Debug, thiserror::Error)]
pub enum KeySourceError {
    /// The terminal could not be switched to raw mode (for example, stdin is
    /// not a TTY).
    #[error("failed to enable terminal raw mode: {0}")]
    RawMode(#[source] std::io::Error),
    /// The reader thread could not be spawned.
    #[error("failed to spawn key reader thread: {0}")]
    Thread(#[source] std::io::Error),
    /// `start` was called twice without `stop` in between.
    #[error("key source is already running")]
    AlreadyStarted,
}

/// Trait abstracting keystroke production.
///
/// The production implementation reads the terminal; tests use
/// [`mock::MockKeySource`].
pub trait KeySource: Send {
    /// Starts the source and returns a receiver for keystrokes, in the order
    /// they were pressed.
    fn start(&self) -> Result<UnboundedReceiver<Keystroke>, KeySourceError>;
    /// Stops the source and restores any terminal state it changed.  The
    /// receiver returned by `start` then yields `None`.
    fn stop(&self);
}
