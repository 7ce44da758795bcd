//! Terminal key source (crossterm raw mode).
//!
//! `start()` switches the terminal to raw mode on the calling thread, so a
//! non-interactive stdin is reported immediately as
//! [`KeySourceError::RawMode`].  A reader thread then polls for key events
//! every 200 ms, forwarding presses and checking the `running` flag between
//! polls.  Raw mode is restored when the reader thread exits, whichever way
//! it exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::{KeySource, KeySourceError, Keystroke};

/// How long the reader thread waits for an event before re-checking the
/// `running` flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Reads keystrokes from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalKeySource {
    running: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl TerminalKeySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeySource {
    fn start(&self) -> Result<UnboundedReceiver<Keystroke>, KeySourceError> {
        let mut reader = self.reader.lock().unwrap_or_else(PoisonError::into_inner);
        if reader.is_some() {
            return Err(KeySourceError::AlreadyStarted);
        }

        let guard = RawModeGuard::enable().map_err(KeySourceError::RawMode)?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);

        // If spawning fails the closure (and the guard in it) is dropped,
        // which restores the terminal.
        let handle = std::thread::Builder::new()
            .name("key-reader".to_string())
            .spawn(move || {
                let _guard = guard;
                read_keys(&tx, &running);
            })
            .map_err(KeySourceError::Thread)?;

        *reader = Some(handle);
        Ok(rx)
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Release);
        let handle = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            // Blocks for at most one poll interval.
            if handle.join().is_err() {
                warn!("key reader thread panicked");
            }
        }
    }
}

impl Drop for TerminalKeySource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the reader thread.
fn read_keys(tx: &UnboundedSender<Keystroke>, running: &AtomicBool) {
    while running.load(Ordering::Acquire) {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!(error = %e, "terminal poll failed; keyboard input stopped");
                break;
            }
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.send(to_keystroke(key)).is_err() {
                    debug!("keystroke receiver dropped; stopping reader");
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "terminal read failed; keyboard input stopped");
                break;
            }
        }
    }
}

/// Reduces a crossterm key event to a [`Keystroke`].
pub fn to_keystroke(key: KeyEvent) -> Keystroke {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => Keystroke::Interrupt,
        KeyCode::Char(c) if !ctrl && !alt => Keystroke::Char(c),
        _ => Keystroke::Other,
    }
}

/// Keeps the terminal in raw mode while alive.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_character_is_char() {
        assert_eq!(
            to_keystroke(key(KeyCode::Char('n'), KeyModifiers::NONE)),
            Keystroke::Char('n')
        );
    }

    #[test]
    fn test_shifted_character_keeps_case() {
        assert_eq!(
            to_keystroke(key(KeyCode::Char('N'), KeyModifiers::SHIFT)),
            Keystroke::Char('N')
        );
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(
            to_keystroke(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Keystroke::Interrupt
        );
    }

    #[test]
    fn test_other_ctrl_and_alt_chords_are_other() {
        assert_eq!(
            to_keystroke(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Keystroke::Other
        );
        assert_eq!(
            to_keystroke(key(KeyCode::Char('c'), KeyModifiers::ALT)),
            Keystroke::Other
        );
    }

    #[test]
    fn test_non_character_keys_are_other() {
        for code in [KeyCode::Enter, KeyCode::Up, KeyCode::Esc, KeyCode::F(1)] {
            assert_eq!(to_keystroke(key(code, KeyModifiers::NONE)), Keystroke::Other);
        }
    }

    #[test]
    fn test_stop_without_start_is_a_no_op() {
        let source = TerminalKeySource::new();
        source.stop();
        source.stop();
    }
}
