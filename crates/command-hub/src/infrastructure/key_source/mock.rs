//! Mock key source for unit testing.
//!
//! Allows tests to inject synthetic [`Keystroke`]s without a terminal.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{KeySource, KeySourceError, Keystroke};

/// A mock implementation of [`KeySource`] that allows tests to inject keys.
#[derive(Debug, Clone, Default)]
pub struct MockKeySource {
    sender: Arc<Mutex<Option<UnboundedSender<Keystroke>>>>,
}

impl MockKeySource {
    /// Creates a new, stopped mock key source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a synthetic keystroke, as if typed by the operator.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been called.
    pub fn inject_key(&self, key: Keystroke) {
        let guard = self.sender.lock().expect("lock poisoned");
        match *guard {
            Some(ref sender) => sender
                .send(key)
                .expect("receiver has been dropped; call start() first"),
            None => panic!("MockKeySource::inject_key called before start()"),
        }
    }

    /// Injects every character of `keys` as a [`Keystroke::Char`].
    pub fn type_str(&self, keys: &str) {
        for c in keys.chars() {
            self.inject_key(Keystroke::Char(c));
        }
    }

    /// Returns `true` between `start()` and `stop()`.
    pub fn is_running(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }
}

impl KeySource for MockKeySource {
    fn start(&self) -> Result<UnboundedReceiver<Keystroke>, KeySourceError> {
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(KeySourceError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
