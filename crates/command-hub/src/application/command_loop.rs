//! The keystroke → broadcast loop.
//!
//! Keystrokes are processed one at a time, in the order the key source
//! delivered them.  Each recognised key produces exactly one broadcast before
//! the next keystroke is looked at.

use hub_core::BroadcastDispatcher;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::application::key_commands::{interpret, KeyOutcome};
use crate::infrastructure::key_source::Keystroke;

/// Why [`run_command_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The operator pressed the interrupt key.
    Interrupted,
    /// The key source closed its channel (stopped, or the terminal failed).
    InputClosed,
}

/// Broadcasts one command per recognised keystroke until the operator
/// interrupts or the key source goes away.
pub async fn run_command_loop(
    keys: &mut UnboundedReceiver<Keystroke>,
    dispatcher: &BroadcastDispatcher,
) -> LoopExit {
    while let Some(key) = keys.recv().await {
        match interpret(key) {
            KeyOutcome::Emit(message) => {
                info!(
                    command = %message.command,
                    timestamp = message.timestamp,
                    "Sending UX command"
                );
                let report = dispatcher.broadcast(&message);
                debug!(delivered = report.delivered, failed = report.failed, "command sent");
            }
            KeyOutcome::Ignore => debug!(?key, "ignoring key"),
            KeyOutcome::Shutdown => return LoopExit::Interrupted,
        }
    }
    LoopExit::InputClosed
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::mock::MockConnection;
    use hub_core::{Connection, ConnectionRegistry};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn dispatcher_with(conn: &Arc<MockConnection>) -> BroadcastDispatcher {
        let registry = Arc::new(ConnectionRegistry::new());
        registry.register(Arc::clone(conn) as Arc<dyn Connection>);
        BroadcastDispatcher::new(registry)
    }

    #[tokio::test]
    async fn test_each_command_key_sends_one_message() {
        // Arrange
        let conn = Arc::new(MockConnection::open());
        let dispatcher = dispatcher_with(&conn);
        let (tx, mut rx) = mpsc::unbounded_channel();
        for c in ['c', 'x', 'n'] {
            tx.send(Keystroke::Char(c)).expect("receiver alive");
        }
        drop(tx);

        // Act
        let exit = run_command_loop(&mut rx, &dispatcher).await;

        // Assert
        assert_eq!(exit, LoopExit::InputClosed);
        let commands: Vec<String> = conn
            .received_text()
            .iter()
            .map(|text| {
                let value: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
                value["command"].as_str().expect("command field").to_string()
            })
            .collect();
        assert_eq!(commands, vec!["ux_capture_image", "ux_next"]);
    }

    #[tokio::test]
    async fn test_interrupt_stops_before_later_keys() {
        // Arrange
        let conn = Arc::new(MockConnection::open());
        let dispatcher = dispatcher_with(&conn);
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Keystroke::Char('p')).expect("receiver alive");
        tx.send(Keystroke::Interrupt).expect("receiver alive");
        tx.send(Keystroke::Char('m')).expect("receiver alive");

        // Act
        let exit = run_command_loop(&mut rx, &dispatcher).await;

        // Assert
        assert_eq!(exit, LoopExit::Interrupted);
        assert_eq!(conn.received().len(), 1);
        // The key after the interrupt is still queued, untouched.
        assert_eq!(rx.try_recv().ok(), Some(Keystroke::Char('m')));
    }

    #[tokio::test]
    async fn test_no_clients_means_no_serialization() {
        let dispatcher = BroadcastDispatcher::new(Arc::new(ConnectionRegistry::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Keystroke::Char('d')).expect("receiver alive");
        drop(tx);

        run_command_loop(&mut rx, &dispatcher).await;

        assert_eq!(dispatcher.serialization_count(), 0);
    }
}
