//! [`Connection`] implementation for one WebSocket session.
//!
//! The dispatcher must never wait on a slow client, so `send` does not touch
//! the socket.  It pushes the frame onto an unbounded per-session queue that
//! the session's writer task drains in order.

use std::net::SocketAddr;

use hub_core::{AtomicReadyState, Connection, ConnectionId, ReadyState, SendError, WirePayload};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Registry-facing handle of a WebSocket session.
#[derive(Debug)]
pub struct WsConnection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    state: AtomicReadyState,
    outbound: UnboundedSender<WsMessage>,
}

impl WsConnection {
    /// Creates an `Open` connection and the receiving end of its outbound
    /// queue, which the session's writer task must drain.
    pub fn new(peer_addr: SocketAddr) -> (Self, UnboundedReceiver<WsMessage>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let conn = Self {
            id: ConnectionId::new(),
            peer_addr,
            state: AtomicReadyState::new(ReadyState::Open),
            outbound,
        };
        (conn, rx)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Moves the connection to `state`.  Called by the session task only.
    pub fn set_state(&self, state: ReadyState) {
        self.state.store(state);
    }
}

impl Connection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn ready_state(&self) -> ReadyState {
        self.state.load()
    }

    fn send(&self, payload: &WirePayload) -> Result<(), SendError> {
        let state = self.state.load();
        if !state.is_open() {
            return Err(SendError::NotOpen { id: self.id, state });
        }
        self.outbound
            .send(WsMessage::Text(payload.as_str().to_owned()))
            .map_err(|_| SendError::Closed(self.id))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
