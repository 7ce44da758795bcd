//! WebSocket listener: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Loading TLS material (when configured) and binding the TCP listener.
//! 2. Accepting incoming TCP connections until the shutdown token fires.
//! 3. Optionally completing a TLS handshake, then the WebSocket upgrade.
//! 4. Wrapping each session in a [`WsConnection`] and reporting its
//!    lifecycle (open, message, close, error) to a [`LifecycleObserver`].
//! 5. Running one writer task per session that drains the outbound queue.
//!
//! # Scalability
//!
//! Each session runs in its own Tokio task.  The accept loop never blocks on
//! a client: it accepts a connection and immediately spawns a task for it
//! before accepting the next one.  A slow client only grows its own outbound
//! queue.
//!
//! # Shutdown
//!
//! [`TransportListener::run`] consumes the listener.  When the cancellation
//! token fires, the loop exits and the listening socket is dropped, releasing
//! the port.  Sessions that are already open are left to end on their own.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use hub_core::{Connection, LifecycleObserver, ReadyState};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_rustls::TlsAcceptor;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    WebSocketStream,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::config::TransportSecurity;
use crate::infrastructure::tls::{load_tls_acceptor, TlsError};
use crate::infrastructure::ws_connection::WsConnection;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Startup-fatal listener errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TLS certificate or key could not be loaded.
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// The TCP listener could not be bound (port in use, no permission,
    /// unresolvable host).
    #[error("failed to bind WebSocket listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a session ended abnormally.  Handed to
/// [`LifecycleObserver::on_error`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing a WebSocket frame failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] WsError),

    /// The outbound writer task died without returning.
    #[error("writer task failed: {0}")]
    Writer(String),
}

/// How a session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Close handshake completed or the stream ended cleanly.
    Closed,
    Failed(SessionError),
}

// ── Listener ──────────────────────────────────────────────────────────────────

/// A bound WebSocket listener, plain or TLS.
pub struct TransportListener {
    listener: TcpListener,
    local_addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    scheme: &'static str,
    observer: Arc<dyn LifecycleObserver>,
}

impl std::fmt::Debug for TransportListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportListener")
            .field("local_addr", &self.local_addr)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl TransportListener {
    /// Loads TLS material (if `security` asks for it), then binds
    /// `host:port`.
    ///
    /// TLS is loaded first so a bad certificate never leaves a port bound.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Tls`] if the certificate or key cannot be loaded.
    /// - [`TransportError::Bind`] if the address cannot be bound.
    pub async fn bind(
        host: &str,
        port: u16,
        security: &TransportSecurity,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Result<Self, TransportError> {
        let tls = match security {
            TransportSecurity::Plain => None,
            TransportSecurity::Tls {
                cert_path,
                key_path,
            } => Some(load_tls_acceptor(cert_path, key_path)?),
        };

        let bind_err = |source| TransportError::Bind {
            addr: format!("{host}:{port}"),
            source,
        };
        let listener = TcpListener::bind((host, port)).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        info!(
            addr = %local_addr,
            scheme = security.scheme(),
            "WebSocket listener bound"
        );

        Ok(Self {
            listener,
            local_addr,
            tls,
            scheme: security.scheme(),
            observer,
        })
    }

    /// The address actually bound.  Differs from the requested one when
    /// port `0` was used.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `"ws"` or `"wss"`.
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Runs the accept loop until `shutdown` is cancelled.
    ///
    /// Each accepted connection is handed to its own task.  Transient accept
    /// errors (for example, too many open file descriptors) are logged and
    /// the loop continues.  The listening socket is dropped when this
    /// function returns.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self {
            listener,
            local_addr,
            tls,
            observer,
            ..
        } = self;

        loop {
            tokio::select! {
                // Prefer shutdown over a pending accept.
                biased;
                _ = shutdown.cancelled() => {
                    info!(addr = %local_addr, "shutdown requested; stopping accept loop");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        debug!(peer = %peer_addr, "accepted TCP connection");
                        let tls = tls.clone();
                        let observer = Arc::clone(&observer);
                        tokio::spawn(handle_connection(stream, peer_addr, tls, observer));
                    }
                    Err(e) => error!(error = %e, "accept error"),
                },
            }
        }

        drop(listener);
        info!(addr = %local_addr, "WebSocket listener closed");
    }
}

// ── Per-session handling ──────────────────────────────────────────────────────

/// Entry point of each per-connection task: optional TLS, then the session.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    observer: Arc<dyn LifecycleObserver>,
) {
    match tls {
        None => run_session(stream, peer_addr, observer).await,
        Some(acceptor) => match acceptor.accept(stream).await {
            Ok(tls_stream) => run_session(tls_stream, peer_addr, observer).await,
            Err(e) => warn!(peer = %peer_addr, error = %e, "TLS handshake failed"),
        },
    }
}

/// Runs the lifecycle of one WebSocket session over any byte stream.
///
/// A connection whose upgrade handshake fails is never registered.  Once
/// registered, exactly one of `on_close` / `on_error` is reported when the
/// session ends, after the connection has been marked `Closed`.
async fn run_session<S>(stream: S, peer_addr: SocketAddr, observer: Arc<dyn LifecycleObserver>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    // `accept_async` reads the HTTP Upgrade request and answers with
    // "101 Switching Protocols".
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(peer = %peer_addr, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let (sink, source) = ws_stream.split();
    let (conn, outbound_rx) = WsConnection::new(peer_addr);
    let conn = Arc::new(conn);
    let id = conn.id();

    debug!(connection = %id, peer = %peer_addr, "WebSocket session established");
    observer.on_open(Arc::clone(&conn) as Arc<dyn Connection>);

    let mut writer = tokio::spawn(write_outbound(sink, outbound_rx));

    let end = tokio::select! {
        end = read_inbound(source, &conn, observer.as_ref()) => end,
        joined = &mut writer => match joined {
            // The queue only closes when every sender is gone, which cannot
            // happen while `conn` is alive; treat it as an orderly end.
            Ok(Ok(())) => SessionEnd::Closed,
            Ok(Err(e)) => SessionEnd::Failed(SessionError::WebSocket(e)),
            Err(e) => SessionEnd::Failed(SessionError::Writer(e.to_string())),
        },
    };

    conn.set_state(ReadyState::Closed);
    writer.abort();

    match end {
        SessionEnd::Closed => observer.on_close(id),
        SessionEnd::Failed(err) => observer.on_error(id, &err),
    }
}

/// Reads frames until the client closes or the stream fails.
async fn read_inbound<S>(
    mut source: SplitStream<WebSocketStream<S>>,
    conn: &WsConnection,
    observer: &dyn LifecycleObserver,
) -> SessionEnd
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let id = conn.id();
    loop {
        match source.next().await {
            Some(Ok(WsMessage::Text(text))) => observer.on_message(id, &text),
            Some(Ok(WsMessage::Close(frame))) => {
                // Keep polling: tungstenite flushes the close reply on the
                // next read and then ends the stream.
                debug!(connection = %id, ?frame, "client sent close frame");
                conn.set_state(ReadyState::Closing);
            }
            Some(Ok(WsMessage::Binary(data))) => {
                debug!(connection = %id, len = data.len(), "ignoring binary frame");
            }
            Some(Ok(other)) => {
                debug!(connection = %id, frame = ?other, "ignoring control frame");
            }
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                return SessionEnd::Closed;
            }
            Some(Err(e)) => return SessionEnd::Failed(SessionError::WebSocket(e)),
        }
    }
}

/// Drains the outbound queue into the socket, preserving order.
async fn write_outbound<S>(
    mut sink: SplitSink<WebSocketStream<S>, WsMessage>,
    mut outbound: UnboundedReceiver<WsMessage>,
) -> Result<(), WsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(frame) = outbound.recv().await {
        sink.send(frame).await?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
