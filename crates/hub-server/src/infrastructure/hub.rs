//! Wiring of registry, dispatcher, and listener into one running hub.
//!
//! A [`Hub`] owns the registry and the dispatcher.  [`Hub::start`] binds a
//! [`TransportListener`] whose lifecycle callbacks feed that registry and
//! returns a [`RunningHub`] handle used to stop it.
//!
//! ```text
//! Hub::start ──► TransportListener::bind ──► tokio::spawn(run(token))
//!                      │
//!                      └── RegistryObserver ──► ConnectionRegistry ◄── BroadcastDispatcher
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use hub_core::{
    BroadcastDispatcher, ConnectionRegistry, LifecycleObserver, RegistryObserver, WireFormat,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::config::HubConfig;
use crate::infrastructure::ws_server::{TransportError, TransportListener};

/// Registry and dispatcher shared by the transport and a message source.
#[derive(Debug, Clone)]
pub struct Hub {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl Hub {
    /// Creates an empty hub whose dispatcher encodes frames as `format`.
    pub fn new(format: WireFormat) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Arc::new(BroadcastDispatcher::with_format(
            Arc::clone(&registry),
            format,
        ));
        Self {
            registry,
            dispatcher,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<BroadcastDispatcher> {
        &self.dispatcher
    }

    /// Binds the listener described by `config` and starts accepting
    /// clients in a background task.
    ///
    /// # Errors
    ///
    /// Any [`TransportError`]; the hub is not running in that case.
    pub async fn start(&self, config: &HubConfig) -> Result<RunningHub, TransportError> {
        let observer: Arc<dyn LifecycleObserver> =
            Arc::new(RegistryObserver::new(Arc::clone(&self.registry)));
        let listener =
            TransportListener::bind(&config.host, config.port, &config.security, observer).await?;

        let local_addr = listener.local_addr();
        let scheme = listener.scheme();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(listener.run(shutdown.clone()));

        info!("hub listening on {scheme}://{local_addr}");
        Ok(RunningHub {
            local_addr,
            scheme,
            shutdown,
            task,
        })
    }
}

/// Handle to a started listener.
#[derive(Debug)]
pub struct RunningHub {
    local_addr: SocketAddr,
    scheme: &'static str,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl RunningHub {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL a client would connect to, e.g. `ws://127.0.0.1:8765`.
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme, self.local_addr)
    }

    /// Stops accepting clients and waits until the port is released.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "listener task ended abnormally");
        }
        info!(addr = %self.local_addr, "hub stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
