//! TLS acceptor construction from PEM files.
//!
//! The certificate chain and private key are read once at startup.  Any
//! problem here is fatal: a hub configured for `wss://` never falls back to
//! plain `ws://`.
//!
//! The crypto provider is passed explicitly (`ring`) instead of relying on a
//! process-wide default, so building an acceptor can never panic because no
//! default provider was installed.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio_rustls::rustls::{self, pki_types::CertificateDer, ServerConfig};
use tokio_rustls::TlsAcceptor;
use tracing::info;

/// Errors raised while loading TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    /// A PEM file could not be opened or read.
    #[error("cannot read TLS {what} from {path}: {source}")]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The certificate file contains no `CERTIFICATE` blocks.
    #[error("no certificates found in {0}")]
    NoCertificates(PathBuf),

    /// The key file contains no supported private key block.
    #[error("no private key found in {0}")]
    NoPrivateKey(PathBuf),

    /// rustls rejected the certificate/key pair.
    #[error("invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// Builds a [`TlsAcceptor`] from a PEM certificate chain and private key.
///
/// # Errors
///
/// See [`TlsError`]; every variant means the listener must not start.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, TlsError> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    info!(
        cert = %cert_path.display(),
        key = %key_path.display(),
        "TLS material loaded"
    );
    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let read_err = |source| TlsError::Read {
        what: "certificate",
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<rustls::pki_types::PrivateKeyDer<'static>, TlsError> {
    let read_err = |source| TlsError::Read {
        what: "private key",
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(read_err)?
        .ok_or_else(|| TlsError::NoPrivateKey(path.to_path_buf()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
