use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

use crate::config::TlsFiles;
use crate::error::ServerError;

/// Build a TLS acceptor from PEM cert and key files.
pub fn build_acceptor(files: &TlsFiles) -> Result<TlsAcceptor, ServerError> {
    // Already installed is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cert_file = File::open(&files.cert).map_err(|e| {
        ServerError::Tls(format!("open TLS cert {}: {}", files.cert.display(), e))
    })?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(cert_file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("parse TLS cert: {}", e)))?;
    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "no certificates found in {}",
            files.cert.display()
        )));
    }

    let key_file = File::open(&files.key).map_err(|e| {
        ServerError::Tls(format!("open TLS key {}: {}", files.key.display(), e))
    })?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(key_file))
        .map_err(|e| ServerError::Tls(format!("parse TLS key: {}", e)))?
        .ok_or_else(|| ServerError::Tls("no private key found in PEM file".into()))?;

    let tls_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(format!("TLS config: {}", e)))?;

    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}
