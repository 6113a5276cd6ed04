//! Accept loop handed to `axum::serve`, with optional TLS.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// Longest a client may take to finish the TLS handshake
const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

pub trait ChatStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> ChatStream for T {}

/// TCP listener that wraps every accepted connection in TLS when configured
pub struct ChatListener {
    tcp: TcpListener,
    tls: Option<TlsAcceptor>,
}

impl ChatListener {
    pub fn new(tcp: TcpListener, tls: Option<TlsAcceptor>) -> Self {
        Self { tcp, tls }
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }
}

impl axum::serve::Listener for ChatListener {
    type Io = Box<dyn ChatStream>;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        loop {
            let (tcp_stream, peer) = match self.tcp.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::warn!("[wschat] Accept error: {}", e);
                    // Usually out of file descriptors; give it a moment
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };

            let Some(acceptor) = &self.tls else {
                return (Box::new(tcp_stream), peer);
            };

            match tokio::time::timeout(TLS_HANDSHAKE_TIMEOUT, acceptor.accept(tcp_stream)).await {
                Ok(Ok(tls_stream)) => return (Box::new(tls_stream), peer),
                Ok(Err(e)) => log::warn!("[wschat] TLS handshake failed from {}: {}", peer, e),
                Err(_) => log::warn!("[wschat] TLS handshake timed out from {}", peer),
            }
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        self.tcp.local_addr()
    }
}
