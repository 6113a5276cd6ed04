//! Command-line configuration for `wschat-server`.

use clap::Parser;
use std::path::PathBuf;

use crate::error::ServerError;

#[derive(Debug, Clone, Parser)]
#[command(name = "wschat-server", version, about = "Broadcast WebSocket chat server")]
pub struct ServerArgs {
    /// The address to bind to, e.g. ":8080" or "127.0.0.1:9000"
    #[arg(long, default_value = ":8080")]
    pub address: String,

    /// The static assets directory
    #[arg(long, default_value = "assets")]
    pub assets_dir: PathBuf,

    /// PEM certificate chain; requires --tls-key
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key; requires --tls-cert
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub assets_dir: PathBuf,
    pub tls: Option<TlsFiles>,
}

impl ServerArgs {
    pub fn into_config(self) -> Result<ServerConfig, ServerError> {
        let bind_addr = match self.address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.address,
        };

        if !self.assets_dir.is_dir() {
            return Err(ServerError::Config(format!(
                "--assets-dir {} is not a directory",
                self.assets_dir.display()
            )));
        }

        let tls = match (self.tls_cert, self.tls_key) {
            (None, None) => None,
            (Some(cert), Some(key)) => Some(TlsFiles { cert, key }),
            _ => {
                return Err(ServerError::Config(
                    "--tls-cert and --tls-key must both be provided".into(),
                ));
            }
        };

        Ok(ServerConfig {
            bind_addr,
            assets_dir: self.assets_dir,
            tls,
        })
    }
}
