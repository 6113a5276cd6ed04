//! # wschat server
//!
//! A broadcast chat server for the `bevy_wschat` client. Every text frame a
//! client sends on `/chat` is stamped as `HH:MM:SS <addr> text` and fanned
//! out to all connected clients; newcomers first receive the last
//! [`HISTORY_LEN`] messages. The same listener serves a static assets
//! directory and a JSON counters document at `/debug/vars`, optionally over
//! TLS.
//!
//! ```rust,ignore
//! let config = ServerArgs::parse().into_config()?;
//! ChatServer::bind(config).await?.run().await?;
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod history;
pub mod listener;
pub mod message;
pub mod server;
pub mod session;
pub mod stats;
pub mod tls;

pub use broadcast::{Broadcaster, QUEUE_DEPTH, Sink};
pub use config::{ServerArgs, ServerConfig, TlsFiles};
pub use error::ServerError;
pub use history::{HISTORY_LEN, History};
pub use listener::ChatListener;
pub use message::ChatMessage;
pub use server::{CHAT_PATH, ChatServer, ServerState, VARS_PATH, build_router};
pub use stats::{Stats, StatsSnapshot};
