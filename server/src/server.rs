use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Json, Router};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::broadcast::Broadcaster;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::history::History;
use crate::listener::ChatListener;
use crate::session::run_session;
use crate::stats::{Stats, StatsSnapshot};

pub const CHAT_PATH: &str = "/chat";
pub const VARS_PATH: &str = "/debug/vars";

/// State shared by every connection
#[derive(Debug)]
pub struct ServerState {
    pub broadcaster: Broadcaster,
    pub history: Arc<History>,
    pub stats: Arc<Stats>,
    pub assets_dir: PathBuf,
}

/// Build the router: the chat socket, the counters and the assets directory.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let assets = ServeDir::new(&state.assets_dir);

    Router::new()
        .route(CHAT_PATH, get(chat_handler))
        .route(VARS_PATH, get(vars_handler))
        .fallback_service(assets)
        .with_state(state)
}

/// A bound chat server. Call [`ChatServer::run`] to start accepting.
pub struct ChatServer {
    listener: ChatListener,
    state: Arc<ServerState>,
}

impl ChatServer {
    /// Bind the listener and start the history log. Must be called inside a
    /// tokio runtime.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let tls = config.tls.as_ref().map(crate::tls::build_acceptor).transpose()?;

        let tcp = TcpListener::bind(&config.bind_addr).await?;
        let local_addr = tcp.local_addr()?;
        let listener = ChatListener::new(tcp, tls);

        let stats = Arc::new(Stats::new());
        let broadcaster = Broadcaster::new(stats.clone());
        let history = History::spawn(&broadcaster);

        let scheme = if listener.is_tls() { "https" } else { "http" };
        log::info!(
            "[wschat] Listening on {}://{} (assets: {})",
            scheme,
            local_addr,
            config.assets_dir.display()
        );

        Ok(Self {
            listener,
            state: Arc::new(ServerState {
                broadcaster,
                history,
                stats,
                assets_dir: config.assets_dir,
            }),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        use axum::serve::Listener;
        Ok(self.listener.local_addr()?)
    }

    pub fn stats(&self) -> Arc<Stats> {
        self.state.stats.clone()
    }

    pub fn history(&self) -> Arc<History> {
        self.state.history.clone()
    }

    /// Serve until the listener fails. Per-connection failures are logged.
    pub async fn run(self) -> Result<(), ServerError> {
        let router = build_router(self.state);
        use axum::serve::ListenerExt;
        axum::serve(
            self.listener.tap_io(|_| {}),
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }
}

async fn chat_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, peer, state))
}

async fn vars_handler(State(state): State<Arc<ServerState>>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}
