//! Chat connection
//!
//! Owns the single WebSocket of a client. The socket runs on its own thread
//! with a private tokio runtime; events flow back through a
//! [`ChatEventReceiver`] that the UI drains once per frame.

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use url::Url;

use crate::chat::event::{CLOSE_ABNORMAL, CLOSE_NO_STATUS};
use crate::chat::{ChatError, ChatEvent, ChatEventReceiver, ChatEventSender, chat_event_channel};

/// Source of the ids used to tag log lines
static NEXT_CONNECTION_ID: AtomicU32 = AtomicU32::new(1);

/// WebSocket ready states (matching browser API)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    fn from_u32(value: u32) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

/// Work queued for the socket's write half
#[derive(Debug)]
enum Outgoing {
    Text(String),
    Close,
}

/// Shared view of the connection state
#[derive(Clone, Debug)]
struct SharedState(Arc<AtomicU32>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(AtomicU32::new(ReadyState::Connecting as u32)))
    }

    fn get(&self) -> ReadyState {
        ReadyState::from_u32(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: ReadyState) {
        self.0.store(state as u32, Ordering::SeqCst);
    }
}

/// Handle to the client's one connection
#[derive(Debug)]
pub struct ChatConnection {
    id: u32,
    url: Url,
    sender: mpsc::UnboundedSender<Outgoing>,
    state: SharedState,
}

impl ChatConnection {
    /// Open a connection to `url`. Returns immediately; progress arrives as
    /// events. There is no retry: a failure yields `Error` then `Close`.
    pub fn connect(url: Url) -> (ChatConnection, ChatEventReceiver) {
        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel::<Outgoing>();
        let (events, receiver) = chat_event_channel();
        let state = SharedState::new();

        let connection = ChatConnection {
            id,
            url: url.clone(),
            sender: tx,
            state: state.clone(),
        };

        let thread_events = events.clone();
        let thread_state = state.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("wschat-socket-{}", id))
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("[WebSocket {}] Failed to create runtime: {}", id, e);
                        fail(id, &thread_state, &thread_events, e.to_string(), "Runtime failed");
                        return;
                    }
                };

                rt.block_on(run_socket(id, url, rx, thread_state, thread_events));
            });

        if let Err(e) = spawned {
            log::error!("[WebSocket {}] Failed to spawn socket thread: {}", id, e);
            fail(id, &state, &events, e.to_string(), "Thread spawn failed");
        }

        (connection, receiver)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.get()
    }

    /// Queue a text frame, verbatim.
    pub fn send(&self, data: String) -> Result<(), ChatError> {
        if self.state.get() != ReadyState::Open {
            return Err(ChatError::NotOpen);
        }
        log::debug!("[WebSocket {}] Queueing {} bytes", self.id, data.len());
        self.sender
            .send(Outgoing::Text(data))
            .map_err(|_| ChatError::ConnectionGone)
    }

    /// Start a normal closure. A no-op once closing or closed.
    pub fn close(&self) {
        match self.state.get() {
            ReadyState::Closing | ReadyState::Closed => {}
            _ => {
                self.state.set(ReadyState::Closing);
                log::info!("[WebSocket {}] Closing", self.id);
                let _ = self.sender.send(Outgoing::Close);
            }
        }
    }
}

/// Report a failure the way a browser does: `error`, then an abnormal `close`.
/// For use before the socket runtime is running.
fn fail(id: u32, state: &SharedState, events: &ChatEventSender, message: String, reason: &str) {
    log::debug!("[WebSocket {}] Failing connection: {}", id, reason);
    state.set(ReadyState::Closed);
    events.emit(ChatEvent::Error { data: message });
    events.emit(ChatEvent::Close {
        code: CLOSE_ABNORMAL,
        reason: reason.to_string(),
    });
}

/// [`fail`] from inside the socket runtime.
async fn fail_socket(
    id: u32,
    state: &SharedState,
    events: &ChatEventSender,
    message: String,
    reason: &str,
) {
    log::debug!("[WebSocket {}] Failing connection: {}", id, reason);
    state.set(ReadyState::Closed);
    events.deliver(ChatEvent::Error { data: message }).await;
    events
        .deliver(ChatEvent::Close {
            code: CLOSE_ABNORMAL,
            reason: reason.to_string(),
        })
        .await;
}

async fn run_socket(
    id: u32,
    url: Url,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    state: SharedState,
    events: ChatEventSender,
) {
    log::info!("[WebSocket {}] Connecting to {}", id, url);

    let Some(host) = url.host_str() else {
        log::error!("[WebSocket {}] No host in {}", id, url);
        fail_socket(
            id,
            &state,
            &events,
            format!("Invalid target {}: missing host", url),
            "Invalid target",
        )
        .await;
        return;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = url
        .port_or_known_default()
        .unwrap_or(if url.scheme() == "wss" { 443 } else { 80 });

    log::info!("[WebSocket {}] Connecting TCP to {}:{}", id, host, port);

    let tcp_stream = match TcpStream::connect((host, port)).await {
        Ok(stream) => {
            log::info!("[WebSocket {}] TCP connected", id);
            stream
        }
        Err(e) => {
            log::error!("[WebSocket {}] TCP connection failed: {}", id, e);
            fail_socket(
                id,
                &state,
                &events,
                format!("TCP connection failed: {}", e),
                "Connection failed",
            )
            .await;
            return;
        }
    };

    let request = match url.as_str().into_client_request() {
        Ok(req) => req,
        Err(e) => {
            log::error!("[WebSocket {}] Failed to create request: {}", id, e);
            fail_socket(
                id,
                &state,
                &events,
                format!("Invalid request: {}", e),
                "Invalid request",
            )
            .await;
            return;
        }
    };

    if url.scheme() == "wss" {
        // Already installed is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    log::info!("[WebSocket {}] Performing WebSocket handshake", id);

    let ws_stream = match tokio_tungstenite::client_async_tls(request, tcp_stream).await {
        Ok((stream, response)) => {
            log::info!(
                "[WebSocket {}] Connected successfully (status: {})",
                id,
                response.status()
            );
            stream
        }
        Err(e) => {
            log::error!("[WebSocket {}] Handshake failed: {}", id, e);
            fail_socket(
                id,
                &state,
                &events,
                format!("Handshake failed: {}", e),
                "Handshake failed",
            )
            .await;
            return;
        }
    };

    // A close requested while connecting wins over the handshake
    if state.get() == ReadyState::Closing {
        log::info!("[WebSocket {}] Closed before open", id);
    } else {
        state.set(ReadyState::Open);
        events.deliver(ChatEvent::Open).await;
    }

    let (mut write, mut read) = ws_stream.split();

    let send_state = state.clone();
    let send_task = tokio::spawn(async move {
        if send_state.get() == ReadyState::Closing {
            let _ = write.send(Message::Close(None)).await;
            return;
        }
        while let Some(item) = outgoing.recv().await {
            match item {
                Outgoing::Text(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        log::error!("[WebSocket {}] Send error: {}", id, e);
                        break;
                    }
                }
                Outgoing::Close => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        log::warn!("[WebSocket {}] Failed to send close frame: {}", id, e);
                    }
                    break;
                }
            }
        }
    });

    let mut closed = false;
    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                log::debug!(
                    "[WebSocket {}] Received: {}",
                    id,
                    text.as_str().chars().take(100).collect::<String>()
                );
                events
                    .deliver(ChatEvent::Message {
                        data: text.as_str().to_owned(),
                    })
                    .await;
            }
            Ok(Message::Binary(data)) => {
                log::debug!("[WebSocket {}] Ignoring binary frame ({} bytes)", id, data.len());
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {}
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (f.code.into(), f.reason.to_string()))
                    .unwrap_or((CLOSE_NO_STATUS, String::new()));
                log::info!("[WebSocket {}] Received close: {} {}", id, code, reason);
                state.set(ReadyState::Closed);
                events.deliver(ChatEvent::Close { code, reason }).await;
                closed = true;
                break;
            }
            Err(e) => {
                log::error!("[WebSocket {}] Read error: {}", id, e);
                fail_socket(id, &state, &events, e.to_string(), "Connection error").await;
                closed = true;
                break;
            }
        }
    }

    if !closed {
        log::info!("[WebSocket {}] Stream ended without close frame", id);
        state.set(ReadyState::Closed);
        events
            .deliver(ChatEvent::Close {
                code: CLOSE_ABNORMAL,
                reason: String::new(),
            })
            .await;
    }

    send_task.abort();
    log::info!("[WebSocket {}] Connection ended", id);
}
