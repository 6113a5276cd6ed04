//! One chat session per WebSocket client.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::broadcast::Sink;
use crate::message::ChatMessage;
use crate::server::ServerState;
use crate::stats::Stats;

/// Run a session until the client leaves or a send fails.
///
/// Inbound text frames are stamped and broadcast. Outbound, the client first
/// gets the history, then everything arriving on its sink.
pub async fn run_session(ws: WebSocket, peer: SocketAddr, state: Arc<ServerState>) {
    log::info!("[wschat] Connection opened: {}", peer);

    let mut sink = state.broadcaster.subscribe();
    let sink_id = sink.id();
    let (mut write, mut read) = ws.split();

    let reader_state = state.clone();
    let user = peer.to_string();
    let reader = tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    reader_state.stats.add_in();
                    reader_state
                        .broadcaster
                        .broadcast(ChatMessage::now(text.as_str(), user.as_str()));
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    log::debug!("[wschat] Read error from {}: {}", user, e);
                    break;
                }
            }
        }
        // Closes the sink, which ends the writer below
        reader_state.broadcaster.unsubscribe(sink_id);
    });

    let backlog = state.history.snapshot();
    match deliver(&mut write, backlog, &mut sink, &state.stats).await {
        Ok(()) => {
            let _ = write.close().await;
        }
        Err(e) => log::debug!("[wschat] Send to {} failed: {}", peer, e),
    }

    state.broadcaster.unsubscribe(sink_id);
    reader.abort();
    log::info!("[wschat] Connection closed: {}", peer);
}

async fn deliver<W>(
    write: &mut W,
    backlog: Vec<ChatMessage>,
    sink: &mut Sink,
    stats: &Stats,
) -> Result<(), axum::Error>
where
    W: futures_util::Sink<Message, Error = axum::Error> + Unpin,
{
    for msg in backlog {
        write.send(Message::Text(msg.to_string().into())).await?;
        stats.add_out();
    }
    while let Some(msg) = sink.recv().await {
        write.send(Message::Text(msg.to_string().into())).await?;
        stats.add_out();
    }
    Ok(())
}
