//! Connection events pushed from the socket thread to the UI thread.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::time::Duration;

/// Capacity of the event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Pause between delivery attempts while the UI has not drained the channel
const FULL_CHANNEL_BACKOFF: Duration = Duration::from_millis(5);

/// Close code reported when the connection ends without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Close code of a normal closure.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close code reported for a close frame that carried no status.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Events mirroring the browser WebSocket callbacks
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    /// Handshake finished (`onopen`)
    Open,
    /// A text frame arrived (`onmessage`)
    Message { data: String },
    /// The transport reported a failure (`onerror`)
    Error { data: String },
    /// The connection is gone (`onclose`)
    Close { code: u16, reason: String },
}

/// Sending half, owned by the connection thread
#[derive(Clone, Debug)]
pub struct ChatEventSender {
    tx: SyncSender<ChatEvent>,
}

impl ChatEventSender {
    /// Push an event towards the UI without blocking. Dropped with a warning
    /// if the channel is full or nobody listens.
    pub fn emit(&self, event: ChatEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::warn!("Dropping chat event, channel is full: {:?}", event);
            }
            Err(TrySendError::Disconnected(event)) => {
                log::warn!("Dropping chat event, receiver is gone: {:?}", event);
            }
        }
    }

    /// Push an event from inside the socket's runtime. While the channel is
    /// full this waits asynchronously, so other tasks on the runtime keep
    /// running and no event is lost.
    pub async fn deliver(&self, mut event: ChatEvent) {
        loop {
            match self.tx.try_send(event) {
                Ok(()) => return,
                Err(TrySendError::Full(pending)) => {
                    event = pending;
                    tokio::time::sleep(FULL_CHANNEL_BACKOFF).await;
                }
                Err(TrySendError::Disconnected(event)) => {
                    log::warn!("Dropping chat event, receiver is gone: {:?}", event);
                    return;
                }
            }
        }
    }
}

/// Thread-safe receiver wrapper for the UI side
#[derive(Debug)]
pub struct ChatEventReceiver {
    rx: Mutex<Receiver<ChatEvent>>,
}

impl ChatEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<ChatEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block for up to `timeout` waiting for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChatEvent> {
        let rx = self.rx.lock().ok()?;
        match rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Create a connected sender/receiver pair.
pub fn chat_event_channel() -> (ChatEventSender, ChatEventReceiver) {
    let (tx, rx) = mpsc::sync_channel(EVENT_CHANNEL_CAPACITY);
    (
        ChatEventSender { tx },
        ChatEventReceiver { rx: Mutex::new(rx) },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (sender, receiver) = chat_event_channel();
        sender.emit(ChatEvent::Open);
        sender.emit(ChatEvent::Message { data: "hi".into() });

        assert_eq!(receiver.try_recv(), Some(ChatEvent::Open));
        assert_eq!(
            receiver.try_recv(),
            Some(ChatEvent::Message { data: "hi".into() })
        );
        assert_eq!(receiver.try_recv(), None);
    }

    fn message(i: usize) -> ChatEvent {
        ChatEvent::Message {
            data: i.to_string(),
        }
    }

    #[test]
    fn test_emit_on_full_channel_drops_instead_of_blocking() {
        let (sender, receiver) = chat_event_channel();
        for i in 0..EVENT_CHANNEL_CAPACITY {
            sender.emit(message(i));
        }
        sender.emit(ChatEvent::Open);

        let received: Vec<_> = std::iter::from_fn(|| receiver.try_recv()).collect();
        assert_eq!(received.len(), EVENT_CHANNEL_CAPACITY);
        assert!(!received.contains(&ChatEvent::Open));
    }

    #[tokio::test]
    async fn test_deliver_waits_for_room_without_stalling_runtime() {
        let (sender, receiver) = chat_event_channel();
        for i in 0..EVENT_CHANNEL_CAPACITY {
            sender.emit(message(i));
        }

        let close = ChatEvent::Close {
            code: CLOSE_NORMAL,
            reason: String::new(),
        };
        let pending = tokio::spawn({
            let sender = sender.clone();
            let close = close.clone();
            async move { sender.deliver(close).await }
        });

        // This test shares the runtime with the pending delivery
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        assert_eq!(receiver.try_recv(), Some(message(0)));
        pending.await.unwrap();

        let rest: Vec<_> = std::iter::from_fn(|| receiver.try_recv()).collect();
        assert_eq!(rest.len(), EVENT_CHANNEL_CAPACITY);
        assert_eq!(rest.last(), Some(&close));
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_harmless() {
        let (sender, receiver) = chat_event_channel();
        drop(receiver);
        sender.emit(ChatEvent::Open);
    }
}
