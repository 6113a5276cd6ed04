//! Fan-out of chat messages to every subscribed sink.
//!
//! Each sink is a bounded queue. Broadcasting never waits on a slow reader:
//! a message offered to a full queue is dropped for that sink and counted in
//! `MsgsDrop`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::message::ChatMessage;
use crate::stats::Stats;

/// Messages a sink can hold before further broadcasts are dropped for it
pub const QUEUE_DEPTH: usize = 10;

pub type SinkId = u64;

#[derive(Debug)]
pub struct Broadcaster {
    sinks: Mutex<Vec<(SinkId, mpsc::Sender<ChatMessage>)>>,
    next_id: AtomicU64,
    stats: Arc<Stats>,
}

/// Receiving end of one subscription
#[derive(Debug)]
pub struct Sink {
    id: SinkId,
    rx: mpsc::Receiver<ChatMessage>,
}

impl Broadcaster {
    pub fn new(stats: Arc<Stats>) -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            stats,
        }
    }

    fn sinks(&self) -> MutexGuard<'_, Vec<(SinkId, mpsc::Sender<ChatMessage>)>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> Sink {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut sinks = self.sinks();
        sinks.push((id, tx));
        self.stats.set_clients(sinks.len());

        Sink { id, rx }
    }

    /// Remove a sink. Its queue closes once drained. Unknown ids are ignored,
    /// so calling this twice is harmless.
    pub fn unsubscribe(&self, id: SinkId) {
        let mut sinks = self.sinks();
        if let Some(pos) = sinks.iter().position(|(sink_id, _)| *sink_id == id) {
            sinks.remove(pos);
            self.stats.set_clients(sinks.len());
        }
    }

    pub fn broadcast(&self, msg: ChatMessage) {
        let sinks = self.sinks();
        for (id, tx) in sinks.iter() {
            match tx.try_send(msg.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::debug!("[wschat] Sink {} full, dropping message", id);
                    self.stats.add_dropped();
                }
                // Receiver gone; the owner unsubscribes on its way out
                Err(TrySendError::Closed(_)) => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sinks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> &Arc<Stats> {
        &self.stats
    }
}

impl Sink {
    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Next message, or `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<ChatMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ChatMessage> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(content: &str) -> ChatMessage {
        ChatMessage::now(content, "127.0.0.1:1")
    }

    #[test]
    fn test_subscribe_updates_clients() {
        let stats = Arc::new(Stats::new());
        let br = Broadcaster::new(stats.clone());

        let a = br.subscribe();
        let b = br.subscribe();
        assert_ne!(a.id(), b.id());
        assert_eq!(stats.snapshot().clients, 2);

        br.unsubscribe(a.id());
        assert_eq!(stats.snapshot().clients, 1);

        br.unsubscribe(a.id());
        assert_eq!(stats.snapshot().clients, 1);
        assert_eq!(br.len(), 1);
    }

    #[test]
    fn test_full_sink_drops_and_counts() {
        let stats = Arc::new(Stats::new());
        let br = Broadcaster::new(stats.clone());
        let mut slow = br.subscribe();

        for i in 0..QUEUE_DEPTH + 3 {
            br.broadcast(msg(&i.to_string()));
        }
        assert_eq!(stats.snapshot().msgs_drop, 3);

        let received: Vec<_> = std::iter::from_fn(|| slow.try_recv())
            .map(|m| m.content)
            .collect();
        let expected: Vec<_> = (0..QUEUE_DEPTH).map(|i| i.to_string()).collect();
        assert_eq!(received, expected);
    }

    #[test]
    fn test_drop_is_per_sink() {
        let stats = Arc::new(Stats::new());
        let br = Broadcaster::new(stats.clone());
        let _slow = br.subscribe();
        let mut fast = br.subscribe();

        for i in 0..QUEUE_DEPTH + 1 {
            br.broadcast(msg(&i.to_string()));
            assert!(fast.try_recv().is_some());
        }
        assert_eq!(stats.snapshot().msgs_drop, 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_closes_sink_after_drain() {
        let br = Broadcaster::new(Arc::new(Stats::new()));
        let mut sink = br.subscribe();

        br.broadcast(msg("last"));
        br.unsubscribe(sink.id());

        assert_eq!(sink.recv().await.map(|m| m.content), Some("last".into()));
        assert_eq!(sink.recv().await, None);
    }
}
