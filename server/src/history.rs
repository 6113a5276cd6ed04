use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::broadcast::Broadcaster;
use crate::message::ChatMessage;

/// Messages replayed to a newly connected client
pub const HISTORY_LEN: usize = 30;

/// Replay log of the most recent broadcasts, oldest first
#[derive(Debug, Default)]
pub struct History {
    msgs: Mutex<VecDeque<ChatMessage>>,
}

impl History {
    pub fn new() -> Self {
        Self {
            msgs: Mutex::new(VecDeque::with_capacity(HISTORY_LEN)),
        }
    }

    /// Subscribe a fresh history to `broadcaster` and keep it fed from a
    /// background task. Must be called inside a tokio runtime.
    pub fn spawn(broadcaster: &Broadcaster) -> Arc<History> {
        let history = Arc::new(History::new());
        let mut sink = broadcaster.subscribe();

        let log = history.clone();
        tokio::spawn(async move {
            while let Some(msg) = sink.recv().await {
                log.record(msg);
            }
            log::debug!("[wschat] History sink closed");
        });

        history
    }

    fn msgs(&self) -> MutexGuard<'_, VecDeque<ChatMessage>> {
        self.msgs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, msg: ChatMessage) {
        let mut msgs = self.msgs();
        if msgs.len() == HISTORY_LEN {
            msgs.pop_front();
        }
        msgs.push_back(msg);
    }

    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.msgs().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.msgs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
