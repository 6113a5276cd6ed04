//! Process-wide counters, published at `/debug/vars`.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Stats {
    clients: AtomicU64,
    msgs_drop: AtomicU64,
    msgs_in: AtomicU64,
    msgs_out: AtomicU64,
}

/// Point-in-time copy of [`Stats`]. Field names match the published keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    pub clients: u64,
    pub msgs_drop: u64,
    pub msgs_in: u64,
    pub msgs_out: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clients(&self, count: usize) {
        self.clients.store(count as u64, Ordering::Relaxed);
    }

    pub fn add_dropped(&self) {
        self.msgs_drop.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_in(&self) {
        self.msgs_in.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_out(&self) {
        self.msgs_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            clients: self.clients.load(Ordering::Relaxed),
            msgs_drop: self.msgs_drop.load(Ordering::Relaxed),
            msgs_in: self.msgs_in.load(Ordering::Relaxed),
            msgs_out: self.msgs_out.load(Ordering::Relaxed),
        }
    }
}
