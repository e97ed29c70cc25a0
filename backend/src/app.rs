// Application state and shared feed statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;

pub fn monotonic_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[derive(Clone)]
pub struct AppState {
    pub tx: broadcast::Sender<String>,
    pub stats: Arc<FeedStats>,
    pub start_instant: Instant,
}

impl AppState {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<String>(capacity);
        Self {
            tx,
            stats: Arc::new(FeedStats::default()),
            start_instant: Instant::now(),
        }
    }
}

/// Counters updated by the receive loop and read by the status route.
#[derive(Debug, Default)]
pub struct FeedStats {
    frames_received: AtomicU64,
    frames_discarded: AtomicU64,
    messages_published: AtomicU64,
    // Monotonic ms of the last frame, offset by one so zero means "never".
    last_frame_ms: AtomicU64,
}

impl FeedStats {
    pub fn record_frame(&self, start: Instant) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.last_frame_ms
            .store(monotonic_ms(start).saturating_add(1), Ordering::Relaxed);
    }

    pub fn record_discard(&self) {
        self.frames_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish(&self) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FeedStatsSnapshot {
        let last = self.last_frame_ms.load(Ordering::Relaxed);
        FeedStatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_discarded: self.frames_discarded.load(Ordering::Relaxed),
            messages_published: self.messages_published.load(Ordering::Relaxed),
            last_frame_ms: last.checked_sub(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedStatsSnapshot {
    pub frames_received: u64,
    pub frames_discarded: u64,
    pub messages_published: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame_ms: Option<u64>,
}
