use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Counters for one node's loop.
///
/// Dropped frames are counted here and nowhere else; counting never changes
/// how a frame is handled.
#[derive(Default)]
pub struct NodeStatus {
    frames_read: AtomicU64,
    dispatched: AtomicU64,
    dropped_decode: AtomicU64,
    dropped_addressing: AtomicU64,
    read_errors: AtomicU64,
    dispatch_failures: AtomicU64,
    last_dispatch: RwLock<Option<DateTime<Utc>>>,
}

/// Point-in-time copy of [`NodeStatus`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatusSnapshot {
    pub frames_read: u64,
    pub dispatched: u64,
    pub dropped_decode: u64,
    pub dropped_addressing: u64,
    pub read_errors: u64,
    pub dispatch_failures: u64,
    pub last_dispatch: Option<DateTime<Utc>>,
}

impl NodeStatusSnapshot {
    /// Frames and synthetic updates that never reached the store
    pub fn dropped(&self) -> u64 {
        self.dropped_decode + self.dropped_addressing + self.dispatch_failures
    }
}

impl NodeStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&self) {
        self.frames_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_dispatch.write() {
            *last = Some(Utc::now());
        }
    }

    pub fn record_decode_drop(&self) {
        self.dropped_decode.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_addressing_drop(&self) {
        self.dropped_addressing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> NodeStatusSnapshot {
        NodeStatusSnapshot {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            dropped_decode: self.dropped_decode.load(Ordering::Relaxed),
            dropped_addressing: self.dropped_addressing.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
            last_dispatch: self.last_dispatch.read().ok().and_then(|last| *last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot() {
        let status = NodeStatus::new();
        let snapshot = status.snapshot();
        assert_eq!(snapshot.frames_read, 0);
        assert_eq!(snapshot.dropped(), 0);
        assert!(snapshot.last_dispatch.is_none());
    }

    #[test]
    fn test_counters() {
        let status = NodeStatus::new();
        status.record_frame();
        status.record_frame();
        status.record_frame();
        status.record_dispatch();
        status.record_decode_drop();
        status.record_addressing_drop();
        status.record_read_error();

        let snapshot = status.snapshot();
        assert_eq!(snapshot.frames_read, 3);
        assert_eq!(snapshot.dispatched, 1);
        assert_eq!(snapshot.dropped(), 2);
        assert_eq!(snapshot.read_errors, 1);
        assert!(snapshot.last_dispatch.is_some());
    }
}
