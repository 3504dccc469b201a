//! In-memory multi-producer/multi-consumer work channel (spec §4.D).
//!
//! Unbounded and purely advisory: it only carries candidate
//! `(hostname, ip)` pairs. The authoritative dedup check lives in the
//! Inventory Store (spec §9 "Dedup vs. frontier") — the Frontier may
//! transiently hold duplicates, which workers filter out before processing.

use std::time::Duration;

/// One candidate work item: a normalized hostname paired with its
/// last-known management IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub hostname: String,
    pub ip_address: String,
}

#[derive(Debug, Clone)]
pub struct Frontier {
    sender: flume::Sender<WorkItem>,
    receiver: flume::Receiver<WorkItem>,
}

impl Frontier {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Enqueue a candidate. Never blocks (unbounded channel).
    pub fn push(&self, hostname: impl Into<String>, ip_address: impl Into<String>) {
        let _ = self.sender.send(WorkItem {
            hostname: hostname.into(),
            ip_address: ip_address.into(),
        });
    }

    /// Block for up to `timeout` waiting for an item, so callers can
    /// periodically re-check a stop signal (spec §5 "Suspension points").
    /// Synchronous; intended for tests and non-async callers.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkItem> {
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(flume::RecvTimeoutError::Timeout) => None,
            Err(flume::RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Async equivalent of `recv_timeout`, used by the worker loop so a
    /// pending take never occupies a tokio executor thread.
    pub async fn recv_timeout_async(&self, timeout: Duration) -> Option<WorkItem> {
        tokio::time::timeout(timeout, self.receiver.recv_async())
            .await
            .ok()
            .and_then(Result::ok)
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
