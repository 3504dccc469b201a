//! Progress Reporter: thread-safe counters + throttled snapshot logging
//! (spec §4.F).

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(30);

struct Inner {
    start_time: Instant,
    devices_processed: u64,
    devices_discovered: u64,
    currently_processing: HashSet<String>,
    last_report: Instant,
}

/// Engine-wide counters, protected by a single lock. Every update is O(1)
/// and never blocks on I/O (spec §5 "Shared-resource policy").
pub struct Stats {
    inner: Mutex<Inner>,
}

impl Stats {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            inner: Mutex::new(Inner {
                start_time: now,
                devices_processed: 0,
                devices_discovered: 0,
                currently_processing: HashSet::new(),
                last_report: now,
            }),
        }
    }

    pub fn device_discovered(&self) {
        self.inner.lock().unwrap().devices_discovered += 1;
    }

    pub fn started_processing(&self, hostname: &str) {
        self.inner.lock().unwrap().currently_processing.insert(hostname.to_string());
    }

    pub fn finished_processing(&self, hostname: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.currently_processing.remove(hostname);
        inner.devices_processed += 1;
    }

    /// Devices per minute since `start_time`. `None` before any time has elapsed.
    pub fn processing_rate(&self) -> Option<f64> {
        let inner = self.inner.lock().unwrap();
        let elapsed_minutes = inner.start_time.elapsed().as_secs_f64() / 60.0;
        if elapsed_minutes > 0.0 {
            Some(inner.devices_processed as f64 / elapsed_minutes)
        } else {
            None
        }
    }

    pub fn devices_processed(&self) -> u64 {
        self.inner.lock().unwrap().devices_processed
    }

    pub fn devices_discovered(&self) -> u64 {
        self.inner.lock().unwrap().devices_discovered
    }

    /// Emit a snapshot via the structured logger, at most once per
    /// `REPORT_INTERVAL`. A no-op when the window has not elapsed — safe
    /// to call opportunistically after every device.
    pub fn report_if_due(&self, queue_len: usize) {
        let mut inner = self.inner.lock().unwrap();
        if inner.last_report.elapsed() < REPORT_INTERVAL {
            return;
        }
        inner.last_report = Instant::now();
        let active: Vec<_> = inner.currently_processing.iter().cloned().collect();
        let elapsed_minutes = inner.start_time.elapsed().as_secs_f64() / 60.0;
        let rate = if elapsed_minutes > 0.0 {
            inner.devices_processed as f64 / elapsed_minutes
        } else {
            0.0
        };
        info!(
            devices_discovered = inner.devices_discovered,
            devices_processed = inner.devices_processed,
            processing_rate = format!("{rate:.2}"),
            active_devices = active.len(),
            queue_len,
            "progress report"
        );
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}
