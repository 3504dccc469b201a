//! Typed error taxonomy for netcrawl.
//!
//! Distinguishes *recoverable* per-device failures from *fatal* startup
//! failures so callers can match on kind rather than string content.
//! Everything downstream of this taxonomy (device sessions, workers, CLI)
//! still threads plain `anyhow::Result`.
//!
//! Templates are compiled in rather than loaded from disk, and line-anchored
//! regex scanning over already-fetched command output can't itself fail —
//! an unmatched field is simply absent from the record. So there is no
//! separate template-load or parse error kind here: the only way a phase
//! actually fails is the command that feeds it never returning output,
//! which is a `CommandFailure`, matching spec §7's note that those two
//! kinds are "treated like CommandFailure for the affected phase."

use thiserror::Error;

/// Error kinds surfaced by the discovery engine and its collaborators.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Transport unreachable or authentication rejected after all retries.
    #[error("could not connect to {host} ({ip}): {source}")]
    ConnectFailure {
        host: String,
        ip: String,
        #[source]
        source: anyhow::Error,
    },

    /// A specific command could not be executed after retries.
    #[error("command '{command}' failed on {host}: {source}")]
    CommandFailure {
        host: String,
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// Persistence I/O failure inside the Inventory Store.
    #[error("store operation failed: {0}")]
    StoreError(#[source] anyhow::Error),

    /// Missing or invalid configuration at startup. Fatal.
    #[error("configuration error: {0}")]
    ConfigError(#[source] anyhow::Error),
}

impl CrawlError {
    /// True for errors the engine recovers from locally (never fatal to the process).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CrawlError::ConfigError(_))
    }
}
