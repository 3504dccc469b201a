//! Device transport abstraction (spec §4.B "Transport contract").
//!
//! The Session depends on this trait, not a concrete protocol
//! implementation, so it can run against a real SSH client in production
//! and a scripted double in tests.

pub mod mock;
pub mod ssh;

use crate::models::DeviceFamily;
use anyhow::Result;

pub use mock::MockTransport;
pub use ssh::SshTransport;

/// One interactive session with a device: connect, run commands, disconnect.
/// Implementors own whatever connection state they need; the trait itself
/// is stateless from the caller's perspective.
#[async_trait::async_trait]
pub trait DeviceTransport: Send {
    /// Attempt to connect to `host` (a hostname or IP literal) with the
    /// given credentials and timeout. A single attempt — retry policy lives
    /// in the Session, not here.
    async fn connect(&mut self, host: &str, username: &str, password: &str, timeout_secs: u64) -> Result<()>;

    /// Send a command and return its raw output.
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Reconfigure the command dialect once the device's real family is
    /// known (e.g. after parsing `show version`). Affects how subsequent
    /// commands are framed, but never the already-open connection.
    fn set_family(&mut self, family: DeviceFamily);

    /// Close the connection. Safe to call even if never connected.
    async fn disconnect(&mut self);
}
