//! Scripted transport double for tests (spec §4.B, §4.L).
//!
//! Mirrors the mock-device pattern used by the wider Rust SSH-automation
//! ecosystem: a transport that never opens a socket, returning canned
//! output per command so Sessions, the Engine and the Store can be
//! exercised without real devices or network I/O.

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::models::DeviceFamily;
use crate::transport::DeviceTransport;

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Command -> canned output. Missing entries cause `send_command` to fail.
    pub responses: HashMap<String, String>,
    /// If set, `connect` fails with this message instead of succeeding.
    pub connect_failure: Option<String>,
    pub family: Option<DeviceFamily>,
    pub connected: bool,
    pub disconnected: bool,
    pub commands_sent: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, command: &str, output: &str) -> Self {
        self.responses.insert(command.to_string(), output.to_string());
        self
    }

    pub fn failing_to_connect(mut self, reason: &str) -> Self {
        self.connect_failure = Some(reason.to_string());
        self
    }
}

#[async_trait::async_trait]
impl DeviceTransport for MockTransport {
    async fn connect(&mut self, _host: &str, _username: &str, _password: &str, _timeout_secs: u64) -> Result<()> {
        if let Some(reason) = &self.connect_failure {
            bail!("{reason}");
        }
        self.connected = true;
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.commands_sent.push(command.to_string());
        match self.responses.get(command) {
            Some(output) => Ok(output.clone()),
            None => bail!("mock transport has no scripted response for '{command}'"),
        }
    }

    fn set_family(&mut self, family: DeviceFamily) {
        self.family = Some(family);
    }

    async fn disconnect(&mut self) {
        self.disconnected = true;
    }
}
