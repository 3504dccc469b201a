//! Interactive SSH transport (spec §4.B, §6 "Device-side wire surface").
//!
//! `ssh2` is a thin libssh2 binding with a synchronous, blocking API; every
//! call here runs on a blocking-friendly executor thread via
//! `spawn_blocking`, the same pattern the rest of this crate uses for
//! blocking DNS lookups.

use anyhow::{anyhow, bail, Context, Result};
use ssh2::Session;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::models::DeviceFamily;
use crate::transport::DeviceTransport;

/// Interactive shell channel prompt detection: a command is considered
/// complete once the device re-prints its prompt (`>` or `#` at end of line).
const PROMPT_MARKERS: [char; 2] = ['>', '#'];

pub struct SshTransport {
    session: Option<Session>,
    channel: Option<ssh2::Channel>,
    family: DeviceFamily,
}

impl Default for SshTransport {
    fn default() -> Self {
        Self {
            session: None,
            channel: None,
            family: DeviceFamily::DEFAULT,
        }
    }
}

impl SshTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_until_prompt(channel: &mut ssh2::Channel, timeout: Duration) -> Result<String> {
        channel.stream(0).set_timeout(timeout.as_millis() as u32);
        let mut output = String::new();
        let mut buf = [0u8; 4096];
        loop {
            match channel.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    output.push_str(&String::from_utf8_lossy(&buf[..n]));
                    if output
                        .trim_end()
                        .ends_with(|c| PROMPT_MARKERS.contains(&c))
                    {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
                Err(e) => return Err(e).context("reading SSH channel output"),
            }
        }
        Ok(output)
    }
}

#[async_trait::async_trait]
impl DeviceTransport for SshTransport {
    async fn connect(
        &mut self,
        host: &str,
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<()> {
        let host = host.to_string();
        let username = username.to_string();
        let password = password.to_string();
        let (session, channel) = tokio::task::spawn_blocking(move || -> Result<_> {
            let tcp = TcpStream::connect((host.as_str(), 22))
                .with_context(|| format!("TCP connect to {} failed", host))?;
            tcp.set_read_timeout(Some(Duration::from_secs(timeout_secs)))?;

            let mut session = Session::new().context("failed to create SSH session")?;
            session.set_tcp_stream(tcp);
            session.handshake().context("SSH handshake failed")?;
            session
                .userauth_password(&username, &password)
                .context("SSH authentication failed")?;
            if !session.authenticated() {
                bail!("SSH authentication rejected for {}", host);
            }

            let mut channel = session.channel_session().context("failed to open channel")?;
            channel.shell().context("failed to start shell")?;
            let _ = SshTransport::read_until_prompt(&mut channel, Duration::from_secs(timeout_secs));

            Ok((session, channel))
        })
        .await
        .map_err(|e| anyhow!("connect task panicked: {e}"))??;

        self.session = Some(session);
        self.channel = Some(channel);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        let mut channel = self
            .channel
            .take()
            .ok_or_else(|| anyhow!("send_command called before connect"))?;
        let command = command.to_string();

        let (channel, output) = tokio::task::spawn_blocking(move || -> Result<_> {
            writeln!(channel, "{command}").context("writing command to channel")?;
            let output = SshTransport::read_until_prompt(&mut channel, Duration::from_secs(30))?;
            Ok((channel, output))
        })
        .await
        .map_err(|e| anyhow!("send_command task panicked: {e}"))??;

        self.channel = Some(channel);
        Ok(output)
    }

    fn set_family(&mut self, family: DeviceFamily) {
        self.family = family;
    }

    async fn disconnect(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            let _ = tokio::task::spawn_blocking(move || {
                let _ = channel.send_eof();
                let _ = channel.close();
                let _ = channel.wait_close();
            })
            .await;
        }
        self.session = None;
    }
}
