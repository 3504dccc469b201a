//! Shared fixtures for the integration and end-to-end suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use netcrawl::db::{run_migrations, Store};
use netcrawl::engine::TransportFactory;
use netcrawl::models::DeviceFamily;
use netcrawl::transport::{DeviceTransport, MockTransport};
use sqlx::sqlite::SqlitePoolOptions;

/// A fresh in-memory, migrated `Store` for a single test.
pub async fn test_store() -> Store {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    Store::new(pool)
}

/// A fleet of scripted devices, keyed by the hostname a Session connects
/// with. Each device is claimed (consumed) the first time something
/// connects to it, matching a real device's single active session.
#[derive(Clone, Default)]
pub struct ScriptedNetwork {
    scripts: Arc<Mutex<HashMap<String, MockTransport>>>,
}

impl ScriptedNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the canned transport a connection to `hostname` should get.
    pub fn script(&self, hostname: &str, transport: MockTransport) -> &Self {
        self.scripts.lock().unwrap().insert(hostname.to_string(), transport);
        self
    }

    /// A `TransportFactory` the Engine can be wired to in place of `SshTransport::new`.
    pub fn factory(&self) -> TransportFactory {
        let scripts = self.scripts.clone();
        Arc::new(move || {
            Box::new(DispatchTransport {
                scripts: scripts.clone(),
                inner: None,
            }) as Box<dyn DeviceTransport>
        })
    }
}

/// One device's transport for the duration of a single session; resolves
/// which scripted `MockTransport` to drive the first time `connect` is
/// called, since the Engine builds transports before it knows the host.
struct DispatchTransport {
    scripts: Arc<Mutex<HashMap<String, MockTransport>>>,
    inner: Option<MockTransport>,
}

#[async_trait::async_trait]
impl DeviceTransport for DispatchTransport {
    async fn connect(&mut self, host: &str, username: &str, password: &str, timeout_secs: u64) -> Result<()> {
        // A retried connect reuses the transport already claimed on the
        // first attempt rather than re-resolving the script (which would
        // already have been removed from the registry).
        if self.inner.is_none() {
            let mock = self
                .scripts
                .lock()
                .unwrap()
                .remove(host)
                .ok_or_else(|| anyhow!("no scripted device registered for host '{host}'"))?;
            self.inner = Some(mock);
        }
        self.inner.as_mut().unwrap().connect(host, username, password, timeout_secs).await
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.inner
            .as_mut()
            .ok_or_else(|| anyhow!("send_command before connect"))?
            .send_command(command)
            .await
    }

    fn set_family(&mut self, family: DeviceFamily) {
        if let Some(mock) = self.inner.as_mut() {
            mock.set_family(family);
        }
    }

    async fn disconnect(&mut self) {
        if let Some(mock) = self.inner.as_mut() {
            mock.disconnect().await;
        }
    }
}
