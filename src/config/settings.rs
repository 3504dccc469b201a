//! Configuration settings structures.
//!
//! These structs represent the full netcrawl configuration tree, matching
//! the keys recognized in config.yml / deployment.yml.

use serde::{Deserialize, Serialize};
use anyhow::Result;

/// Top-level netcrawl configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Logging verbosity ("error", "warning", "info", "debug", "trace").
    pub log: String,

    pub connection: ConnectionConfig,
    pub threading: ThreadingConfig,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub filtering: FilteringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Number of connect/command attempts before giving up (>= 1).
    pub retry_attempts: u32,
    /// Seconds to wait between retries (>= 0).
    pub retry_delay: u64,
    /// Per-command transport timeout, seconds (>= 1).
    pub timeout: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_delay: 5,
            timeout: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    /// Number of concurrent device-session workers (>= 1).
    pub max_workers: usize,
    /// Seconds a worker waits on an empty frontier before re-checking stop (> 0).
    pub queue_timeout: u64,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            queue_timeout: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Filesystem path of the persistent SQLite store.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "netcrawl.db".into(),
        }
    }
}

impl DatabaseConfig {
    /// Build a sqlx SQLite connection string; creates the file if absent.
    pub fn connection_string(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub inventory_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".into(),
            inventory_file: "inventory.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilteringConfig {
    /// Case-insensitive substrings; a match classifies a device as `excluded`.
    pub exclude_platforms: Vec<String>,
    /// Case-insensitive substrings; a match classifies a device as the pattern itself.
    pub include_platforms: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            log: "info".into(),
            connection: ConnectionConfig::default(),
            threading: ThreadingConfig::default(),
            database: DatabaseConfig::default(),
            output: OutputConfig::default(),
            filtering: FilteringConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// Apply overrides from a YAML value (deployment.yml).
    pub fn apply_overrides(&mut self, overrides: &serde_yaml::Value) -> Result<()> {
        if let Some(conn) = overrides.get("connection") {
            if let Some(v) = conn.get("retry_attempts").and_then(|v| v.as_u64()) {
                self.connection.retry_attempts = v as u32;
            }
            if let Some(v) = conn.get("retry_delay").and_then(|v| v.as_u64()) {
                self.connection.retry_delay = v;
            }
            if let Some(v) = conn.get("timeout").and_then(|v| v.as_u64()) {
                self.connection.timeout = v;
            }
        }

        if let Some(threading) = overrides.get("threading") {
            if let Some(v) = threading.get("max_workers").and_then(|v| v.as_u64()) {
                self.threading.max_workers = v as usize;
            }
            if let Some(v) = threading.get("queue_timeout").and_then(|v| v.as_u64()) {
                self.threading.queue_timeout = v;
            }
        }

        if let Some(db) = overrides.get("database") {
            if let Some(path) = db.get("path").and_then(|v| v.as_str()) {
                self.database.path = path.to_string();
            }
        }

        if let Some(out) = overrides.get("output") {
            if let Some(v) = out.get("directory").and_then(|v| v.as_str()) {
                self.output.directory = v.to_string();
            }
            if let Some(v) = out.get("inventory_file").and_then(|v| v.as_str()) {
                self.output.inventory_file = v.to_string();
            }
        }

        if let Some(filtering) = overrides.get("filtering") {
            if let Some(v) = filtering.get("exclude_platforms") {
                if let Ok(list) = serde_yaml::from_value::<Vec<String>>(v.clone()) {
                    self.filtering.exclude_platforms = list;
                }
            }
            if let Some(v) = filtering.get("include_platforms") {
                if let Ok(list) = serde_yaml::from_value::<Vec<String>>(v.clone()) {
                    self.filtering.include_platforms = list;
                }
            }
        }

        if let Some(v) = overrides.get("log").and_then(|v| v.as_str()) {
            self.log = v.to_string();
        }

        Ok(())
    }

    /// Apply environment variable overrides (for container deployments).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("NETCRAWL_DB_PATH") {
            self.database.path = v;
        }
        if let Ok(v) = std::env::var("NETCRAWL_OUTPUT_DIR") {
            self.output.directory = v;
        }
        if let Ok(v) = std::env::var("NETCRAWL_LOG") {
            self.log = v;
        }
        if let Ok(v) = std::env::var("NETCRAWL_MAX_WORKERS") {
            if let Ok(n) = v.parse() {
                self.threading.max_workers = n;
            }
        }
    }
}
