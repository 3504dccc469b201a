//! Netcrawl - concurrent CDP-neighbor network discovery and inventory tool.
//!
//! Starts from a seed device, logs in over an interactive SSH session,
//! collects identity and neighbor information, and recursively extends the
//! crawl to every newly discovered neighbor, persisting a durable inventory
//! as it goes.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod export;
pub mod frontier;
pub mod models;
pub mod parser;
pub mod session;
pub mod transport;
pub mod util;

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
