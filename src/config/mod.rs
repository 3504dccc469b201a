//! Configuration system - YAML-based config loading.
//!
//! Loads config.yml as defaults, then overlays environments/deployment.yml
//! for local overrides, then environment variables. Loaded once by the
//! entry point and passed by reference into every component's constructor
//! — there is no process-wide mutable singleton.

pub mod settings;

use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::CrawlError;

pub use settings::*;

/// Load configuration from YAML files.
///
/// Configuration is loaded in layers:
/// 1. Built-in defaults (config.yml)
/// 2. Environment-specific overrides (environments/deployment.yml)
/// 3. Environment variable overrides
///
/// Every failure here is fatal at startup, so it is surfaced as
/// `CrawlError::ConfigError` rather than a bare `anyhow::Error`.
pub fn load_config(config_dir: Option<&Path>) -> Result<CrawlConfig, CrawlError> {
    load_config_inner(config_dir).map_err(CrawlError::ConfigError)
}

fn load_config_inner(config_dir: Option<&Path>) -> anyhow::Result<CrawlConfig> {
    let home = config_dir
        .map(PathBuf::from)
        .or_else(|| std::env::var("NETCRAWL_HOME").ok().map(PathBuf::from))
        .or_else(dirs::home_dir)
        .context("Cannot determine home directory")?;

    let default_config_path = home.join("config.yml");
    let mut config = if default_config_path.exists() {
        let contents = std::fs::read_to_string(&default_config_path)
            .with_context(|| format!("Failed to read {}", default_config_path.display()))?;
        serde_yaml::from_str::<CrawlConfig>(&contents)
            .with_context(|| format!("Failed to parse {}", default_config_path.display()))?
    } else {
        CrawlConfig::default()
    };

    let env_config_path = home.join("environments").join("deployment.yml");
    if env_config_path.exists() {
        let contents = std::fs::read_to_string(&env_config_path)
            .with_context(|| format!("Failed to read {}", env_config_path.display()))?;
        let overrides: serde_yaml::Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", env_config_path.display()))?;
        config.apply_overrides(&overrides)?;
        info!("Loaded config overrides from {}", env_config_path.display());
    }

    config.apply_env_overrides();

    validate(&config)?;

    Ok(config)
}

/// Reject configuration values that violate the bounds in spec §6.
fn validate(config: &CrawlConfig) -> anyhow::Result<()> {
    if config.connection.retry_attempts < 1 {
        return Err(anyhow!("connection.retry_attempts must be >= 1"));
    }
    if config.connection.timeout < 1 {
        return Err(anyhow!("connection.timeout must be >= 1"));
    }
    if config.threading.max_workers < 1 {
        return Err(anyhow!("threading.max_workers must be >= 1"));
    }
    if config.threading.queue_timeout == 0 {
        return Err(anyhow!("threading.queue_timeout must be > 0"));
    }
    Ok(())
}
