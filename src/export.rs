//! Exporter: read-only dump of the Inventory Store into a delimited text
//! file (spec §4.G).

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::OutputConfig;
use crate::db::Store;

const HEADER: &str = "hostname,ip_address,platform,serial_number,device_type";

/// Write every device in the Store to `output.directory/output.inventory_file`,
/// creating the directory if it does not exist. Fields are emitted verbatim
/// (no escaping/quoting) — callers are responsible for device attributes
/// not containing the delimiter (spec §4.G).
pub async fn export_inventory(store: &Store, output: &OutputConfig) -> Result<()> {
    let devices = store.list_devices().await.context("listing devices for export")?;

    let dir = Path::new(&output.directory);
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let path = dir.join(&output.inventory_file);
    let mut body = String::from(HEADER);
    body.push('\n');
    for device in &devices {
        body.push_str(&format!(
            "{},{},{},{},{}\n",
            device.hostname,
            device.ip_address,
            device.platform.as_deref().unwrap_or(""),
            device.serial_number.as_deref().unwrap_or(""),
            device.device_type,
        ));
    }

    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), count = devices.len(), "inventory exported");
    Ok(())
}
