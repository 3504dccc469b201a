//! Device identity and accumulated facts (spec §3 "Device").

use super::device_type::{classify, DeviceFamily, DeviceType};
use crate::config::FilteringConfig;
use crate::util::normalize_hostname;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A device as it accumulates facts over the course of a session. Starts
/// with only an identity (hostname and/or IP) and is refined by each
/// command a session runs against it.
#[derive(Debug, Clone)]
pub struct Device {
    pub hostname: String,
    pub ip_address: Option<String>,
    pub platform: Option<String>,
    pub serial_number: Option<String>,
    pub device_type: Option<DeviceType>,
}

impl Device {
    /// Construct a device from a seed or neighbor-discovered identity.
    /// `hostname` is normalized immediately; the normalized form is the
    /// identity key used everywhere downstream.
    pub fn new(hostname: &str, ip_address: Option<String>) -> Self {
        Self {
            hostname: normalize_hostname(hostname),
            ip_address,
            platform: None,
            serial_number: None,
            device_type: None,
        }
    }

    /// Record a platform string learned from `show version` and classify it.
    pub fn set_platform(&mut self, platform: String, filtering: &FilteringConfig) {
        self.device_type = Some(classify(&platform, filtering));
        self.platform = Some(platform);
    }

    pub fn family(&self) -> DeviceFamily {
        self.device_type
            .as_ref()
            .and_then(DeviceType::family)
            .unwrap_or(DeviceFamily::DEFAULT)
    }

    pub fn is_infrastructure(&self) -> bool {
        self.device_type
            .as_ref()
            .map(DeviceType::is_infrastructure)
            .unwrap_or(false)
    }

    /// A device is ready to persist once it has an IP address and a
    /// resolved device type (spec §4.C "save_device").
    pub fn to_projection(&self) -> Option<DeviceProjection> {
        Some(DeviceProjection {
            hostname: self.hostname.clone(),
            ip_address: self.ip_address.clone()?,
            platform: self.platform.clone(),
            serial_number: self.serial_number.clone(),
            device_type: self.device_type.as_ref()?.to_string(),
        })
    }
}

/// The payload written to the store once a device has been fully identified.
#[derive(Debug, Clone)]
pub struct DeviceProjection {
    pub hostname: String,
    pub ip_address: String,
    pub platform: Option<String>,
    pub serial_number: Option<String>,
    pub device_type: String,
}

/// A row read back from the Devices table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceRecord {
    pub id: i64,
    pub hostname: String,
    pub ip_address: String,
    pub platform: Option<String>,
    pub serial_number: Option<String>,
    pub device_type: String,
    pub discovered_at: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}
