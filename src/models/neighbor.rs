//! A CDP neighbor entry as parsed off `show cdp neighbors detail`
//! (spec §3 "NeighborRecord", §4.D "neighbor discovery").

use super::device_type::{classify, DeviceType};
use crate::config::FilteringConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRecord {
    pub hostname: String,
    pub platform: String,
    pub management_ip: String,
    pub local_interface: String,
    pub remote_interface: String,
    pub capabilities: String,
}

impl NeighborRecord {
    pub fn device_type(&self, filtering: &FilteringConfig) -> DeviceType {
        classify(&self.platform, filtering)
    }

    /// A neighbor is worth admitting to the frontier only if it reports a
    /// management IP and classifies as infrastructure (spec §4.D, "CDP
    /// admission filter").
    pub fn is_admissible(&self, filtering: &FilteringConfig) -> bool {
        !self.management_ip.is_empty() && self.device_type(filtering).is_infrastructure()
    }
}
