//! Per-family, per-command template definitions (spec §4.A, §9
//! "Polymorphism by platform family").
//!
//! Templates are built fresh per call but hold only `Regex`es, which are
//! cheap to construct and (per `regex`'s internal caching) cheap to reuse;
//! callers that want to avoid rebuilding them on a hot path may hold onto
//! the returned `Template` for the lifetime of a Session.

use lazy_static::lazy_static;
use regex::Regex;

use super::{FieldRule, Template};
use crate::models::DeviceFamily;

lazy_static! {
    static ref IOS_PLATFORM: Regex =
        Regex::new(r"^(?P<PLATFORM>Cisco .+?), Version (?P<VERSION>[^,]+),").unwrap();
    static ref IOS_UPTIME: Regex = Regex::new(r"(?i)uptime is (?P<UPTIME>.+)$").unwrap();
    static ref IOS_SERIAL: Regex =
        Regex::new(r"(?i)system serial number\s*:\s*(?P<SERIAL>\S+)").unwrap();
    static ref NXOS_PLATFORM: Regex = Regex::new(r"^Cisco (?P<PLATFORM>Nexus.+)$").unwrap();
    static ref NXOS_VERSION: Regex = Regex::new(r"(?i)system version:\s*(?P<VERSION>\S+)").unwrap();
    static ref NXOS_UPTIME: Regex = Regex::new(r"(?i)kernel uptime is\s*(?P<UPTIME>.+)$").unwrap();
    static ref NXOS_SERIAL: Regex =
        Regex::new(r"(?i)processor board id\s*(?P<SERIAL>\S+)").unwrap();
    static ref INVENTORY_NAME_LINE: Regex =
        Regex::new(r#"^NAME:\s*"(?P<NAME>[^"]*)",\s*DESCR:\s*"(?P<DESCR>[^"]*)""#).unwrap();
    static ref INVENTORY_PID_LINE: Regex =
        Regex::new(r"^PID:\s*(?P<PID>\S*)\s*,.*SN:\s*(?P<SN>\S+)").unwrap();
    static ref CDP_SEPARATOR: Regex = Regex::new(r"^-{20,}$").unwrap();
    static ref CDP_DEVICE_ID: Regex = Regex::new(r"^Device ID:\s*(?P<DEVICE_ID>\S+)").unwrap();
    static ref CDP_PLATFORM: Regex =
        Regex::new(r"(?i)Platform:\s*(?P<PLATFORM>[^,]+),\s*Capabilities:\s*(?P<CAPABILITY>.+)$")
            .unwrap();
    static ref CDP_MANAGEMENT_IP: Regex =
        Regex::new(r"(?i)IP address:\s*(?P<MANAGEMENT_IP>\S+)").unwrap();
    static ref CDP_LOCAL_INTERFACE: Regex = Regex::new(
        r"(?i)Interface:\s*(?P<LOCAL_INTERFACE>\S+),\s*Port ID \(outgoing port\):\s*(?P<PORT_ID>\S+)"
    )
    .unwrap();
}

/// `show version` template, keyed by family (IOS/IOS-XE share one dialect;
/// NX-OS has its own).
pub fn version_template(family: DeviceFamily) -> Template {
    match family {
        DeviceFamily::CiscoNxos => Template {
            name: "cisco_nxos_show_version",
            record_start: None,
            fields: vec![
                FieldRule { field: "PLATFORM", pattern: NXOS_PLATFORM.clone() },
                FieldRule { field: "VERSION", pattern: NXOS_VERSION.clone() },
                FieldRule { field: "UPTIME", pattern: NXOS_UPTIME.clone() },
                FieldRule { field: "SERIAL", pattern: NXOS_SERIAL.clone() },
            ],
        },
        DeviceFamily::CiscoIos | DeviceFamily::CiscoXe => Template {
            name: "cisco_ios_show_version",
            record_start: None,
            fields: vec![
                FieldRule { field: "PLATFORM", pattern: IOS_PLATFORM.clone() },
                FieldRule { field: "VERSION", pattern: IOS_PLATFORM.clone() },
                FieldRule { field: "UPTIME", pattern: IOS_UPTIME.clone() },
                FieldRule { field: "SERIAL", pattern: IOS_SERIAL.clone() },
            ],
        },
    }
}

/// `show inventory` template: identical row shape across families.
pub fn inventory_template(_family: DeviceFamily) -> Template {
    Template {
        name: "cisco_show_inventory",
        record_start: Some(INVENTORY_NAME_LINE.clone()),
        fields: vec![
            FieldRule { field: "NAME", pattern: INVENTORY_NAME_LINE.clone() },
            FieldRule { field: "DESCR", pattern: INVENTORY_NAME_LINE.clone() },
            FieldRule { field: "PID", pattern: INVENTORY_PID_LINE.clone() },
            FieldRule { field: "SN", pattern: INVENTORY_PID_LINE.clone() },
        ],
    }
}

/// `show cdp neighbors detail` template: identical row shape across families.
pub fn cdp_neighbors_template(_family: DeviceFamily) -> Template {
    Template {
        name: "cisco_show_cdp_neighbors_detail",
        record_start: Some(CDP_SEPARATOR.clone()),
        fields: vec![
            FieldRule { field: "DEVICE_ID", pattern: CDP_DEVICE_ID.clone() },
            FieldRule { field: "PLATFORM", pattern: CDP_PLATFORM.clone() },
            FieldRule { field: "CAPABILITY", pattern: CDP_PLATFORM.clone() },
            FieldRule { field: "MANAGEMENT_IP", pattern: CDP_MANAGEMENT_IP.clone() },
            FieldRule { field: "LOCAL_INTERFACE", pattern: CDP_LOCAL_INTERFACE.clone() },
            FieldRule { field: "PORT_ID", pattern: CDP_LOCAL_INTERFACE.clone() },
        ],
    }
}
