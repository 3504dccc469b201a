//! Device type taxonomy (spec §3) and the platform-family lookup table
//! (spec §9 "Polymorphism by platform family") used to pick a transport
//! dialect and a template filename prefix.

use crate::config::FilteringConfig;
use std::fmt;

/// The closed device-type classification. `Included` carries the exact
/// operator-supplied pattern that matched, since that pattern doubles as
/// the assigned type string (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    CiscoNxos,
    CiscoXe,
    CiscoIos,
    Excluded,
    Included(String),
    Unknown,
}

impl DeviceType {
    /// A device is infrastructure iff its type is neither `excluded` nor `unknown`.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, DeviceType::Excluded | DeviceType::Unknown)
    }

    /// The family this type maps to for transport/template selection, if any.
    pub fn family(&self) -> Option<DeviceFamily> {
        match self {
            DeviceType::CiscoIos => Some(DeviceFamily::CiscoIos),
            DeviceType::CiscoXe => Some(DeviceFamily::CiscoXe),
            DeviceType::CiscoNxos => Some(DeviceFamily::CiscoNxos),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::CiscoNxos => write!(f, "cisco_nxos"),
            DeviceType::CiscoXe => write!(f, "cisco_xe"),
            DeviceType::CiscoIos => write!(f, "cisco_ios"),
            DeviceType::Excluded => write!(f, "excluded"),
            DeviceType::Unknown => write!(f, "unknown"),
            DeviceType::Included(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// Classify a platform string against the configured filter lists.
///
/// Pure function: the result depends only on `platform` and `filtering`
/// (spec §8, "Type classification purity").
pub fn classify(platform: &str, filtering: &FilteringConfig) -> DeviceType {
    let lower = platform.to_lowercase();

    for pattern in &filtering.exclude_platforms {
        if lower.contains(&pattern.to_lowercase()) {
            return DeviceType::Excluded;
        }
    }

    if lower.contains("nx-os") || lower.contains("nexus") {
        return DeviceType::CiscoNxos;
    }
    if lower.contains("ios-xe") || lower.contains("ios xe") {
        return DeviceType::CiscoXe;
    }
    if lower.contains("ios") {
        return DeviceType::CiscoIos;
    }

    for pattern in &filtering.include_platforms {
        if lower.contains(&pattern.to_lowercase()) {
            return DeviceType::Included(pattern.clone());
        }
    }

    DeviceType::Unknown
}

/// Cisco platform family, used to pick the transport's command dialect and
/// the template filename prefix. A tagged variant with an associated
/// descriptor table, rather than scattered `if platform.contains(...)`
/// conditionals at each call site (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    CiscoIos,
    CiscoXe,
    CiscoNxos,
}

/// Per-family constants: the device-type string the transport should
/// report itself as, the template prefix to load commands against, and the
/// command used to disable pagination before issuing `show` commands.
#[derive(Debug, Clone, Copy)]
pub struct FamilyDescriptor {
    pub dialect: &'static str,
    pub template_prefix: &'static str,
    pub disable_paging_cmd: &'static str,
}

const FAMILY_TABLE: &[(DeviceFamily, FamilyDescriptor)] = &[
    (
        DeviceFamily::CiscoIos,
        FamilyDescriptor {
            dialect: "cisco_ios",
            template_prefix: "cisco_ios",
            disable_paging_cmd: "terminal length 0",
        },
    ),
    (
        DeviceFamily::CiscoXe,
        FamilyDescriptor {
            dialect: "cisco_xe",
            template_prefix: "cisco_ios",
            disable_paging_cmd: "terminal length 0",
        },
    ),
    (
        DeviceFamily::CiscoNxos,
        FamilyDescriptor {
            dialect: "cisco_nxos",
            template_prefix: "cisco_nxos",
            disable_paging_cmd: "terminal length 0",
        },
    ),
];

impl DeviceFamily {
    /// The transport's default dialect before any `show version` has run.
    pub const DEFAULT: DeviceFamily = DeviceFamily::CiscoIos;

    pub fn descriptor(&self) -> &'static FamilyDescriptor {
        FAMILY_TABLE
            .iter()
            .find(|(family, _)| family == self)
            .map(|(_, descriptor)| descriptor)
            .expect("every DeviceFamily variant has a table entry")
    }
}
