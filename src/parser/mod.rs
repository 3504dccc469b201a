//! Template-driven structured text parser (spec §4.A).
//!
//! Templates are anchored-regex row/value rules applied line by line —
//! the same approach as the original TextFSM templates this replaces,
//! re-expressed natively with the `regex` crate instead of vendoring a
//! TextFSM interpreter. A template is read-only once constructed and safe
//! to share across workers.

pub mod templates;

use crate::models::NeighborRecord;
use crate::util::normalize_hostname;
use regex::Regex;
use std::collections::HashMap;

pub type Record = HashMap<String, String>;

/// One named capture-group rule applied to every line of input.
pub struct FieldRule {
    pub field: &'static str,
    pub pattern: Regex,
}

/// A template: an optional record-boundary rule plus a set of field rules.
/// When `record_start` is `None` the whole input is treated as a single
/// record (used for `show version`, which yields exactly one row).
pub struct Template {
    pub name: &'static str,
    pub record_start: Option<Regex>,
    pub fields: Vec<FieldRule>,
}

impl Template {
    /// Line-anchored regex scan. There is no failure mode here: every field
    /// rule that doesn't match a line is simply absent from that record, and
    /// the record-boundary rule (if any) only ever splits on a match.
    pub fn parse(&self, text: &str) -> Vec<Record> {
        let mut records = Vec::new();
        let mut current: Record = HashMap::new();

        for line in text.lines() {
            if let Some(start) = &self.record_start {
                if start.is_match(line) && !current.is_empty() {
                    records.push(std::mem::take(&mut current));
                }
            }
            for rule in &self.fields {
                if let Some(caps) = rule.pattern.captures(line) {
                    let value = caps
                        .name(rule.field)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    current.insert(rule.field.to_string(), value);
                }
            }
        }
        if !current.is_empty() {
            records.push(current);
        }

        records
    }
}

/// Parsed facts from `show version` (spec §4.A).
#[derive(Debug, Clone, Default)]
pub struct VersionFacts {
    pub platform: String,
    pub version: String,
    pub uptime: String,
    pub serial: String,
}

/// Parsed facts from the chassis row of `show inventory`.
#[derive(Debug, Clone, Default)]
pub struct InventoryFacts {
    pub serial_number: String,
    pub part_number: String,
    pub description: String,
}

pub fn parse_version(template: &Template, output: &str) -> Option<VersionFacts> {
    let records = template.parse(output);
    let record = records.first()?;
    Some(VersionFacts {
        platform: record.get("PLATFORM").cloned().unwrap_or_default(),
        version: record.get("VERSION").cloned().unwrap_or_default(),
        uptime: record.get("UPTIME").cloned().unwrap_or_default(),
        serial: record.get("SERIAL").cloned().unwrap_or_default(),
    })
}

/// The chassis entry is the row whose `NAME` contains "chassis" (case-insensitive).
pub fn parse_inventory(template: &Template, output: &str) -> Option<InventoryFacts> {
    let records = template.parse(output);
    let chassis = records.into_iter().find(|record| {
        record
            .get("NAME")
            .map(|name| name.to_lowercase().contains("chassis"))
            .unwrap_or(false)
    });
    chassis.map(|record| InventoryFacts {
        serial_number: record.get("SN").cloned().unwrap_or_default(),
        part_number: record.get("PID").cloned().unwrap_or_default(),
        description: record.get("DESCR").cloned().unwrap_or_default(),
    })
}

/// `show cdp neighbors detail`: records missing a management IP are
/// dropped entirely (spec §4.A); `DEVICE_ID` is normalized here so
/// everything downstream of the parser already sees identity-normalized
/// hostnames.
pub fn parse_neighbors(template: &Template, output: &str) -> Vec<NeighborRecord> {
    let records = template.parse(output);
    records
        .into_iter()
        .filter_map(|record| {
            let management_ip = record.get("MANAGEMENT_IP")?.clone();
            if management_ip.is_empty() {
                return None;
            }
            Some(NeighborRecord {
                hostname: normalize_hostname(record.get("DEVICE_ID").map(String::as_str).unwrap_or("")),
                platform: record.get("PLATFORM").cloned().unwrap_or_default(),
                management_ip,
                local_interface: record.get("LOCAL_INTERFACE").cloned().unwrap_or_default(),
                remote_interface: record.get("PORT_ID").cloned().unwrap_or_default(),
                capabilities: record.get("CAPABILITY").cloned().unwrap_or_default(),
            })
        })
        .collect()
}
