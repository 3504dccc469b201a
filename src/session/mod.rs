//! Device Session: one bounded interaction with one device (spec §4.B).

use tracing::{debug, info, warn};

use crate::config::{ConnectionConfig, FilteringConfig};
use crate::error::CrawlError;
use crate::models::{Device, DeviceFamily, NeighborRecord};
use crate::parser::{self, templates};
use crate::transport::DeviceTransport;

/// The outcome of a completed Session.
pub struct SessionOutcome {
    pub device: Device,
    pub neighbors: Vec<NeighborRecord>,
}

/// Drive `transport` through the fixed connect → identify → inventory →
/// neighbors → disconnect workflow for one device.
///
/// Returns `None` on any failure that makes the device unusable (failed
/// connect, or `show version` producing no parseable record) — the Session
/// absorbs all transport/parse errors itself and never propagates them
/// (spec §4.B "Failure semantics", §7).
pub async fn run(
    transport: &mut dyn DeviceTransport,
    hostname: &str,
    ip_address: &str,
    username: &str,
    password: &str,
    connection: &ConnectionConfig,
    filtering: &FilteringConfig,
) -> Option<SessionOutcome> {
    let mut device = Device::new(hostname, Some(ip_address.to_string()));

    if !connect_with_retry(transport, &device.hostname, ip_address, username, password, connection).await {
        return None;
    }

    let Some(version_output) = run_command_with_retry(transport, &device.hostname, "show version", connection).await
    else {
        transport.disconnect().await;
        return None;
    };
    // The device's real family isn't known until `show version` is parsed,
    // so every family's template is tried in turn and the first one to
    // yield a non-empty platform wins (spec §4.B step 2, §8 S6).
    let version = match parse_version_blind(&version_output) {
        Some(facts) => facts,
        None => {
            warn!(host = %device.hostname, "show version produced no parseable record");
            transport.disconnect().await;
            return None;
        }
    };
    device.set_platform(version.platform.clone(), filtering);
    if !version.serial.is_empty() {
        device.serial_number = Some(version.serial.clone());
    }

    let family = device.family();
    transport.set_family(family);
    debug!(host = %device.hostname, family = ?family, "device family refined after show version");

    if let Some(inventory_output) =
        run_command_with_retry(transport, &device.hostname, "show inventory", connection).await
    {
        let inventory_template = templates::inventory_template(family);
        if let Some(facts) = parser::parse_inventory(&inventory_template, &inventory_output) {
            if !facts.serial_number.is_empty() {
                device.serial_number = Some(facts.serial_number);
            }
        }
    }

    let mut neighbors = Vec::new();
    if let Some(cdp_output) =
        run_command_with_retry(transport, &device.hostname, "show cdp neighbors detail", connection).await
    {
        let cdp_template = templates::cdp_neighbors_template(family);
        neighbors = parser::parse_neighbors(&cdp_template, &cdp_output);
    }

    // Self-IP adoption: if this device reported no IP of its own and shows
    // up as its own neighbor, adopt that neighbor's management IP.
    if device.ip_address.as_deref().map(str::is_empty).unwrap_or(true) {
        if let Some(self_neighbor) = neighbors.iter().find(|n| n.hostname == device.hostname) {
            device.ip_address = Some(self_neighbor.management_ip.clone());
        }
    }

    transport.disconnect().await;
    info!(host = %device.hostname, neighbor_count = neighbors.len(), "session complete");

    Some(SessionOutcome { device, neighbors })
}

/// Try every family's version template against `output`, in a fixed order,
/// and keep the first one that extracts a non-empty platform. Families
/// other than the device's real one will usually parse nothing or only an
/// uptime/serial, never a platform, so this converges on the right template
/// without a circular dependency on family-before-identity.
fn parse_version_blind(output: &str) -> Option<parser::VersionFacts> {
    for family in [DeviceFamily::CiscoIos, DeviceFamily::CiscoNxos] {
        let template = templates::version_template(family);
        if let Some(facts) = parser::parse_version(&template, output) {
            if !facts.platform.is_empty() {
                return Some(facts);
            }
        }
    }
    None
}

/// Each attempt tries the hostname first, then the IP if they differ
/// (spec §9 "Ambiguity: hostname vs. IP fallback"). Once retries are
/// exhausted the last failure is surfaced as a `CrawlError::ConnectFailure`
/// and logged; the Session absorbs it and reports plain connect/no-connect
/// to its caller (spec §4.B "Failure semantics", §7).
async fn connect_with_retry(
    transport: &mut dyn DeviceTransport,
    hostname: &str,
    ip_address: &str,
    username: &str,
    password: &str,
    connection: &ConnectionConfig,
) -> bool {
    let mut last_err = None;

    for attempt in 1..=connection.retry_attempts {
        if hostname != ip_address {
            match transport
                .connect(hostname, username, password, connection.timeout)
                .await
            {
                Ok(()) => return true,
                Err(e) => {
                    warn!(host = hostname, attempt, error = %e, "connect via hostname failed, falling back to IP");
                    last_err = Some(e);
                }
            }
        }

        match transport
            .connect(ip_address, username, password, connection.timeout)
            .await
        {
            Ok(()) => return true,
            Err(e) => {
                last_err = Some(e);
                if attempt < connection.retry_attempts {
                    tokio::time::sleep(std::time::Duration::from_secs(connection.retry_delay)).await;
                }
            }
        }
    }

    if let Some(source) = last_err {
        let err = CrawlError::ConnectFailure {
            host: hostname.to_string(),
            ip: ip_address.to_string(),
            source,
        };
        warn!(host = hostname, error = %err, "connect failed after all retries");
    }
    false
}

/// Run `command` with the same retry policy as connect. Returns `None`
/// (not an error) once retries are exhausted — the caller treats that
/// phase as yielding no data (spec §4.B). The final failure is surfaced
/// once as a `CrawlError::CommandFailure` before being absorbed (spec §7).
async fn run_command_with_retry(
    transport: &mut dyn DeviceTransport,
    host: &str,
    command: &str,
    connection: &ConnectionConfig,
) -> Option<String> {
    let mut last_err = None;

    for attempt in 1..=connection.retry_attempts {
        match transport.send_command(command).await {
            Ok(output) => return Some(output),
            Err(e) => {
                last_err = Some(e);
                if attempt < connection.retry_attempts {
                    tokio::time::sleep(std::time::Duration::from_secs(connection.retry_delay)).await;
                }
            }
        }
    }

    if let Some(source) = last_err {
        let err = CrawlError::CommandFailure {
            host: host.to_string(),
            command: command.to_string(),
            source,
        };
        warn!(host, error = %err, "command failed after all retries");
    }
    None
}
