//! Output stage: CSV rows or a JSON report of every ready target.
//!
//! Only targets with a working credential are emitted, in ascending numeric
//! address order. Missing identity fields become the `none found` sentinel
//! in CSV and `null` in JSON.

use std::io::Write;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sweep_core::types::SnmpVersion;

use crate::coordinator::ScanSummary;
use crate::error::Result;
use crate::store::ResultStore;

pub const CSV_HEADER: [&str; 6] = [
    "address",
    "protocolVersion",
    "communityString",
    "sysName",
    "sysLocation",
    "sysContact",
];

/// Write one row per ready target in [`CSV_HEADER`] column order.
pub fn write_csv<W: Write>(store: &ResultStore, writer: W, header: bool) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    if header {
        csv.write_record(CSV_HEADER)?;
    }

    let mut rows = 0;
    for (addr, discovery) in store.ready() {
        let identity = &discovery.identity;
        csv.write_record([
            addr.to_string().as_str(),
            discovery.credential.version.as_str(),
            discovery.credential.community.as_str(),
            identity.sys_name.as_str(),
            identity.location_or_sentinel(),
            identity.contact_or_sentinel(),
        ])?;
        rows += 1;
    }

    csv.flush()?;
    Ok(rows)
}

/// A ready host as it appears in the JSON report.
#[derive(Debug, Serialize)]
pub struct HostReport {
    pub address: Ipv4Addr,
    pub version: SnmpVersion,
    pub community: String,
    pub sys_name: String,
    pub sys_location: Option<String>,
    pub sys_contact: Option<String>,
    pub sys_uptime: Option<String>,
    pub contribution_count: u32,
}

/// Full JSON report of a scan run.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: ScanSummary,
    pub hosts: Vec<HostReport>,
}

impl ScanReport {
    pub fn new(
        scan_id: Uuid,
        started_at: DateTime<Utc>,
        store: &ResultStore,
        summary: ScanSummary,
    ) -> Self {
        let hosts = store
            .iter()
            .filter_map(|(addr, record)| {
                let discovery = record.discovery()?;
                Some(HostReport {
                    address: *addr,
                    version: discovery.credential.version,
                    community: discovery.credential.community.clone(),
                    sys_name: discovery.identity.sys_name.clone(),
                    sys_location: discovery.identity.sys_location.clone(),
                    sys_contact: discovery.identity.sys_contact.clone(),
                    sys_uptime: discovery.identity.sys_uptime.clone(),
                    contribution_count: record.contribution_count(),
                })
            })
            .collect();

        Self {
            scan_id,
            started_at,
            finished_at: Utc::now(),
            summary,
            hosts,
        }
    }
}

pub fn write_json<W: Write>(report: &ScanReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
