//! Core domain types for the SNMP sweep engine.
//!
//! A scan produces one [`TargetRecord`] per distinct address. The record
//! only ever moves forward: reachability is decided once, and a
//! [`Discovery`] (winning credential plus identity) is attached at most once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendered in place of an identity field the device did not return.
pub const NONE_FOUND: &str = "none found";

/// Rendered in place of a value that was never determined.
pub const UNKNOWN: &str = "unknown";

// ── Protocol ──────────────────────────────────────────────────────

/// SNMP protocol versions that use community-string authentication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V2c,
    V1,
}

impl SnmpVersion {
    /// Search order. v2c is tried first for every community before
    /// falling back to v1.
    pub const SEARCH_ORDER: [SnmpVersion; 2] = [SnmpVersion::V2c, SnmpVersion::V1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2c => "v2c",
            Self::V1 => "v1",
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (version, community) pair tried against a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Credential {
    pub version: SnmpVersion,
    pub community: String,
}

impl Credential {
    pub fn new(version: SnmpVersion, community: impl Into<String>) -> Self {
        Self {
            version,
            community: community.into(),
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.version, self.community)
    }
}

// ── Identity ──────────────────────────────────────────────────────

/// The fixed set of system-group objects fetched from every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    SysUpTime,
    SysContact,
    SysName,
    SysLocation,
}

impl IdentityField {
    /// Fields fetched after sysName has proven the credential works.
    pub const SECONDARY: [IdentityField; 3] = [
        IdentityField::SysLocation,
        IdentityField::SysContact,
        IdentityField::SysUpTime,
    ];

    /// Numeric arcs of the instance OID.
    pub fn arcs(&self) -> &'static [u64] {
        match self {
            Self::SysUpTime => &[1, 3, 6, 1, 2, 1, 1, 3, 0],
            Self::SysContact => &[1, 3, 6, 1, 2, 1, 1, 4, 0],
            Self::SysName => &[1, 3, 6, 1, 2, 1, 1, 5, 0],
            Self::SysLocation => &[1, 3, 6, 1, 2, 1, 1, 6, 0],
        }
    }

    /// Dotted form with a leading dot, e.g. `.1.3.6.1.2.1.1.5.0`.
    pub fn oid(&self) -> &'static str {
        match self {
            Self::SysUpTime => ".1.3.6.1.2.1.1.3.0",
            Self::SysContact => ".1.3.6.1.2.1.1.4.0",
            Self::SysName => ".1.3.6.1.2.1.1.5.0",
            Self::SysLocation => ".1.3.6.1.2.1.1.6.0",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SysUpTime => "sysUpTime",
            Self::SysContact => "sysContact",
            Self::SysName => "sysName",
            Self::SysLocation => "sysLocation",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity data retrieved from a device.
///
/// `sys_name` is always a real value: the credential search only succeeds
/// once sysName has been read. The other fields are `None` when their
/// query failed; an empty string is a value the device actually reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub sys_name: String,
    pub sys_location: Option<String>,
    pub sys_contact: Option<String>,
    pub sys_uptime: Option<String>,
}

impl Identity {
    pub fn new(sys_name: impl Into<String>) -> Self {
        Self {
            sys_name: sys_name.into(),
            ..Default::default()
        }
    }

    /// Store the result of a secondary field query.
    pub fn set(&mut self, field: IdentityField, value: Option<String>) {
        match field {
            IdentityField::SysName => {
                if let Some(name) = value {
                    self.sys_name = name;
                }
            }
            IdentityField::SysLocation => self.sys_location = value,
            IdentityField::SysContact => self.sys_contact = value,
            IdentityField::SysUpTime => self.sys_uptime = value,
        }
    }

    pub fn location_or_sentinel(&self) -> &str {
        self.sys_location.as_deref().unwrap_or(NONE_FOUND)
    }

    pub fn contact_or_sentinel(&self) -> &str {
        self.sys_contact.as_deref().unwrap_or(NONE_FOUND)
    }
}

// ── Records ───────────────────────────────────────────────────────

/// Outcome of the liveness probe.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    #[default]
    Unknown,
    Yes,
    No,
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => UNKNOWN,
            Self::Yes => "yes",
            Self::No => "no",
        })
    }
}

/// The winning credential and what it retrieved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discovery {
    pub credential: Credential,
    pub identity: Identity,
}

/// Per-address scan state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetRecord {
    contribution_count: u32,
    reachable: Reachability,
    discovery: Option<Discovery>,
}

impl TargetRecord {
    pub fn new() -> Self {
        Self {
            contribution_count: 1,
            ..Default::default()
        }
    }

    /// How many input ranges produced this address. Diagnostic only.
    pub fn contribution_count(&self) -> u32 {
        self.contribution_count
    }

    pub fn add_contribution(&mut self) {
        self.contribution_count = self.contribution_count.saturating_add(1);
    }

    pub fn reachable(&self) -> Reachability {
        self.reachable
    }

    /// True once a credential search succeeded.
    pub fn is_ready(&self) -> bool {
        self.discovery.is_some()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.discovery.as_ref().map(|d| &d.credential)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.discovery.as_ref().map(|d| &d.identity)
    }

    pub fn discovery(&self) -> Option<&Discovery> {
        self.discovery.as_ref()
    }

    /// Record the liveness verdict. An unreachable target never carries a
    /// discovery.
    pub fn set_reachable(&mut self, alive: bool) {
        if alive {
            self.reachable = Reachability::Yes;
        } else {
            self.reachable = Reachability::No;
            self.discovery = None;
        }
    }

    /// Attach the winning credential. Ignored unless the target was found
    /// reachable.
    pub fn set_discovery(&mut self, discovery: Discovery) -> bool {
        if self.reachable != Reachability::Yes {
            return false;
        }
        self.discovery = Some(discovery);
        true
    }
}
