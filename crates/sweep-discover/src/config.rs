//! Configuration for the sweep-discover scanner.

use std::time::Duration;

use serde::Deserialize;

/// Top-level discover configuration.
///
/// Loaded from `sweep.toml` `[discover]` section or
/// `SWEEP_DISCOVER__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    /// UDP port SNMP agents listen on.
    #[serde(default = "default_snmp_port")]
    pub snmp_port: u16,

    /// Per-request SNMP timeout in milliseconds.
    #[serde(default = "default_snmp_timeout_ms")]
    pub snmp_timeout_ms: u64,

    /// ICMP echo timeout in milliseconds.
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,

    /// How targets are checked for liveness before credential probing.
    #[serde(default)]
    pub liveness: LivenessMode,

    /// Number of addresses probed at once. 1 scans strictly in order.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Global deadline for the whole scan, in seconds.
    #[serde(default)]
    pub scan_timeout_secs: Option<u64>,
}

/// Liveness probe strategy.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LivenessMode {
    /// One ICMP echo request per target.
    #[default]
    Icmp,
    /// Treat every target as reachable.
    Skip,
}

impl DiscoverConfig {
    pub fn snmp_timeout(&self) -> Duration {
        Duration::from_millis(self.snmp_timeout_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs.map(Duration::from_secs)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.concurrency == 0 {
            return Err(crate::error::DiscoverError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.snmp_timeout_ms == 0 || self.ping_timeout_ms == 0 {
            return Err(crate::error::DiscoverError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_snmp_port() -> u16 {
    161
}

fn default_snmp_timeout_ms() -> u64 {
    1000
}

fn default_ping_timeout_ms() -> u64 {
    1000
}

fn default_concurrency() -> usize {
    1
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            snmp_port: default_snmp_port(),
            snmp_timeout_ms: default_snmp_timeout_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            liveness: LivenessMode::default(),
            concurrency: default_concurrency(),
            scan_timeout_secs: None,
        }
    }
}
