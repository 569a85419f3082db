//! Liveness probing: one ICMP echo per target, no retries.
//!
//! A single dropped packet marks the target unreachable for the rest of
//! the scan.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence};

use crate::error::{DiscoverError, Result};

/// Echo payload size, matching the common `ping` default.
const PAYLOAD_LEN: usize = 56;

/// Decides whether an address is worth probing further.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_alive(&self, addr: Ipv4Addr) -> bool;
}

/// ICMP echo prober backed by `surge-ping`.
pub struct IcmpProber {
    client: Client,
    timeout: Duration,
    next_id: AtomicU16,
}

impl IcmpProber {
    /// Open the ICMP socket. Fails without raw-socket privileges.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client =
            Client::new(&Config::default()).map_err(|e| DiscoverError::Icmp(e.to_string()))?;
        Ok(Self {
            client,
            timeout,
            next_id: AtomicU16::new(std::process::id() as u16),
        })
    }
}

#[async_trait]
impl LivenessProbe for IcmpProber {
    async fn is_alive(&self, addr: Ipv4Addr) -> bool {
        let ident = PingIdentifier(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut pinger = self.client.pinger(IpAddr::V4(addr), ident).await;
        pinger.timeout(self.timeout);

        match pinger.ping(PingSequence(0), &[0u8; PAYLOAD_LEN]).await {
            Ok((_, rtt)) => {
                tracing::debug!(address = %addr, rtt_ms = rtt.as_millis(), "Echo reply");
                true
            }
            Err(e) => {
                tracing::debug!(address = %addr, error = %e, "No echo reply");
                false
            }
        }
    }
}

/// Treats every address as reachable, for networks that filter ICMP.
pub struct AssumeAlive;

#[async_trait]
impl LivenessProbe for AssumeAlive {
    async fn is_alive(&self, _addr: Ipv4Addr) -> bool {
        true
    }
}
