//! SNMP session plumbing and single-object identity fetches.
//!
//! Sessions are cheap to open: binding the UDP socket involves no round
//! trip, so a bad community string is only detected by the first `get`.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use snmp2::{AsyncSession, Oid, Value};
use tokio::time::timeout;

use sweep_core::types::{Credential, IdentityField, SnmpVersion};

use crate::error::SnmpError;

/// An open session bound to one (address, credential) pair.
#[async_trait]
pub trait IdentitySession: Send {
    /// Issue one GET for `field`. No retries.
    async fn get(&mut self, field: IdentityField) -> Result<String, SnmpError>;
}

/// Opens sessions for the credential search.
#[async_trait]
pub trait SnmpConnector: Send + Sync {
    async fn open(
        &self,
        addr: Ipv4Addr,
        credential: &Credential,
    ) -> Result<Box<dyn IdentitySession>, SnmpError>;
}

/// Fetch one identity field, collapsing every failure to `None`.
///
/// `None` means the query produced no result; `Some("")` is an empty value
/// the device actually reported.
pub async fn fetch_field(
    session: &mut dyn IdentitySession,
    field: IdentityField,
) -> Option<String> {
    match session.get(field).await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(
                field = %field,
                oid = field.oid(),
                error = %e,
                "Identity query failed"
            );
            None
        }
    }
}

/// Connector backed by the `snmp2` async client.
pub struct Snmp2Connector {
    port: u16,
    timeout: Duration,
}

impl Snmp2Connector {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl SnmpConnector for Snmp2Connector {
    async fn open(
        &self,
        addr: Ipv4Addr,
        credential: &Credential,
    ) -> Result<Box<dyn IdentitySession>, SnmpError> {
        let target = format!("{}:{}", addr, self.port);
        let community = credential.community.as_bytes();

        let inner = match credential.version {
            SnmpVersion::V2c => AsyncSession::new_v2c(target.as_str(), community, 0).await,
            SnmpVersion::V1 => AsyncSession::new_v1(target.as_str(), community, 0).await,
        }
        .map_err(|source| SnmpError::Session {
            addr: target.clone(),
            source,
        })?;

        Ok(Box::new(Snmp2Session {
            inner,
            timeout: self.timeout,
        }))
    }
}

struct Snmp2Session {
    inner: AsyncSession,
    timeout: Duration,
}

#[async_trait]
impl IdentitySession for Snmp2Session {
    async fn get(&mut self, field: IdentityField) -> Result<String, SnmpError> {
        let oid = Oid::from(field.arcs())
            .map_err(|_| SnmpError::InvalidOid(field.oid().to_string()))?;

        let mut response = match timeout(self.timeout, self.inner.get(&oid)).await {
            Ok(Ok(pdu)) => pdu,
            Ok(Err(e)) => return Err(SnmpError::Request(format!("{e:?}"))),
            Err(_) => {
                return Err(SnmpError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        if response.error_status != 0 {
            return Err(SnmpError::ErrorStatus {
                status: response.error_status,
            });
        }

        match response.varbinds.next() {
            Some((_, value)) => render_value(&value),
            None => Err(SnmpError::EmptyResponse),
        }
    }
}

/// Textual form of a varbind value.
fn render_value(value: &Value<'_>) -> Result<String, SnmpError> {
    match value {
        Value::OctetString(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Value::Timeticks(ticks) => Ok(format_timeticks(*ticks)),
        Value::Integer(n) => Ok(n.to_string()),
        Value::Counter32(n) | Value::Unsigned32(n) => Ok(n.to_string()),
        Value::Counter64(n) => Ok(n.to_string()),
        Value::IpAddress(octets) => Ok(Ipv4Addr::from(*octets).to_string()),
        Value::Null | Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
            Err(SnmpError::NoSuchObject)
        }
        other => Ok(format!("{other:?}")),
    }
}

/// Render TimeTicks (hundredths of a second) as `"<d> days, hh:mm:ss.cc"`.
pub fn format_timeticks(ticks: u32) -> String {
    let centis = ticks % 100;
    let total_secs = ticks / 100;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    let days = total_secs / 86_400;
    let unit = if days == 1 { "day" } else { "days" };
    format!("{days} {unit}, {hours:02}:{mins:02}:{secs:02}.{centis:02}")
}
