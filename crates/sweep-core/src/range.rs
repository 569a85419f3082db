//! Range specifications: `a.b.c.d/mask` or a bare `a.b.c.d`.
//!
//! Validation bounds the amount of work a single line can request. The
//! first octet must fall in 1-238 (no "this network", multicast or
//! reserved space), the remaining octets in 0-255, and the prefix length
//! in 17-32. A /16 or wider is rejected outright rather than truncated.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::{Ipv4AddrRange, Ipv4Net};

use crate::error::{RangeSpecError, Result};

/// Smallest accepted prefix length.
pub const MIN_PREFIX: u32 = 17;

/// Largest accepted prefix length; also the implied mask of a bare address.
pub const MAX_PREFIX: u32 = 32;

/// A validated IPv4 range specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    net: Ipv4Net,
}

impl RangeSpec {
    /// The address as written, host bits included.
    pub fn addr(&self) -> Ipv4Addr {
        self.net.addr()
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Number of addresses covered by the mask. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        1u64 << (MAX_PREFIX - u32::from(self.net.prefix_len()))
    }

    /// Every address covered by the mask, network and broadcast included.
    pub fn addresses(&self) -> Ipv4AddrRange {
        let block = self.net.trunc();
        Ipv4AddrRange::new(block.network(), block.broadcast())
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for RangeSpec {
    type Err = RangeSpecError;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        let (addr_part, mask_part) = match spec.split_once('/') {
            Some((addr, mask)) => (addr, Some(mask)),
            None => (spec, None),
        };

        let octets = parse_octets(spec, addr_part)?;

        if octets[0] == 0 || octets[0] >= 239 {
            return Err(RangeSpecError::FirstOctet {
                spec: spec.to_string(),
                octet: octets[0],
            });
        }
        for (idx, &value) in octets.iter().enumerate().skip(1) {
            if value > 255 {
                return Err(RangeSpecError::Octet {
                    spec: spec.to_string(),
                    position: idx + 1,
                    value,
                });
            }
        }

        let prefix = match mask_part {
            None => MAX_PREFIX,
            Some(mask) => {
                let prefix = parse_number(mask).ok_or_else(|| RangeSpecError::Malformed {
                    spec: spec.to_string(),
                    reason: "prefix length is not a number",
                })?;
                if !(MIN_PREFIX..=MAX_PREFIX).contains(&prefix) {
                    return Err(RangeSpecError::PrefixLength {
                        spec: spec.to_string(),
                        prefix,
                    });
                }
                prefix
            }
        };

        let addr = Ipv4Addr::new(
            octets[0] as u8,
            octets[1] as u8,
            octets[2] as u8,
            octets[3] as u8,
        );
        let net = Ipv4Net::new(addr, prefix as u8).map_err(|_| RangeSpecError::PrefixLength {
            spec: spec.to_string(),
            prefix,
        })?;

        Ok(Self { net })
    }
}

fn parse_octets(spec: &str, addr: &str) -> Result<[u32; 4]> {
    let parts: Vec<&str> = addr.split('.').collect();
    if parts.len() != 4 {
        return Err(RangeSpecError::Malformed {
            spec: spec.to_string(),
            reason: "expected four dotted octets",
        });
    }

    let mut octets = [0u32; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        *slot = parse_number(part).ok_or_else(|| RangeSpecError::Malformed {
            spec: spec.to_string(),
            reason: "octet is not a number",
        })?;
    }
    Ok(octets)
}

/// Plain decimal digits only: no sign, no whitespace.
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
