//! sweep-core: Shared types for the SNMP sweep engine.
//!
//! This crate provides the foundational types used by the discovery engine:
//! - Range specifications (`a.b.c.d/mask`) with validation and enumeration
//! - SNMP protocol versions, credentials, and the fixed identity OID set
//! - Per-address scan records and their reachability state

pub mod error;
pub mod range;
pub mod types;

pub use error::RangeSpecError;
pub use range::RangeSpec;
pub use types::{
    Credential, Discovery, Identity, IdentityField, Reachability, SnmpVersion, TargetRecord,
};
