//! sweep-discover: SNMP device discovery for unknown infrastructure.
//!
//! Expands range specifications into a deduplicated target set, drops
//! targets that do not answer a liveness probe, and brute-forces
//! (SNMP version × community string) against the rest to read each
//! device's sysName, sysLocation, sysContact and sysUpTime.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod liveness;
pub mod output;
pub mod search;
pub mod snmp;
pub mod store;
pub mod targets;

pub use coordinator::{ScanCoordinator, ScanSummary};
pub use error::{DiscoverError, SnmpError};
pub use store::ResultStore;
