//! Result store: one [`TargetRecord`] per distinct address.
//!
//! Keys are `Ipv4Addr`, whose ordering is numeric, so iteration always
//! yields `10.0.0.2` before `10.0.0.10`.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use sweep_core::types::{Discovery, TargetRecord};

#[derive(Debug, Default)]
pub struct ResultStore {
    records: BTreeMap<Ipv4Addr, TargetRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more contribution for `addr`, creating its record on first sight.
    pub fn contribute(&mut self, addr: Ipv4Addr) {
        self.records
            .entry(addr)
            .and_modify(TargetRecord::add_contribution)
            .or_insert_with(TargetRecord::new);
    }

    pub fn get(&self, addr: &Ipv4Addr) -> Option<&TargetRecord> {
        self.records.get(addr)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Addresses in ascending numeric order.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        self.records.keys().copied().collect()
    }

    /// All records in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &TargetRecord)> {
        self.records.iter()
    }

    /// Records that carry a working credential, in ascending numeric order.
    pub fn ready(&self) -> impl Iterator<Item = (&Ipv4Addr, &Discovery)> {
        self.records
            .iter()
            .filter_map(|(addr, record)| record.discovery().map(|d| (addr, d)))
    }

    /// Apply the outcome of one address's pipeline. Unknown addresses are ignored.
    pub fn apply(&mut self, addr: Ipv4Addr, alive: bool, discovery: Option<Discovery>) {
        let Some(record) = self.records.get_mut(&addr) else {
            tracing::warn!(address = %addr, "Outcome for address outside the target set dropped");
            return;
        };
        record.set_reachable(alive);
        if let Some(discovery) = discovery {
            record.set_discovery(discovery);
        }
    }
}
