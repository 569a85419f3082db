//! Target set construction from range specifications.

use sweep_core::range::RangeSpec;

use crate::store::ResultStore;

/// Counts from one pass over the range specifications.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Distinct addresses in the store after the pass.
    pub addresses: usize,
}

/// Expand every valid specification into `store`.
///
/// Invalid specifications are logged and skipped; they never abort the batch.
pub fn add_ranges<S: AsRef<str>>(store: &mut ResultStore, specs: &[S]) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for raw in specs {
        let raw = raw.as_ref();
        let spec: RangeSpec = match raw.parse() {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(spec = %raw.trim(), error = %e, "Range specification skipped");
                summary.rejected += 1;
                continue;
            }
        };

        tracing::debug!(spec = %spec, addresses = spec.len(), "Expanding range");
        for addr in spec.addresses() {
            store.contribute(addr);
        }
        summary.accepted += 1;
    }

    summary.addresses = store.len();
    summary
}

/// Build a fresh target set.
pub fn build_target_set<S: AsRef<str>>(specs: &[S]) -> (ResultStore, BuildSummary) {
    let mut store = ResultStore::new();
    let summary = add_ranges(&mut store, specs);
    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        targets = summary.addresses,
        "Target set built"
    );
    (store, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_overlapping_ranges_deduplicate() {
        let (store, summary) = build_target_set(&["10.0.0.0/30", "10.0.0.2/31", "10.0.0.3"]);

        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.rejected, 0);
        assert_eq!(store.len(), 4);

        let counts: Vec<u32> = store.iter().map(|(_, r)| r.contribution_count()).collect();
        // .0 and .1 from the /30; .2 from /30 and /31; .3 from all three.
        assert_eq!(counts, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_invalid_specs_skipped_not_fatal() {
        let (store, summary) = build_target_set(&[
            "10.0.0.0/8",
            "0.0.0.1",
            "239.0.0.1",
            "10.0.0.1/33",
            "garbage",
            "192.168.5.1",
        ]);

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 5);
        assert_eq!(store.addresses(), vec![Ipv4Addr::new(192, 168, 5, 1)]);
    }

    #[test]
    fn test_add_ranges_extends_existing_store() {
        let (mut store, _) = build_target_set(&["172.16.0.0/24"]);
        let summary = add_ranges(&mut store, &["172.16.0.128/25"]);

        assert_eq!(summary.addresses, 256);
        let probe = Ipv4Addr::new(172, 16, 0, 200);
        assert_eq!(store.get(&probe).unwrap().contribution_count(), 2);
        let low = Ipv4Addr::new(172, 16, 0, 1);
        assert_eq!(store.get(&low).unwrap().contribution_count(), 1);
    }
}
