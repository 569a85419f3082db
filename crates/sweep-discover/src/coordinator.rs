//! Scan orchestration: liveness, then credential search, per address.
//!
//! With a concurrency of 1 addresses are processed strictly one after the
//! other in ascending numeric order. With N > 1 at most N per-address
//! pipelines run at once on a `JoinSet`. Either way the coordinator is the
//! only writer of the [`ResultStore`]: pipelines return their outcome and
//! never touch the store themselves, and each address is dispatched once.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinSet;

use sweep_core::types::{Discovery, Reachability};

use crate::liveness::LivenessProbe;
use crate::search::CredentialSearcher;
use crate::store::ResultStore;
use crate::targets;

/// What one address's pipeline produced.
#[derive(Debug)]
struct TargetOutcome {
    addr: Ipv4Addr,
    alive: bool,
    discovery: Option<Discovery>,
}

/// End-of-run counts.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub targets: usize,
    pub reachable: usize,
    pub unreachable: usize,
    pub ready: usize,
    /// Reachable, but no candidate answered.
    pub exhausted: usize,
    /// Never dispatched because the scan was interrupted.
    pub not_scanned: usize,
    pub interrupted: bool,
    pub duration_ms: u64,
}

impl ScanSummary {
    pub fn from_store(store: &ResultStore, interrupted: bool, duration: Duration) -> Self {
        let mut summary = Self {
            targets: store.len(),
            interrupted,
            duration_ms: duration.as_millis() as u64,
            ..Default::default()
        };
        for (_, record) in store.iter() {
            match record.reachable() {
                Reachability::Yes if record.is_ready() => {
                    summary.reachable += 1;
                    summary.ready += 1;
                }
                Reachability::Yes => {
                    summary.reachable += 1;
                    summary.exhausted += 1;
                }
                Reachability::No => summary.unreachable += 1,
                Reachability::Unknown => summary.not_scanned += 1,
            }
        }
        summary
    }
}

pub struct ScanCoordinator {
    liveness: Arc<dyn LivenessProbe>,
    searcher: CredentialSearcher,
    concurrency: usize,
}

impl ScanCoordinator {
    /// Sequential coordinator.
    pub fn new(liveness: Arc<dyn LivenessProbe>, searcher: CredentialSearcher) -> Self {
        Self {
            liveness,
            searcher,
            concurrency: 1,
        }
    }

    /// Allow up to `n` addresses in flight. Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Build the target set from `specs` and scan it.
    pub async fn scan<S: AsRef<str>>(
        &self,
        specs: &[S],
        shutdown: watch::Receiver<bool>,
    ) -> (ResultStore, ScanSummary) {
        let (mut store, _) = targets::build_target_set(specs);
        let summary = self.run(&mut store, shutdown).await;
        (store, summary)
    }

    /// Scan every address in `store`.
    ///
    /// Once `shutdown` flips to `true` no further addresses are dispatched;
    /// pipelines already running are allowed to finish and their outcomes
    /// are kept.
    pub async fn run(
        &self,
        store: &mut ResultStore,
        shutdown: watch::Receiver<bool>,
    ) -> ScanSummary {
        let start = Instant::now();
        let addresses = store.addresses();

        tracing::info!(
            targets = addresses.len(),
            communities = self.searcher.communities().len(),
            concurrency = self.concurrency,
            "Starting scan"
        );

        let interrupted = if self.concurrency == 1 {
            self.run_sequential(store, addresses, &shutdown).await
        } else {
            self.run_pooled(store, addresses, &shutdown).await
        };

        let summary = ScanSummary::from_store(store, interrupted, start.elapsed());
        tracing::info!(
            targets = summary.targets,
            reachable = summary.reachable,
            unreachable = summary.unreachable,
            ready = summary.ready,
            exhausted = summary.exhausted,
            not_scanned = summary.not_scanned,
            interrupted = summary.interrupted,
            duration_ms = summary.duration_ms,
            "Scan complete"
        );
        summary
    }

    async fn run_sequential(
        &self,
        store: &mut ResultStore,
        addresses: Vec<Ipv4Addr>,
        shutdown: &watch::Receiver<bool>,
    ) -> bool {
        for addr in addresses {
            if *shutdown.borrow() {
                tracing::warn!(next = %addr, "Scan interrupted");
                return true;
            }
            let outcome = probe_target(addr, self.liveness.as_ref(), &self.searcher).await;
            store.apply(outcome.addr, outcome.alive, outcome.discovery);
        }
        false
    }

    async fn run_pooled(
        &self,
        store: &mut ResultStore,
        addresses: Vec<Ipv4Addr>,
        shutdown: &watch::Receiver<bool>,
    ) -> bool {
        let mut pending = addresses.into_iter();
        let mut in_flight: JoinSet<TargetOutcome> = JoinSet::new();
        let mut interrupted = false;

        loop {
            while !interrupted && in_flight.len() < self.concurrency {
                if *shutdown.borrow() {
                    tracing::warn!(in_flight = in_flight.len(), "Scan interrupted, draining");
                    interrupted = true;
                    break;
                }
                let Some(addr) = pending.next() else {
                    break;
                };
                let liveness = Arc::clone(&self.liveness);
                let searcher = self.searcher.clone();
                in_flight.spawn(async move {
                    probe_target(addr, liveness.as_ref(), &searcher).await
                });
            }

            match in_flight.join_next().await {
                Some(Ok(outcome)) => store.apply(outcome.addr, outcome.alive, outcome.discovery),
                Some(Err(e)) => tracing::error!(error = %e, "Target task failed"),
                None => break,
            }
        }

        interrupted
    }
}

/// Liveness probe followed, if alive, by the credential search.
async fn probe_target(
    addr: Ipv4Addr,
    liveness: &dyn LivenessProbe,
    searcher: &CredentialSearcher,
) -> TargetOutcome {
    if !liveness.is_alive(addr).await {
        tracing::debug!(address = %addr, "Unreachable, skipping credential search");
        return TargetOutcome {
            addr,
            alive: false,
            discovery: None,
        };
    }

    TargetOutcome {
        addr,
        alive: true,
        discovery: searcher.search(addr).await,
    }
}
