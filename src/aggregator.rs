// src/aggregator.rs
use log::{debug, error, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{self, JoinError, JoinSet};

use crate::classify::{apply_outcome, mark_offline};
use crate::models::server::{Roster, Snapshot};
use crate::probe::{Probe, ProbeFailure, ProbeOutcome};

#[derive(Debug)]
pub enum AggregateError {
    ProbeTaskPanicked { server_id: String, message: String },
    ProbeTaskCancelled { server_id: String },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeTaskPanicked { server_id, message } => {
                write!(f, "Probe task for {} panicked: {}", server_id, message)
            }
            Self::ProbeTaskCancelled { server_id } => {
                write!(f, "Probe task for {} was cancelled", server_id)
            }
        }
    }
}

impl std::error::Error for AggregateError {}

impl AggregateError {
    fn from_join(server_id: String, err: JoinError) -> Self {
        if err.is_panic() {
            let payload = err.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Self::ProbeTaskPanicked { server_id, message }
        } else {
            Self::ProbeTaskCancelled { server_id }
        }
    }
}

/// (category index, server index) inside the copied roster.
type Slot = (usize, usize);

pub struct Aggregator<P> {
    prober: Arc<P>,
}

impl<P> Clone for Aggregator<P> {
    fn clone(&self) -> Self {
        Self { prober: Arc::clone(&self.prober) }
    }
}

impl<P: Probe> Aggregator<P> {
    pub fn new(prober: P) -> Self {
        Self { prober: Arc::new(prober) }
    }

    /// Probes every server in the roster and returns a fresh snapshot. Never
    /// fails: if the round cannot complete, the fallback document is returned.
    pub async fn build_snapshot(&self, roster: &Roster) -> Snapshot {
        let started = Instant::now();
        match self.try_build(roster).await {
            Ok(snapshot) => {
                info!(
                    "Snapshot built: {}/{} online in {}ms",
                    snapshot.online_count(),
                    snapshot.roster().server_count(),
                    started.elapsed().as_millis()
                );
                snapshot
            }
            Err(e) => {
                error!("Snapshot build failed, serving all-offline fallback: {}", e);
                fallback_snapshot(roster)
            }
        }
    }

    pub async fn try_build(&self, roster: &Roster) -> Result<Snapshot, AggregateError> {
        let mut copy = roster.clone();
        // Dropping the set aborts every probe still in flight, so a caller
        // that gives up on the snapshot also cancels its outbound requests.
        let mut probes: JoinSet<(Slot, ProbeOutcome)> = JoinSet::new();
        let mut server_ids: HashMap<task::Id, String> = HashMap::new();

        for (ci, category) in copy.categories.iter_mut().enumerate() {
            for (si, server) in category.servers_mut().iter_mut().enumerate() {
                if server.probe_link().is_none() {
                    apply_outcome(server, ProbeOutcome::Failure(ProbeFailure::NoEndpoint));
                    continue;
                }
                let prober = Arc::clone(&self.prober);
                let target = server.clone();
                let handle = probes.spawn(async move { ((ci, si), prober.probe(&target).await) });
                server_ids.insert(handle.id(), server.id.clone());
            }
        }

        debug!("Waiting on {} probe tasks", probes.len());

        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(((ci, si), outcome)) => {
                    apply_outcome(&mut copy.categories[ci].servers_mut()[si], outcome);
                }
                Err(e) => {
                    let server_id = server_ids.remove(&e.id()).unwrap_or_default();
                    return Err(AggregateError::from_join(server_id, e));
                }
            }
        }

        Ok(Snapshot::new(copy))
    }
}

/// The degraded document: a copy of the roster with every server offline.
pub fn fallback_snapshot(roster: &Roster) -> Snapshot {
    let mut copy = roster.clone();
    for server in copy.servers_mut() {
        mark_offline(server);
    }
    Snapshot::new(copy)
}
