//! Desired-task convergence.

use std::sync::Arc;

use tracing::{info, warn};

use strix_core::DesiredTask;
use strix_missions::{MissionFactory, mission_for_task};
use strix_peers::PeerView;
use strix_runtime::MissionRuntime;

/// Converges this device on the cluster-wide desired task.
///
/// Runs in the control context, once per tick. Tie-break when peers
/// disagree is first-observed-wins per tick: the local claim, then the
/// first online cluster member advertising a desired task. Transient
/// disagreement resolves on a later tick.
pub struct ClusterCoordinator {
    runtime: Arc<MissionRuntime>,
    factory: MissionFactory,
    cluster: String,
    /// Desired task this device itself is advertising, if any.
    local_claim: Option<DesiredTask>,
    /// Task id last staged through the runtime.
    last_applied: Option<String>,
    /// Whether the staged task has been started locally.
    start_confirmed: bool,
}

impl ClusterCoordinator {
    pub fn new(runtime: Arc<MissionRuntime>, factory: MissionFactory, cluster: impl Into<String>) -> Self {
        Self {
            runtime,
            factory,
            cluster: cluster.into(),
            local_claim: None,
            last_applied: None,
            start_confirmed: false,
        }
    }

    /// Advertise a desired task from this device (e.g. a user picked a
    /// coordinated task through the API).
    pub fn set_local_claim(&mut self, desired: DesiredTask) {
        info!(task = %desired.id, "local cluster claim set");
        self.local_claim = Some(desired);
    }

    /// Request the staged task to start, cluster-wide.
    pub fn request_start(&mut self) {
        if let Some(claim) = self.local_claim.as_mut() {
            claim.start = true;
        }
    }

    pub fn clear_local_claim(&mut self) {
        self.local_claim = None;
    }

    /// The desired-task signal this device advertises in its own
    /// status document.
    pub fn advertised(&self) -> Option<DesiredTask> {
        if self.local_claim.is_some() {
            return self.local_claim.clone();
        }
        // Re-advertise what was applied so convergence spreads beyond
        // direct observers.
        self.last_applied.as_ref().map(|id| DesiredTask {
            id: id.clone(),
            params: serde_json::Value::Null,
            start: self.start_confirmed,
        })
    }

    /// Task id currently applied, if any.
    pub fn applied_task(&self) -> Option<&str> {
        self.last_applied.as_deref()
    }

    /// One convergence pass over the latest peer snapshot.
    pub async fn tick(&mut self, peers: &[PeerView]) {
        let Some(desired) = self.observe(peers) else {
            return;
        };

        if self.last_applied.as_deref() != Some(desired.id.as_str()) {
            let Some(mission_name) = mission_for_task(&desired.id) else {
                warn!(task = %desired.id, "desired task has no mission mapping");
                return;
            };

            info!(task = %desired.id, mission = mission_name, "staging cluster task");
            let mut mission = self.factory.create(mission_name);
            mission.configure(&desired.id, &desired.params);
            self.runtime.stage(mission).await;

            self.last_applied = Some(desired.id.clone());
            self.start_confirmed = false;
        }

        if desired.start && !self.start_confirmed && self.runtime.start().await {
            info!(task = %desired.id, "cluster task started");
            self.start_confirmed = true;
        }
    }

    /// First-observed-wins: the local claim, then the first online
    /// member of this cluster with a desired-task signal.
    fn observe(&self, peers: &[PeerView]) -> Option<DesiredTask> {
        if let Some(claim) = &self.local_claim {
            return Some(claim.clone());
        }
        peers
            .iter()
            .filter(|p| p.online && p.cluster == self.cluster)
            .find_map(|p| p.desired.clone())
    }
}
