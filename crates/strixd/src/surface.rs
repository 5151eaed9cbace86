//! Control surface handed to the external API layer.
//!
//! The HTTP front-end is not part of this core; it gets this handle
//! instead. Everything here takes snapshots or routes through the
//! owning component's lock, so callers never touch live state.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use strix_cluster::ClusterCoordinator;
use strix_core::{DesiredTask, DeviceConfig, StatusDoc, Task, TaskDescriptor, TaskKind, TaskView};
use strix_missions::{MissionFactory, mission_for_task, task_catalog};
use strix_peers::{PeerDirectory, PeerView};
use strix_runtime::MissionRuntime;
use strix_scheduler::Scheduler;

use crate::status;

/// Errors surfaced to external callers.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("unknown task id: {0}")]
    UnknownTask(String),
}

/// Cheap-to-clone handle over the node's components.
#[derive(Clone)]
pub struct ControlSurface {
    config: DeviceConfig,
    factory: MissionFactory,
    runtime: Arc<MissionRuntime>,
    scheduler: Arc<Mutex<Scheduler>>,
    directory: Arc<Mutex<PeerDirectory>>,
    coordinator: Arc<Mutex<ClusterCoordinator>>,
}

impl ControlSurface {
    pub(crate) fn new(
        config: DeviceConfig,
        factory: MissionFactory,
        runtime: Arc<MissionRuntime>,
        scheduler: Arc<Mutex<Scheduler>>,
        directory: Arc<Mutex<PeerDirectory>>,
        coordinator: Arc<Mutex<ClusterCoordinator>>,
    ) -> Self {
        Self {
            config,
            factory,
            runtime,
            scheduler,
            directory,
            coordinator,
        }
    }

    // ── Scheduler ──────────────────────────────────────────────────

    pub async fn enqueue(&self, task: Task) {
        self.scheduler.lock().await.enqueue(task);
    }

    pub async fn preempt(&self, task: Task) {
        self.scheduler.lock().await.preempt(task).await;
    }

    pub async fn current_task(&self) -> Option<TaskView> {
        self.scheduler.lock().await.current_task()
    }

    pub async fn queued_tasks(&self) -> Vec<TaskView> {
        self.scheduler.lock().await.queued_tasks()
    }

    /// Start a catalog task immediately, bypassing the queue.
    pub async fn start_task(&self, task_id: &str, params: Value) -> Result<(), SurfaceError> {
        let task = self.task_from_catalog(task_id, params)?;
        self.scheduler.lock().await.preempt(task).await;
        Ok(())
    }

    /// Stage a catalog task without starting it.
    ///
    /// The staged mission bypasses the scheduler's task record, exactly
    /// like cluster staging: it is not "current" until started.
    pub async fn stage_task(&self, task_id: &str, params: Value) -> Result<(), SurfaceError> {
        let mission_name = mission_for_task(task_id)
            .ok_or_else(|| SurfaceError::UnknownTask(task_id.to_string()))?;

        let mut mission = self.factory.create(mission_name);
        mission.configure(task_id, &params);
        self.runtime.stage(mission).await;
        Ok(())
    }

    /// Start a previously staged mission.
    pub async fn start_staged(&self) -> bool {
        self.runtime.start().await
    }

    // ── Catalog ────────────────────────────────────────────────────

    pub fn catalog(&self) -> Vec<TaskDescriptor> {
        task_catalog()
    }

    // ── Peers ──────────────────────────────────────────────────────

    pub async fn peers(&self) -> Vec<PeerView> {
        self.directory.lock().await.snapshot()
    }

    pub async fn track_incoming(&self, address: &str) {
        self.directory.lock().await.track_incoming(address);
    }

    pub async fn ping(&self, address: &str) -> bool {
        self.directory.lock().await.ping(address).await
    }

    /// Record a ranging observation against a known peer. Fed by the
    /// external short-range radio driver.
    pub async fn record_peer_ranging(&self, address: &str, rssi: i64) {
        self.directory.lock().await.record_ranging(address, rssi);
    }

    // ── Cluster ────────────────────────────────────────────────────

    /// Advertise a desired task for the whole cluster.
    pub async fn set_cluster_task(
        &self,
        task_id: &str,
        params: Value,
    ) -> Result<(), SurfaceError> {
        if mission_for_task(task_id).is_none() {
            return Err(SurfaceError::UnknownTask(task_id.to_string()));
        }
        self.coordinator.lock().await.set_local_claim(DesiredTask {
            id: task_id.to_string(),
            params,
            start: false,
        });
        Ok(())
    }

    /// Request the staged cluster task to start.
    pub async fn request_cluster_start(&self) {
        self.coordinator.lock().await.request_start();
    }

    // ── Runtime ────────────────────────────────────────────────────

    /// Forward a command to the active mission.
    pub async fn command(&self, name: &str, value: &str) -> bool {
        self.runtime.handle_command(name, value).await
    }

    /// Factory name of the active mission, best-effort.
    pub async fn active_mission(&self) -> Option<String> {
        self.runtime.active_mission_name().await
    }

    /// Whether the active mission is running (vs. staged or absent).
    pub async fn mission_running(&self) -> bool {
        self.runtime.is_running().await
    }

    /// The status document this device serves to its peers.
    pub async fn status_document(&self) -> StatusDoc {
        status::build(
            &self.config,
            &self.runtime,
            &self.scheduler,
            &self.coordinator,
        )
        .await
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn task_from_catalog(&self, task_id: &str, params: Value) -> Result<Task, SurfaceError> {
        let mission = mission_for_task(task_id)
            .ok_or_else(|| SurfaceError::UnknownTask(task_id.to_string()))?;
        let label = task_catalog()
            .into_iter()
            .find(|d| d.id == task_id)
            .map(|d| d.name)
            .unwrap_or_else(|| task_id.to_string());

        Ok(Task::new(TaskKind::User, mission, label)
            .with_id(task_id.to_string())
            .with_params(params))
    }
}
