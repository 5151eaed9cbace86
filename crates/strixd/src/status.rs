//! Local status document assembly.
//!
//! This core is the producer side of the peer status exchange: the
//! external HTTP layer serves whatever this builds at the well-known
//! status path, and sibling devices read it during verification and
//! probing.

use std::sync::Arc;

use tokio::sync::Mutex;

use strix_cluster::ClusterCoordinator;
use strix_core::{DeviceConfig, StatusDoc};
use strix_runtime::MissionRuntime;
use strix_scheduler::Scheduler;

/// Assemble the status document from component snapshots.
pub(crate) async fn build(
    config: &DeviceConfig,
    runtime: &Arc<MissionRuntime>,
    scheduler: &Arc<Mutex<Scheduler>>,
    coordinator: &Arc<Mutex<ClusterCoordinator>>,
) -> StatusDoc {
    let status = if scheduler.lock().await.is_idle() {
        "Idle"
    } else {
        "Active"
    };

    StatusDoc {
        hostname: config.hostname.clone(),
        cluster_name: Some(config.cluster.clone()),
        status: Some(status.to_string()),
        task: runtime.active_task_label().await,
        desired_task: coordinator.lock().await.advertised(),
    }
}
