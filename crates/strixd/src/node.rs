//! The top-level context object.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::info;

use strix_cluster::ClusterCoordinator;
use strix_core::{DeviceConfig, Hal, Task, TaskKind};
use strix_missions::MissionFactory;
use strix_peers::{DirectoryConfig, Discovery, PeerDirectory, StatusClient};
use strix_runtime::{MissionRuntime, run_worker};
use strix_scheduler::Scheduler;

use crate::surface::ControlSurface;

/// Duration budget of the boot self-test.
const BOOT_TEST_BUDGET: Duration = Duration::from_millis(5000);

/// Owns every component of the orchestration core.
///
/// Constructed once at startup. The network and hardware seams are
/// injected so the whole node runs against fakes in tests.
pub struct Node {
    config: DeviceConfig,
    factory: MissionFactory,
    runtime: Arc<MissionRuntime>,
    scheduler: Arc<Mutex<Scheduler>>,
    directory: Arc<Mutex<PeerDirectory>>,
    coordinator: Arc<Mutex<ClusterCoordinator>>,
}

impl Node {
    pub fn new(
        config: DeviceConfig,
        hal: Arc<dyn Hal>,
        client: Arc<dyn StatusClient>,
        discovery: Arc<dyn Discovery>,
    ) -> Self {
        let runtime = Arc::new(MissionRuntime::new());
        let factory = MissionFactory::new(hal);

        let scheduler = Arc::new(Mutex::new(Scheduler::new(
            runtime.clone(),
            factory.clone(),
        )));
        let directory = Arc::new(Mutex::new(PeerDirectory::new(
            DirectoryConfig::from_settings(&config.peers),
            client,
            discovery,
        )));
        let coordinator = Arc::new(Mutex::new(ClusterCoordinator::new(
            runtime.clone(),
            factory.clone(),
            config.cluster.clone(),
        )));

        Self {
            config,
            factory,
            runtime,
            scheduler,
            directory,
            coordinator,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Handle for the external API layer.
    pub fn surface(&self) -> ControlSurface {
        ControlSurface::new(
            self.config.clone(),
            self.factory.clone(),
            self.runtime.clone(),
            self.scheduler.clone(),
            self.directory.clone(),
            self.coordinator.clone(),
        )
    }

    /// Settle into idle, then run the boot self-test.
    pub async fn boot(&self) {
        info!(hostname = %self.config.hostname, cluster = %self.config.cluster, "node booting");

        let mut scheduler = self.scheduler.lock().await;
        scheduler.begin().await;
        scheduler
            .preempt(
                Task::new(TaskKind::Critical, "radio-test", "Radio Self-Test")
                    .with_duration(BOOT_TEST_BUDGET),
            )
            .await;
    }

    /// One control-context pass over every component.
    pub async fn control_tick(&self) {
        self.scheduler.lock().await.tick().await;

        let peers = {
            let mut directory = self.directory.lock().await;
            directory.tick().await;
            directory.snapshot()
        };

        self.coordinator.lock().await.tick(&peers).await;
    }

    /// Run the worker task and the control loop until shutdown.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) {
        let worker = tokio::spawn(run_worker(self.runtime.clone(), shutdown.clone()));

        let mut shutdown_rx = shutdown;
        let mut tick = tokio::time::interval(self.config.tick_interval());
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.control_tick().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("control loop shutting down");
                    break;
                }
            }
        }

        let _ = worker.await;
    }
}
