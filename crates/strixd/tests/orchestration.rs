//! End-to-end orchestration scenarios against fake network seams.
//!
//! These drive a whole `Node` the way the daemon does: `boot`, then
//! repeated control ticks under a paused clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use strix_core::{DesiredTask, DeviceConfig, NullHal, StatusDoc, Task, TaskKind};
use strix_peers::{Advertisement, BoxFuture, Discovery, StatusClient};
use strixd::Node;

struct FakeClient {
    responses: Mutex<HashMap<String, StatusDoc>>,
}

impl FakeClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
        })
    }

    fn respond(&self, address: &str, doc: StatusDoc) {
        self.responses
            .lock()
            .unwrap()
            .insert(address.to_string(), doc);
    }
}

impl StatusClient for FakeClient {
    fn fetch_status<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<StatusDoc>> {
        Box::pin(async move { self.responses.lock().unwrap().get(address).cloned() })
    }
}

struct NoDiscovery;

impl Discovery for NoDiscovery {
    fn browse(&self) -> BoxFuture<'_, Vec<Advertisement>> {
        Box::pin(async { Vec::new() })
    }
}

fn test_config() -> DeviceConfig {
    let mut config = DeviceConfig::default();
    config.hostname = "strix-test".to_string();
    config.cluster = "Lab".to_string();
    config.peers.subnet_sweep = false;
    config
}

fn node_with(client: Arc<FakeClient>) -> Node {
    Node::new(
        test_config(),
        Arc::new(NullHal::new()),
        client,
        Arc::new(NoDiscovery),
    )
}

#[tokio::test(start_paused = true)]
async fn boot_runs_the_self_test_then_settles_to_idle() {
    let node = node_with(FakeClient::new());
    node.boot().await;

    let surface = node.surface();
    let current = surface.current_task().await.unwrap();
    assert_eq!(current.mission, "radio-test");
    assert_eq!(current.kind, TaskKind::Critical);
    assert!(current.running);

    // The self-test budget elapses; the next tick falls back to idle.
    tokio::time::advance(Duration::from_millis(5000)).await;
    node.control_tick().await;

    let current = surface.current_task().await.unwrap();
    assert_eq!(current.mission, "system-idle");
    assert_eq!(current.kind, TaskKind::Background);
}

#[tokio::test(start_paused = true)]
async fn enqueued_task_runs_and_expires_back_to_idle() {
    let node = node_with(FakeClient::new());
    node.boot().await;
    tokio::time::advance(Duration::from_millis(5000)).await;
    node.control_tick().await;

    let surface = node.surface();
    surface
        .enqueue(
            Task::new(TaskKind::Critical, "radio-test", "RadioTest")
                .with_duration(Duration::from_millis(5000)),
        )
        .await;
    node.control_tick().await;
    assert_eq!(surface.current_task().await.unwrap().label, "RadioTest");

    tokio::time::advance(Duration::from_millis(5000)).await;
    node.control_tick().await;
    assert_eq!(surface.current_task().await.unwrap().mission, "system-idle");
}

#[tokio::test(start_paused = true)]
async fn start_task_by_id_preempts_immediately() {
    let node = node_with(FakeClient::new());
    node.boot().await;

    let surface = node.surface();
    surface
        .start_task("spectrum/scan", json!({"start": 905.0, "stop": 906.0}))
        .await
        .unwrap();

    let current = surface.current_task().await.unwrap();
    assert_eq!(current.id, "spectrum/scan");
    assert_eq!(current.mission, "spectrum-scan");
    assert_eq!(surface.active_mission().await.as_deref(), Some("spectrum-scan"));

    assert!(surface.start_task("quantum/entangle", json!({})).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn cluster_task_converges_through_peer_probes() {
    let client = FakeClient::new();
    let node = node_with(client.clone());
    node.boot().await;
    let surface = node.surface();

    // Let the boot self-test expire so the scheduler sits idle and
    // leaves the runtime to the coordinator.
    tokio::time::advance(Duration::from_millis(5000)).await;
    node.control_tick().await;

    // A cluster sibling advertises a staged desired task.
    client.respond(
        "192.168.1.20",
        StatusDoc {
            hostname: "node-7".to_string(),
            cluster_name: Some("Lab".to_string()),
            status: Some("Ready".to_string()),
            task: None,
            desired_task: Some(DesiredTask {
                id: "spectrum/scan".to_string(),
                params: json!({"start": 905.0, "stop": 906.0}),
                start: false,
            }),
        },
    );

    surface.track_incoming("192.168.1.20").await;
    node.control_tick().await;

    // Staged but not started: every device tunes before any runs.
    assert_eq!(surface.active_mission().await.as_deref(), Some("spectrum-scan"));
    assert!(!surface.mission_running().await);

    // The sibling flips the start flag; the next probe picks it up.
    client.respond(
        "192.168.1.20",
        StatusDoc {
            hostname: "node-7".to_string(),
            cluster_name: Some("Lab".to_string()),
            status: Some("Ready".to_string()),
            task: None,
            desired_task: Some(DesiredTask {
                id: "spectrum/scan".to_string(),
                params: json!({}),
                start: true,
            }),
        },
    );

    tokio::time::advance(Duration::from_secs(5)).await;
    node.control_tick().await;
    assert!(surface.mission_running().await);
}

#[tokio::test(start_paused = true)]
async fn status_document_reflects_node_state() {
    let node = node_with(FakeClient::new());
    node.boot().await;
    let surface = node.surface();

    let doc = surface.status_document().await;
    assert_eq!(doc.hostname, "strix-test");
    assert_eq!(doc.cluster_name.as_deref(), Some("Lab"));
    assert_eq!(doc.status.as_deref(), Some("Active"));
    assert_eq!(doc.task.as_deref(), Some("Radio Self-Test"));

    tokio::time::advance(Duration::from_millis(5000)).await;
    node.control_tick().await;

    let doc = surface.status_document().await;
    assert_eq!(doc.status.as_deref(), Some("Idle"));
}

#[tokio::test(start_paused = true)]
async fn local_cluster_claim_is_advertised_and_applied() {
    let node = node_with(FakeClient::new());
    node.boot().await;
    let surface = node.surface();

    surface
        .set_cluster_task("rf-diag/noise", json!({}))
        .await
        .unwrap();
    node.control_tick().await;

    // Applied locally, staged only.
    assert_eq!(surface.active_mission().await.as_deref(), Some("rf-noise"));
    assert!(!surface.mission_running().await);

    // Advertised to the fleet through the status document.
    let doc = surface.status_document().await;
    let desired = doc.desired_task.unwrap();
    assert_eq!(desired.id, "rf-diag/noise");
    assert!(!desired.start);

    surface.request_cluster_start().await;
    node.control_tick().await;
    assert!(surface.mission_running().await);
}

#[tokio::test(start_paused = true)]
async fn peer_ranging_history_lands_in_the_snapshot() {
    let client = FakeClient::new();
    let node = node_with(client.clone());
    node.boot().await;
    let surface = node.surface();

    client.respond(
        "192.168.1.20",
        StatusDoc {
            hostname: "node-7".to_string(),
            cluster_name: Some("Lab".to_string()),
            status: Some("Ready".to_string()),
            task: None,
            desired_task: None,
        },
    );
    surface.track_incoming("192.168.1.20").await;
    node.control_tick().await;

    surface.record_peer_ranging("192.168.1.20", -71).await;
    surface.record_peer_ranging("192.168.1.20", -69).await;

    let peers = surface.peers().await;
    assert_eq!(peers[0].ranging, vec![-71, -69]);
}

#[tokio::test(start_paused = true)]
async fn staged_task_waits_for_start() {
    let node = node_with(FakeClient::new());
    node.boot().await;
    let surface = node.surface();

    surface.stage_task("rf-diag/noise", json!({})).await.unwrap();
    assert_eq!(surface.active_mission().await.as_deref(), Some("rf-noise"));
    assert!(!surface.mission_running().await);

    assert!(surface.start_staged().await);
    assert!(surface.mission_running().await);
}
