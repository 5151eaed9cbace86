//! Peer and ignore-list state, and the four maintenance procedures.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use strix_core::config::PeerSettings;
use strix_core::{DesiredTask, StatusDoc};

use crate::discovery::Discovery;
use crate::probe::StatusClient;

const STATUS_UNKNOWN: &str = "Unknown";
const DEFAULT_CLUSTER: &str = "Default";

/// Depth of the per-peer ranging history.
const RANGING_DEPTH: usize = 32;

/// Directory cadences and sweep hints.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// How long a failed verification keeps a host ignored.
    pub ignore_ttl: Duration,
    /// Window after which an unseen peer reports offline.
    pub offline_window: Duration,
    /// Cadence of maintenance probing.
    pub probe_interval: Duration,
    /// Cadence of broadcast discovery.
    pub discovery_interval: Duration,
    /// Whether to sweep the local /24 while no peers are known.
    pub subnet_sweep: bool,
    pub local_ip: Option<Ipv4Addr>,
    pub gateway_ip: Option<Ipv4Addr>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            ignore_ttl: Duration::from_secs(12 * 3600),
            offline_window: Duration::from_secs(120),
            probe_interval: Duration::from_secs(5),
            discovery_interval: Duration::from_secs(30),
            subnet_sweep: true,
            local_ip: None,
            gateway_ip: None,
        }
    }
}

impl DirectoryConfig {
    pub fn from_settings(settings: &PeerSettings) -> Self {
        Self {
            ignore_ttl: settings.ignore_ttl(),
            offline_window: settings.offline_window(),
            probe_interval: settings.probe_interval(),
            discovery_interval: settings.discovery_interval(),
            subnet_sweep: settings.subnet_sweep,
            local_ip: settings.local_ip,
            gateway_ip: settings.gateway_ip,
        }
    }
}

/// A known sibling device. Never removed, only flagged offline, so
/// historical identity survives transient drops.
#[derive(Debug, Clone)]
struct Peer {
    hostname: String,
    address: String,
    cluster: String,
    status: String,
    task: Option<String>,
    desired: Option<DesiredTask>,
    last_seen: Instant,
    last_probe: Option<Instant>,
    ranging: VecDeque<i64>,
}

/// A host that failed verification, parked until the TTL expires.
#[derive(Debug, Clone)]
struct IgnoredHost {
    address: String,
    ignored_at: Instant,
}

/// Serializable snapshot of a peer for the API and the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerView {
    pub hostname: String,
    pub address: String,
    pub cluster: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired: Option<DesiredTask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranging: Vec<i64>,
}

/// Discovers, verifies, and maintains the set of known peers.
///
/// Owned by the control context; everything here is single-context.
/// Cross-context readers get [`PeerView`] snapshots.
pub struct PeerDirectory {
    config: DirectoryConfig,
    client: Arc<dyn StatusClient>,
    discovery: Arc<dyn Discovery>,
    peers: Vec<Peer>,
    ignored: Vec<IgnoredHost>,
    verify_queue: VecDeque<String>,
    /// Next /24 host octet the sweep will try.
    sweep_octet: u8,
    last_probe_pass: Option<Instant>,
    last_discovery: Option<Instant>,
}

impl PeerDirectory {
    pub fn new(
        config: DirectoryConfig,
        client: Arc<dyn StatusClient>,
        discovery: Arc<dyn Discovery>,
    ) -> Self {
        Self {
            config,
            client,
            discovery,
            peers: Vec::new(),
            ignored: Vec::new(),
            verify_queue: VecDeque::new(),
            sweep_octet: 1,
            last_probe_pass: None,
            last_discovery: None,
        }
    }

    /// One control-context maintenance pass.
    ///
    /// The verification queue outranks the subnet sweep; probing and
    /// discovery run on their own cadences independent of both.
    pub async fn tick(&mut self) {
        if !self.verify_queue.is_empty() {
            self.process_verification_queue().await;
        } else if self.peers.is_empty() && self.config.subnet_sweep {
            self.sweep_step().await;
        }

        let probe_due = self
            .last_probe_pass
            .is_none_or(|t| t.elapsed() >= self.config.probe_interval);
        if probe_due && !self.peers.is_empty() {
            self.last_probe_pass = Some(Instant::now());
            self.maintain_peers().await;
        }

        let discovery_due = self
            .last_discovery
            .is_none_or(|t| t.elapsed() >= self.config.discovery_interval);
        if discovery_due {
            self.last_discovery = Some(Instant::now());
            self.run_discovery().await;
        }
    }

    /// Queue an address that contacted this device unprompted.
    pub fn track_incoming(&mut self, address: &str) {
        if self.is_peered(address) || self.is_ignored(address) {
            return;
        }
        if self.verify_queue.iter().any(|queued| queued == address) {
            return;
        }
        debug!(%address, "queueing unknown caller for verification");
        self.verify_queue.push_back(address.to_string());
    }

    /// One-shot reachability check for the external API. Does not touch
    /// directory state.
    pub async fn ping(&self, address: &str) -> bool {
        self.client.fetch_status(address).await.is_some()
    }

    /// Append a ranging observation to a known peer.
    pub fn record_ranging(&mut self, address: &str, rssi: i64) {
        if let Some(peer) = self.peers.iter_mut().find(|p| p.address == address) {
            if peer.ranging.len() == RANGING_DEPTH {
                peer.ranging.pop_front();
            }
            peer.ranging.push_back(rssi);
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Addresses currently on the ignore list, expired entries included
    /// until their next lookup.
    pub fn ignored_addresses(&self) -> Vec<String> {
        self.ignored.iter().map(|h| h.address.clone()).collect()
    }

    /// Snapshot of all known peers. Online status is computed here,
    /// against the offline window.
    pub fn snapshot(&self) -> Vec<PeerView> {
        self.peers
            .iter()
            .map(|p| PeerView {
                hostname: p.hostname.clone(),
                address: p.address.clone(),
                cluster: p.cluster.clone(),
                status: p.status.clone(),
                task: p.task.clone(),
                online: p.last_seen.elapsed() < self.config.offline_window,
                desired: p.desired.clone(),
                ranging: p.ranging.iter().copied().collect(),
            })
            .collect()
    }

    // ── Maintenance procedures ─────────────────────────────────────

    /// Pop one queued address and attempt verification.
    async fn process_verification_queue(&mut self) {
        let Some(address) = self.verify_queue.pop_front() else {
            return;
        };
        if self.is_peered(&address) {
            return;
        }

        info!(%address, "verifying potential peer");
        if self.verify(&address).await {
            info!(%address, "peer verified");
        } else {
            info!(%address, "not a peer, ignoring");
            self.ignored.push(IgnoredHost {
                address,
                ignored_at: Instant::now(),
            });
        }
    }

    /// Try the next /24 address. One candidate per tick; wraps at the
    /// top of the range and keeps looking until something is found.
    async fn sweep_step(&mut self) {
        let Some(local) = self.config.local_ip else {
            return;
        };

        let octet = self.sweep_octet;
        self.sweep_octet = if octet >= 254 { 1 } else { octet + 1 };

        let [a, b, c, local_octet] = local.octets();
        if octet == local_octet {
            return;
        }
        let candidate = Ipv4Addr::new(a, b, c, octet);
        if Some(candidate) == self.config.gateway_ip {
            return;
        }

        let address = candidate.to_string();
        if self.is_peered(&address) || self.is_ignored(&address) {
            return;
        }

        if self.verify(&address).await {
            info!(%address, "subnet sweep found a peer");
        }
        // Sweep misses are not ignored: the whole /24 would otherwise
        // sit on the ignore list for hours.
    }

    /// Re-probe the peer most in need of a status refresh.
    async fn maintain_peers(&mut self) {
        let index = self.next_probe_target();
        let Some(index) = index else { return };

        let address = self.peers[index].address.clone();
        debug!(%address, "maintenance probe");

        let doc = self.client.fetch_status(&address).await;
        let peer = &mut self.peers[index];
        peer.last_probe = Some(Instant::now());

        if let Some(doc) = doc {
            apply_status(peer, &doc);
            peer.last_seen = Instant::now();
        }
        // A failed probe is left unresolved for retry; the offline
        // window decides when the peer stops reporting online.
    }

    /// Unknown status outranks everything; otherwise oldest probe first.
    fn next_probe_target(&self) -> Option<usize> {
        if self.peers.is_empty() {
            return None;
        }
        if let Some(index) = self.peers.iter().position(|p| p.status == STATUS_UNKNOWN) {
            return Some(index);
        }
        self.peers
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.last_probe)
            .map(|(index, _)| index)
    }

    /// Merge one broadcast discovery pass into the peer set.
    async fn run_discovery(&mut self) {
        let ads = self.discovery.browse().await;
        for ad in ads {
            match self.peers.iter_mut().find(|p| p.address == ad.address) {
                Some(peer) => {
                    peer.hostname = ad.hostname;
                    if let Some(cluster) = ad.cluster {
                        peer.cluster = cluster;
                    }
                    peer.last_seen = Instant::now();
                }
                None => {
                    info!(
                        hostname = %ad.hostname,
                        address = %ad.address,
                        cluster = ad.cluster.as_deref().unwrap_or(DEFAULT_CLUSTER),
                        "new peer discovered"
                    );
                    self.peers.push(Peer {
                        hostname: ad.hostname,
                        address: ad.address,
                        cluster: ad.cluster.unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
                        status: STATUS_UNKNOWN.to_string(),
                        task: None,
                        desired: None,
                        last_seen: Instant::now(),
                        last_probe: None,
                        ranging: VecDeque::new(),
                    });
                }
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Issue a status fetch; insert or update a peer on success.
    async fn verify(&mut self, address: &str) -> bool {
        let Some(doc) = self.client.fetch_status(address).await else {
            return false;
        };

        // A verified address can never stay ignored.
        self.ignored.retain(|h| h.address != address);

        match self.peers.iter_mut().find(|p| p.address == address) {
            Some(peer) => {
                apply_status(peer, &doc);
                peer.last_seen = Instant::now();
            }
            None => {
                let mut peer = Peer {
                    hostname: doc.hostname.clone(),
                    address: address.to_string(),
                    cluster: DEFAULT_CLUSTER.to_string(),
                    status: STATUS_UNKNOWN.to_string(),
                    task: None,
                    desired: None,
                    last_seen: Instant::now(),
                    last_probe: None,
                    ranging: VecDeque::new(),
                };
                apply_status(&mut peer, &doc);
                self.peers.push(peer);
            }
        }
        true
    }

    fn is_peered(&self, address: &str) -> bool {
        self.peers.iter().any(|p| p.address == address)
    }

    /// Expired entries are dropped on lookup, making the host eligible
    /// for re-verification.
    fn is_ignored(&mut self, address: &str) -> bool {
        let ttl = self.config.ignore_ttl;
        let Some(index) = self.ignored.iter().position(|h| h.address == address) else {
            return false;
        };
        if self.ignored[index].ignored_at.elapsed() < ttl {
            true
        } else {
            debug!(%address, "ignore entry expired");
            self.ignored.swap_remove(index);
            false
        }
    }
}

/// Copy the probed fields of a status document into a peer record.
fn apply_status(peer: &mut Peer, doc: &StatusDoc) {
    peer.hostname = doc.hostname.clone();
    if let Some(cluster) = &doc.cluster_name {
        peer.cluster = cluster.clone();
    }
    peer.status = doc
        .status
        .clone()
        .unwrap_or_else(|| STATUS_UNKNOWN.to_string());
    peer.task = doc.task.clone();
    peer.desired = doc.desired_task.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::discovery::Advertisement;
    use crate::BoxFuture;

    /// Canned status responses plus a call log.
    struct FakeClient {
        responses: Mutex<HashMap<String, StatusDoc>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn respond(&self, address: &str, doc: StatusDoc) {
            self.responses
                .lock()
                .unwrap()
                .insert(address.to_string(), doc);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl StatusClient for FakeClient {
        fn fetch_status<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<StatusDoc>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(address.to_string());
                self.responses.lock().unwrap().get(address).cloned()
            })
        }
    }

    struct FakeDiscovery {
        ads: Mutex<Vec<Advertisement>>,
    }

    impl FakeDiscovery {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                ads: Mutex::new(Vec::new()),
            })
        }

        fn advertise(&self, ad: Advertisement) {
            self.ads.lock().unwrap().push(ad);
        }
    }

    impl Discovery for FakeDiscovery {
        fn browse(&self) -> BoxFuture<'_, Vec<Advertisement>> {
            Box::pin(async move { self.ads.lock().unwrap().clone() })
        }
    }

    fn doc(hostname: &str, cluster: &str, status: &str) -> StatusDoc {
        StatusDoc {
            hostname: hostname.to_string(),
            cluster_name: Some(cluster.to_string()),
            status: Some(status.to_string()),
            task: None,
            desired_task: None,
        }
    }

    fn directory(
        config: DirectoryConfig,
    ) -> (PeerDirectory, Arc<FakeClient>, Arc<FakeDiscovery>) {
        let client = FakeClient::new();
        let discovery = FakeDiscovery::new();
        let directory = PeerDirectory::new(config, client.clone(), discovery.clone());
        (directory, client, discovery)
    }

    fn no_sweep_config() -> DirectoryConfig {
        DirectoryConfig {
            subnet_sweep: false,
            ..DirectoryConfig::default()
        }
    }

    #[tokio::test]
    async fn successful_verification_creates_a_peer() {
        let (mut dir, client, _) = directory(no_sweep_config());
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));

        dir.track_incoming("192.168.1.20");
        dir.tick().await;

        let peers = dir.snapshot();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].hostname, "node-7");
        assert_eq!(peers[0].cluster, "Lab");
        assert_eq!(peers[0].status, "Ready");
        assert!(peers[0].online);
        assert!(dir.ignored_addresses().is_empty());
    }

    #[tokio::test]
    async fn failed_verification_ignores_the_host() {
        let (mut dir, client, _) = directory(no_sweep_config());

        dir.track_incoming("192.168.1.66");
        dir.tick().await;

        assert_eq!(dir.peer_count(), 0);
        assert_eq!(dir.ignored_addresses(), vec!["192.168.1.66"]);
        let first_calls = client.call_count();

        // Before the TTL elapses, the host is skipped without a
        // network call.
        dir.track_incoming("192.168.1.66");
        assert!(dir.verify_queue.is_empty());
        dir.tick().await;
        assert_eq!(client.call_count(), first_calls);
    }

    #[tokio::test(start_paused = true)]
    async fn ignore_entries_expire_after_the_ttl() {
        let config = DirectoryConfig {
            ignore_ttl: Duration::from_secs(3600),
            ..no_sweep_config()
        };
        let (mut dir, client, _) = directory(config);

        dir.track_incoming("192.168.1.66");
        dir.tick().await;
        assert_eq!(dir.ignored_addresses(), vec!["192.168.1.66"]);

        // The host comes back to life.
        client.respond("192.168.1.66", doc("node-9", "Lab", "Ready"));

        tokio::time::advance(Duration::from_secs(3599)).await;
        dir.track_incoming("192.168.1.66");
        assert!(dir.verify_queue.is_empty());

        tokio::time::advance(Duration::from_secs(1)).await;
        dir.track_incoming("192.168.1.66");
        dir.tick().await;

        assert_eq!(dir.peer_count(), 1);
        // Never simultaneously a peer and an ignored host.
        assert!(dir.ignored_addresses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unseen_peer_goes_offline_but_keeps_identity() {
        let (mut dir, client, _) = directory(no_sweep_config());
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));
        dir.track_incoming("192.168.1.20");
        dir.tick().await;

        // Probes start failing.
        client.responses.lock().unwrap().clear();

        tokio::time::advance(Duration::from_secs(121)).await;
        let peers = dir.snapshot();
        assert!(!peers[0].online);
        assert_eq!(peers[0].hostname, "node-7");
        assert_eq!(peers[0].cluster, "Lab");
        assert_eq!(dir.peer_count(), 1);
    }

    #[tokio::test]
    async fn verification_queue_outranks_the_sweep() {
        let config = DirectoryConfig {
            local_ip: Some(Ipv4Addr::new(192, 168, 1, 57)),
            gateway_ip: Some(Ipv4Addr::new(192, 168, 1, 1)),
            ..DirectoryConfig::default()
        };
        let (mut dir, client, _) = directory(config);
        client.respond("10.0.0.9", doc("node-x", "Lab", "Ready"));

        dir.track_incoming("10.0.0.9");
        dir.tick().await;

        // Only the queued address was fetched, no sweep candidate.
        assert_eq!(client.calls(), vec!["10.0.0.9"]);
    }

    #[tokio::test]
    async fn sweep_skips_self_and_gateway_and_wraps() {
        let config = DirectoryConfig {
            local_ip: Some(Ipv4Addr::new(192, 168, 1, 3)),
            gateway_ip: Some(Ipv4Addr::new(192, 168, 1, 1)),
            // Keep probing/discovery quiet during the sweep.
            probe_interval: Duration::from_secs(3600),
            discovery_interval: Duration::from_secs(3600),
            ..DirectoryConfig::default()
        };
        let (mut dir, client, _) = directory(config);

        // Two full passes over the /24.
        for _ in 0..508 {
            dir.tick().await;
        }

        let calls = client.calls();
        assert!(!calls.contains(&"192.168.1.1".to_string()));
        assert!(!calls.contains(&"192.168.1.3".to_string()));
        // Wrapped: candidates were tried twice.
        assert_eq!(
            calls.iter().filter(|c| *c == "192.168.1.2").count(),
            2
        );
    }

    #[tokio::test]
    async fn sweep_stops_once_a_peer_is_known() {
        let config = DirectoryConfig {
            local_ip: Some(Ipv4Addr::new(192, 168, 1, 3)),
            probe_interval: Duration::from_secs(3600),
            discovery_interval: Duration::from_secs(3600),
            ..DirectoryConfig::default()
        };
        let (mut dir, client, _) = directory(config);
        client.respond("192.168.1.2", doc("node-2", "Lab", "Ready"));

        dir.tick().await; // octet 1: gateway unset, tries .1 — miss
        dir.tick().await; // octet 2: hit
        assert_eq!(dir.peer_count(), 1);

        let calls_after_hit = client.call_count();
        dir.tick().await;
        dir.tick().await;
        // No further sweep fetches.
        assert_eq!(client.call_count(), calls_after_hit);
    }

    #[tokio::test(start_paused = true)]
    async fn maintenance_probe_prefers_unknown_status() {
        let (mut dir, client, discovery) = directory(no_sweep_config());

        // One verified peer and one discovered (status Unknown) peer.
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));
        dir.track_incoming("192.168.1.20");
        dir.tick().await;

        discovery.advertise(Advertisement {
            hostname: "node-8".to_string(),
            address: "192.168.1.21".to_string(),
            cluster: Some("Lab".to_string()),
        });
        tokio::time::advance(Duration::from_secs(30)).await;
        dir.tick().await;
        assert_eq!(dir.peer_count(), 2);

        client.calls.lock().unwrap().clear();
        client.respond("192.168.1.21", doc("node-8", "Lab", "Ready"));

        tokio::time::advance(Duration::from_secs(5)).await;
        dir.tick().await;

        // The Unknown-status peer was probed first.
        assert_eq!(client.calls().first().map(String::as_str), Some("192.168.1.21"));
        let node8 = dir
            .snapshot()
            .into_iter()
            .find(|p| p.address == "192.168.1.21")
            .unwrap();
        assert_eq!(node8.status, "Ready");
    }

    #[tokio::test(start_paused = true)]
    async fn maintenance_probe_rotates_to_oldest() {
        let (mut dir, client, _) = directory(no_sweep_config());
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));
        client.respond("192.168.1.21", doc("node-8", "Lab", "Ready"));
        dir.track_incoming("192.168.1.20");
        dir.tick().await;
        dir.track_incoming("192.168.1.21");
        tokio::time::advance(Duration::from_secs(5)).await;
        dir.tick().await;

        // Both verified. Clear the log and let two probe passes run.
        client.calls.lock().unwrap().clear();
        tokio::time::advance(Duration::from_secs(5)).await;
        dir.tick().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        dir.tick().await;

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        // Round-robin: the two probes hit different peers.
        assert_ne!(calls[0], calls[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn discovery_inserts_and_updates_peers() {
        let (mut dir, _, discovery) = directory(no_sweep_config());
        discovery.advertise(Advertisement {
            hostname: "node-7".to_string(),
            address: "192.168.1.20".to_string(),
            cluster: Some("Lab".to_string()),
        });

        dir.tick().await;
        let peers = dir.snapshot();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].cluster, "Lab");
        assert_eq!(peers[0].status, STATUS_UNKNOWN);

        // A renamed host updates in place on the next discovery pass.
        discovery.ads.lock().unwrap().clear();
        discovery.advertise(Advertisement {
            hostname: "node-7b".to_string(),
            address: "192.168.1.20".to_string(),
            cluster: Some("Bench".to_string()),
        });
        tokio::time::advance(Duration::from_secs(30)).await;
        dir.tick().await;

        let peers = dir.snapshot();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].hostname, "node-7b");
        assert_eq!(peers[0].cluster, "Bench");
    }

    #[tokio::test]
    async fn track_incoming_deduplicates() {
        let (mut dir, _, _) = directory(no_sweep_config());
        dir.track_incoming("10.0.0.1");
        dir.track_incoming("10.0.0.1");
        assert_eq!(dir.verify_queue.len(), 1);
    }

    #[tokio::test]
    async fn ranging_history_is_bounded() {
        let (mut dir, client, _) = directory(no_sweep_config());
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));
        dir.track_incoming("192.168.1.20");
        dir.tick().await;

        for i in 0..40 {
            dir.record_ranging("192.168.1.20", -60 - i);
        }
        let peers = dir.snapshot();
        assert_eq!(peers[0].ranging.len(), RANGING_DEPTH);
        assert_eq!(peers[0].ranging[0], -68);
    }

    #[tokio::test]
    async fn desired_task_signal_is_captured_from_probes() {
        let (mut dir, client, _) = directory(no_sweep_config());
        let mut status = doc("node-7", "Lab", "Ready");
        status.desired_task = Some(DesiredTask {
            id: "spectrum/scan".to_string(),
            params: serde_json::json!({"start": 905.0}),
            start: false,
        });
        client.respond("192.168.1.20", status);

        dir.track_incoming("192.168.1.20");
        dir.tick().await;

        let peers = dir.snapshot();
        let desired = peers[0].desired.as_ref().unwrap();
        assert_eq!(desired.id, "spectrum/scan");
        assert!(!desired.start);
    }

    #[tokio::test]
    async fn ping_does_not_mutate_state() {
        let (dir, client, _) = directory(no_sweep_config());
        client.respond("192.168.1.20", doc("node-7", "Lab", "Ready"));

        assert!(dir.ping("192.168.1.20").await);
        assert!(!dir.ping("192.168.1.99").await);
        assert_eq!(dir.peer_count(), 0);
    }
}
