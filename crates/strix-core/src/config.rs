//! strix.toml configuration parser.
//!
//! One file configures the whole device: identity (hostname, cluster),
//! the status endpoint peers probe, and the peer-directory cadences.

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading the device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Device configuration, loaded from `strix.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Named cluster this device coordinates with.
    #[serde(default = "default_cluster")]
    pub cluster: String,
    /// Port the external API layer listens on; peers probe it too.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Well-known path of the status document.
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Control-context tick cadence in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub peers: PeerSettings,
}

/// Peer-directory cadences and network hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerSettings {
    /// Hours before an ignored host becomes eligible for re-verification.
    #[serde(default = "default_ignore_hours")]
    pub ignore_hours: u64,
    /// Seconds without contact before a peer reports offline.
    #[serde(default = "default_offline_secs")]
    pub offline_secs: u64,
    /// Seconds between maintenance probes.
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
    /// Seconds between broadcast discovery queries.
    #[serde(default = "default_discovery_secs")]
    pub discovery_secs: u64,
    /// Per-request probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Whether to sweep the local /24 while no peers are known.
    #[serde(default = "default_true")]
    pub subnet_sweep: bool,
    /// This device's address on the local network, for sweep self-skip.
    #[serde(default)]
    pub local_ip: Option<Ipv4Addr>,
    /// Gateway address, skipped by the sweep.
    #[serde(default)]
    pub gateway_ip: Option<Ipv4Addr>,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            ignore_hours: default_ignore_hours(),
            offline_secs: default_offline_secs(),
            probe_secs: default_probe_secs(),
            discovery_secs: default_discovery_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            subnet_sweep: true,
            local_ip: None,
            gateway_ip: None,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            cluster: default_cluster(),
            port: default_port(),
            status_path: default_status_path(),
            tick_ms: default_tick_ms(),
            peers: PeerSettings::default(),
        }
    }
}

impl DeviceConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DeviceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl PeerSettings {
    pub fn ignore_ttl(&self) -> Duration {
        Duration::from_secs(self.ignore_hours * 3600)
    }

    pub fn offline_window(&self) -> Duration {
        Duration::from_secs(self.offline_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn default_hostname() -> String {
    "strix".to_string()
}

fn default_cluster() -> String {
    "Default".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_status_path() -> String {
    "/api/status".to_string()
}

fn default_tick_ms() -> u64 {
    200
}

fn default_ignore_hours() -> u64 {
    12
}

fn default_offline_secs() -> u64 {
    120
}

fn default_probe_secs() -> u64 {
    5
}

fn default_discovery_secs() -> u64 {
    30
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
