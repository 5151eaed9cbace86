//! Broadcast discovery seam.
//!
//! Devices advertise themselves in the local mDNS namespace under a
//! shared service type, with their cluster name in a TXT record. The
//! directory only sees [`Advertisement`]s through the [`Discovery`]
//! trait, so tests run without a network.

use std::time::Duration;

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tracing::{debug, warn};

use crate::BoxFuture;

/// Service type every strix device advertises under.
pub const SERVICE_TYPE: &str = "_strix._tcp.local.";

/// TXT record key carrying the cluster name.
const CLUSTER_TXT_KEY: &str = "cluster";

/// One advertised device seen in the discovery namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub hostname: String,
    pub address: String,
    /// Cluster name from the discovery metadata, if advertised.
    pub cluster: Option<String>,
}

/// Queries the local service-discovery namespace.
pub trait Discovery: Send + Sync {
    /// One browse pass over the namespace. Failures yield an empty
    /// list; discovery is best-effort.
    fn browse(&self) -> BoxFuture<'_, Vec<Advertisement>>;
}

/// mDNS-backed discovery used in production.
pub struct MdnsDiscovery {
    daemon: ServiceDaemon,
    browse_window: Duration,
}

impl MdnsDiscovery {
    pub fn new() -> Result<Self, mdns_sd::Error> {
        Ok(Self {
            daemon: ServiceDaemon::new()?,
            browse_window: Duration::from_secs(2),
        })
    }

    /// Advertise this device so peers can discover it.
    pub fn register(
        &self,
        hostname: &str,
        port: u16,
        cluster: &str,
    ) -> Result<(), mdns_sd::Error> {
        let host_name = format!("{hostname}.local.");
        let properties = [(CLUSTER_TXT_KEY, cluster)];

        let info = ServiceInfo::new(
            SERVICE_TYPE,
            hostname,
            &host_name,
            "", // Auto-detect addresses.
            port,
            &properties[..],
        )?
        .enable_addr_auto();

        self.daemon.register(info)
    }
}

impl Discovery for MdnsDiscovery {
    fn browse(&self) -> BoxFuture<'_, Vec<Advertisement>> {
        let daemon = self.daemon.clone();
        let window = self.browse_window;
        Box::pin(async move {
            // The mdns-sd receiver is blocking; keep it off the
            // control context's executor threads.
            match tokio::task::spawn_blocking(move || browse_blocking(&daemon, window)).await {
                Ok(ads) => ads,
                Err(e) => {
                    warn!(error = %e, "mdns browse task failed");
                    Vec::new()
                }
            }
        })
    }
}

/// Collect resolved services until the browse window closes.
fn browse_blocking(daemon: &ServiceDaemon, window: Duration) -> Vec<Advertisement> {
    let receiver = match daemon.browse(SERVICE_TYPE) {
        Ok(receiver) => receiver,
        Err(e) => {
            warn!(error = %e, "mdns browse failed");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    let deadline = std::time::Instant::now() + window;
    while let Some(remaining) = deadline.checked_duration_since(std::time::Instant::now()) {
        match receiver.recv_timeout(remaining) {
            Ok(ServiceEvent::ServiceResolved(info)) => {
                if let Some(ad) = advertisement_from(&info) {
                    debug!(hostname = %ad.hostname, address = %ad.address, "service resolved");
                    found.push(ad);
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    if let Err(e) = daemon.stop_browse(SERVICE_TYPE) {
        debug!(error = %e, "stop browse failed");
    }
    found
}

fn advertisement_from(info: &ServiceInfo) -> Option<Advertisement> {
    let address = info
        .get_addresses()
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| info.get_addresses().iter().next())?
        .to_string();

    let hostname = info.get_hostname().trim_end_matches('.');
    let hostname = hostname.trim_end_matches(".local").to_string();

    Some(Advertisement {
        hostname,
        address,
        cluster: info
            .get_property_val_str(CLUSTER_TXT_KEY)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertisement_extracts_cluster_txt() {
        let properties = [("cluster", "Lab")];
        let info = ServiceInfo::new(
            SERVICE_TYPE,
            "node-7",
            "node-7.local.",
            "192.168.1.20",
            8080,
            &properties[..],
        )
        .unwrap();

        let ad = advertisement_from(&info).unwrap();
        assert_eq!(ad.hostname, "node-7");
        assert_eq!(ad.address, "192.168.1.20");
        assert_eq!(ad.cluster.as_deref(), Some("Lab"));
    }

    #[test]
    fn advertisement_without_cluster_txt() {
        let properties: [(&str, &str); 0] = [];
        let info = ServiceInfo::new(
            SERVICE_TYPE,
            "node-8",
            "node-8.local.",
            "192.168.1.21",
            8080,
            &properties[..],
        )
        .unwrap();

        let ad = advertisement_from(&info).unwrap();
        assert!(ad.cluster.is_none());
    }

    #[test]
    fn advertisement_requires_an_address() {
        let properties: [(&str, &str); 0] = [];
        let info = ServiceInfo::new(
            SERVICE_TYPE,
            "node-9",
            "node-9.local.",
            "",
            8080,
            &properties[..],
        )
        .unwrap();
        assert!(advertisement_from(&info).is_none());
    }
}
