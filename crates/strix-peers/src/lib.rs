//! Strix peer directory.
//!
//! Maintains a live view of the other devices reachable on the local
//! network, self-healing as devices join, leave, or drop out. Peers are
//! found three ways: they contact us unprompted (verification queue),
//! we sweep the local /24 while isolated, or they show up in broadcast
//! discovery. Known peers are re-probed round-robin so their status
//! stays fresh, and hosts that fail verification sit on an ignore list
//! until it expires.

mod directory;
mod discovery;
mod probe;

pub use directory::{DirectoryConfig, PeerDirectory, PeerView};
pub use discovery::{Advertisement, Discovery, MdnsDiscovery, SERVICE_TYPE};
pub use probe::{HttpStatusClient, StatusClient};

/// Boxed future used by the object-safe seams in this crate.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
