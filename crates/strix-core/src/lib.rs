//! Strix core — shared domain types, device configuration, and the
//! hardware capability seam.
//!
//! Everything here is consumed by the other strix crates: the task and
//! catalog types by the scheduler and missions, the status document by
//! the peer directory and the daemon, and the `Hal` trait by every
//! mission that touches the radio.

pub mod config;
pub mod hal;
pub mod types;

pub use config::{ConfigError, DeviceConfig};
pub use hal::{Hal, NullHal};
pub use types::*;
