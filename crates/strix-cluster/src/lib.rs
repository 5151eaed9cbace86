//! Strix cluster coordinator.
//!
//! Lets every device in a named cluster converge on one shared task
//! using only the status documents peers already expose. No leader, no
//! consensus protocol: the coordinator reads the desired-task signal
//! observed through probing and re-converges every tick.
//!
//! Execution is two-phase. A newly observed desired task is *staged*
//! (installed and initialized, not running) so every device can tune
//! hardware first; it only *starts* once the cluster-wide start flag is
//! seen, which keeps skew between devices small.

mod coordinator;

pub use coordinator::ClusterCoordinator;
