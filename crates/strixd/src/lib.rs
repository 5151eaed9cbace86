//! strixd library — the assembled orchestration core.
//!
//! The binary in `main.rs` is a thin shell over [`Node`]: one top-level
//! context object constructed at startup, holding the scheduler, the
//! mission runtime, the peer directory, and the cluster coordinator.
//! There are no global singletons; whoever needs a component gets a
//! handle from the node.

mod node;
mod status;
mod surface;

pub use node::Node;
pub use surface::{ControlSurface, SurfaceError};
