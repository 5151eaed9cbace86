//! Strix mission runtime.
//!
//! Owns the single active mission and makes switching it safe across
//! the two execution contexts: the control context swaps missions at
//! arbitrary times, the worker context repeatedly advances whatever is
//! active. Only the runtime's internal lock is shared between them.

mod runtime;
mod worker;

pub use runtime::{AdvanceOutcome, MissionRuntime};
pub use worker::run_worker;
