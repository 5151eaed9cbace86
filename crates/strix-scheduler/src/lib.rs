//! Strix scheduler — the single authority for "what runs now".
//!
//! Owns the task queue and the current-task record. Two states: idle
//! (the always-available background task is active) and active (a
//! specific task occupies the runtime). The control context drives
//! `tick` at a steady cadence; everything else reacts to it.

mod scheduler;

pub use scheduler::Scheduler;
