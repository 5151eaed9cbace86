//! Strix missions — the mission contract and its implementations.
//!
//! A mission is one interchangeable unit of device behavior (idle
//! monitoring, a radio self-test, a band sweep). Exactly one mission is
//! active at a time; the runtime crate owns the active instance and
//! drives it from the worker context. This crate defines:
//!
//! - The [`Mission`] trait every mission implements
//! - The concrete missions shipped with the device
//! - [`MissionFactory`], the name-keyed constructor with idle fallback
//! - The static task catalog and task-id → mission routing

mod ble_ranging;
mod catalog;
mod factory;
mod idle;
mod mission;
mod radio_test;
mod rf_noise;
mod spectrum;

pub use ble_ranging::BleRangingMission;
pub use catalog::{mission_for_task, task_catalog};
pub use factory::{IDLE_MISSION, MissionFactory};
pub use idle::SystemIdleMission;
pub use mission::Mission;
pub use radio_test::RadioTestMission;
pub use rf_noise::RfNoiseMission;
pub use spectrum::SpectrumScanMission;
