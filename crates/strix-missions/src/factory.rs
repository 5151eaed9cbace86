//! Mission factory.
//!
//! Missions are selected by name. An unrecognized name is not an
//! error: the factory logs once and substitutes the idle mission, so a
//! bad task definition can never leave the device without an active
//! mission.

use std::sync::Arc;

use tracing::error;

use strix_core::Hal;

use crate::ble_ranging::BleRangingMission;
use crate::idle::SystemIdleMission;
use crate::mission::Mission;
use crate::radio_test::RadioTestMission;
use crate::rf_noise::RfNoiseMission;
use crate::spectrum::SpectrumScanMission;

/// Factory key of the always-available idle mission.
pub const IDLE_MISSION: &str = "system-idle";

/// Creates mission instances by factory key.
#[derive(Clone)]
pub struct MissionFactory {
    hal: Arc<dyn Hal>,
}

impl MissionFactory {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self { hal }
    }

    /// Instantiate the named mission. Unknown names yield the idle
    /// mission with exactly one error log.
    pub fn create(&self, name: &str) -> Box<dyn Mission> {
        match name {
            "system-idle" | "idle" => Box::new(SystemIdleMission::new(self.hal.clone())),
            "radio-test" => Box::new(RadioTestMission::new(self.hal.clone())),
            "spectrum-scan" => Box::new(SpectrumScanMission::new(self.hal.clone())),
            "rf-noise" => Box::new(RfNoiseMission::new(self.hal.clone())),
            "ble-ranging" => Box::new(BleRangingMission::new(self.hal.clone())),
            other => {
                error!(mission = %other, "unknown mission requested, substituting idle");
                Box::new(SystemIdleMission::new(self.hal.clone()))
            }
        }
    }
}
