//! Band sweep mission.
//!
//! Steps a frequency window in bandwidth-sized increments, one step per
//! worker cycle. The radio driver itself is an external collaborator;
//! this mission owns the sweep plan, parameter validation, and the
//! status report.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use strix_core::Hal;

use crate::mission::Mission;

// CC1101-class band plan.
pub const BAND1_MIN_MHZ: f64 = 300.0;
pub const BAND1_MAX_MHZ: f64 = 348.0;
pub const BAND2_MIN_MHZ: f64 = 387.0;
pub const BAND2_MAX_MHZ: f64 = 464.0;
pub const BAND3_MIN_MHZ: f64 = 779.0;
pub const BAND3_MAX_MHZ: f64 = 928.0;
pub const MIN_BANDWIDTH_KHZ: f64 = 58.0;
pub const MAX_BANDWIDTH_KHZ: f64 = 812.0;
pub const MIN_POWER_DBM: f64 = -30.0;
pub const MAX_POWER_DBM: f64 = 10.0;

pub const DEFAULT_START_MHZ: f64 = 905.0;
pub const DEFAULT_STOP_MHZ: f64 = 928.0;
pub const DEFAULT_BANDWIDTH_KHZ: f64 = 500.0;
pub const DEFAULT_POWER_DBM: f64 = -1.0;

/// Whether a sweep window sits inside one allowed band.
pub fn frequency_range_allowed(start_mhz: f64, stop_mhz: f64) -> bool {
    if stop_mhz <= start_mhz {
        return false;
    }
    let in_band = |min: f64, max: f64| start_mhz >= min && stop_mhz <= max;
    in_band(BAND1_MIN_MHZ, BAND1_MAX_MHZ)
        || in_band(BAND2_MIN_MHZ, BAND2_MAX_MHZ)
        || in_band(BAND3_MIN_MHZ, BAND3_MAX_MHZ)
}

pub fn bandwidth_allowed(khz: f64) -> bool {
    (MIN_BANDWIDTH_KHZ..=MAX_BANDWIDTH_KHZ).contains(&khz)
}

pub fn power_allowed(dbm: f64) -> bool {
    (MIN_POWER_DBM..=MAX_POWER_DBM).contains(&dbm)
}

/// Sweeps a configured frequency window and counts completed passes.
pub struct SpectrumScanMission {
    hal: Arc<dyn Hal>,
    task_id: String,
    start_mhz: f64,
    stop_mhz: f64,
    bandwidth_khz: f64,
    power_dbm: f64,
    current_mhz: f64,
    sweeps: u64,
    steps: u64,
}

impl SpectrumScanMission {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self {
            hal,
            task_id: "spectrum/scan".to_string(),
            start_mhz: DEFAULT_START_MHZ,
            stop_mhz: DEFAULT_STOP_MHZ,
            bandwidth_khz: DEFAULT_BANDWIDTH_KHZ,
            power_dbm: DEFAULT_POWER_DBM,
            current_mhz: DEFAULT_START_MHZ,
            sweeps: 0,
            steps: 0,
        }
    }

    fn step_mhz(&self) -> f64 {
        self.bandwidth_khz / 1000.0
    }

    pub fn completed_sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn window(&self) -> (f64, f64) {
        (self.start_mhz, self.stop_mhz)
    }
}

impl Mission for SpectrumScanMission {
    fn setup(&mut self) {
        self.current_mhz = self.start_mhz;
        self.sweeps = 0;
        self.steps = 0;
        info!(
            start_mhz = self.start_mhz,
            stop_mhz = self.stop_mhz,
            bandwidth_khz = self.bandwidth_khz,
            "sweep starting"
        );
    }

    fn advance(&mut self) {
        if !self.hal.radio_available() {
            return;
        }

        self.steps += 1;
        self.current_mhz += self.step_mhz();
        if self.current_mhz > self.stop_mhz {
            self.current_mhz = self.start_mhz;
            self.sweeps += 1;
        }
    }

    fn teardown(&mut self) {
        info!(sweeps = self.sweeps, "sweep stopped");
    }

    fn name(&self) -> &'static str {
        "spectrum-scan"
    }

    fn task_label(&self) -> String {
        self.task_id.clone()
    }

    fn description(&self) -> &'static str {
        "Standard sweep, returns power levels."
    }

    fn configure(&mut self, task_id: &str, params: &Value) {
        self.task_id = task_id.to_string();

        if let (Some(start), Some(stop)) = (
            params.get("start").and_then(Value::as_f64),
            params.get("stop").and_then(Value::as_f64),
        ) {
            self.start_mhz = start;
            self.stop_mhz = stop;
        }
        if let Some(bandwidth) = params.get("bandwidth").and_then(Value::as_f64) {
            self.bandwidth_khz = bandwidth;
        }
        if let Some(power) = params.get("power").and_then(Value::as_f64) {
            self.power_dbm = power;
        }

        if !frequency_range_allowed(self.start_mhz, self.stop_mhz) {
            warn!(
                start_mhz = self.start_mhz,
                stop_mhz = self.stop_mhz,
                "invalid frequency range, using defaults"
            );
            self.start_mhz = DEFAULT_START_MHZ;
            self.stop_mhz = DEFAULT_STOP_MHZ;
        }
        if !bandwidth_allowed(self.bandwidth_khz) {
            warn!(
                bandwidth_khz = self.bandwidth_khz,
                "invalid bandwidth, using default"
            );
            self.bandwidth_khz = DEFAULT_BANDWIDTH_KHZ;
        }
        if !power_allowed(self.power_dbm) {
            warn!(power_dbm = self.power_dbm, "invalid power, using default");
            self.power_dbm = DEFAULT_POWER_DBM;
        }

        self.current_mhz = self.start_mhz;
    }

    fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        out.insert("task_id".to_string(), Value::from(self.task_id.clone()));
        out.insert("start_mhz".to_string(), Value::from(self.start_mhz));
        out.insert("stop_mhz".to_string(), Value::from(self.stop_mhz));
        out.insert(
            "bandwidth_khz".to_string(),
            Value::from(self.bandwidth_khz),
        );
        out.insert("power_dbm".to_string(), Value::from(self.power_dbm));
        out.insert("current_mhz".to_string(), Value::from(self.current_mhz));
        out.insert("sweeps".to_string(), Value::from(self.sweeps));
        out.insert("steps".to_string(), Value::from(self.steps));
        true
    }
}
