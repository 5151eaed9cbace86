//! Noise-floor measurement mission.
//!
//! Samples the receiver without sync word or packet logic. The sampling
//! itself happens in the radio driver; this mission tracks the cadence
//! and accepts readings pushed through the command channel.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use strix_core::Hal;

use crate::mission::Mission;

const MAX_SAMPLES: usize = 128;

/// Collects raw RSSI floor readings.
pub struct RfNoiseMission {
    hal: Arc<dyn Hal>,
    task_id: String,
    cycles: u64,
    samples: VecDeque<f64>,
}

impl RfNoiseMission {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self {
            hal,
            task_id: "rf-diag/noise".to_string(),
            cycles: 0,
            samples: VecDeque::new(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Lowest reading seen, i.e. the current floor estimate.
    pub fn floor_dbm(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    fn record(&mut self, dbm: f64) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(dbm);
    }
}

impl Mission for RfNoiseMission {
    fn setup(&mut self) {
        info!("noise floor check starting");
        self.cycles = 0;
        self.samples.clear();
    }

    fn advance(&mut self) {
        if !self.hal.radio_available() {
            return;
        }
        self.cycles += 1;
    }

    fn teardown(&mut self) {
        info!(samples = self.samples.len(), "noise floor check stopped");
    }

    fn name(&self) -> &'static str {
        "rf-noise"
    }

    fn task_label(&self) -> String {
        self.task_id.clone()
    }

    fn description(&self) -> &'static str {
        "Measures RSSI without sync word/packet logic."
    }

    fn configure(&mut self, task_id: &str, _params: &Value) {
        self.task_id = task_id.to_string();
    }

    fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        out.insert("task_id".to_string(), Value::from(self.task_id.clone()));
        out.insert("cycles".to_string(), Value::from(self.cycles));
        out.insert("samples".to_string(), Value::from(self.samples.len()));
        if let Some(floor) = self.floor_dbm() {
            out.insert("floor_dbm".to_string(), Value::from(floor));
        }
        true
    }

    fn handle_command(&mut self, name: &str, value: &str) {
        // The radio driver pushes readings as `sample` commands.
        if name == "sample" {
            match value.parse::<f64>() {
                Ok(dbm) => self.record(dbm),
                Err(_) => debug!(%value, "discarding unparseable sample"),
            }
        }
    }
}
