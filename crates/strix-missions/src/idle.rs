//! The always-available background mission.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::info;

use strix_core::Hal;

use crate::mission::Mission;

/// Runs when nothing else is scheduled. Keeps the LED dim and emits a
/// periodic heartbeat so the log shows the device is alive.
pub struct SystemIdleMission {
    hal: Arc<dyn Hal>,
    last_heartbeat: Option<Instant>,
    ticks: u64,
}

const HEARTBEAT_SECS: u64 = 10;

impl SystemIdleMission {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self {
            hal,
            last_heartbeat: None,
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Mission for SystemIdleMission {
    fn setup(&mut self) {
        info!("entering idle state");
        self.hal.set_led(32, 0, 32);
        self.last_heartbeat = Some(Instant::now());
    }

    fn advance(&mut self) {
        self.ticks += 1;
        if let Some(last) = self.last_heartbeat {
            if last.elapsed().as_secs() >= HEARTBEAT_SECS {
                self.last_heartbeat = Some(Instant::now());
                info!(ticks = self.ticks, "idle heartbeat");
            }
        }
    }

    fn teardown(&mut self) {
        info!("leaving idle state");
    }

    fn name(&self) -> &'static str {
        "system-idle"
    }

    fn task_label(&self) -> String {
        "Independent Exploration".to_string()
    }

    fn description(&self) -> &'static str {
        "Low power background monitoring."
    }

    fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        out.insert("idle_ticks".to_string(), Value::from(self.ticks));
        true
    }
}
