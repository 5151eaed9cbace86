//! Short-range ranging mission.
//!
//! Two modes, selected by task id: `peer` tracks RSSI history for a
//! configured set of targets, `survey` counts every device seen. The
//! BLE scanner driver is external and feeds observations through the
//! command channel as `observe` commands (`<address>=<rssi>`).

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use strix_core::Hal;

use crate::mission::Mission;

const HISTORY_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Track only the configured targets.
    Peer,
    /// Record every address seen.
    Survey,
}

/// Active scan with per-address RSSI history.
pub struct BleRangingMission {
    hal: Arc<dyn Hal>,
    task_id: String,
    mode: Mode,
    targets: Vec<String>,
    history: HashMap<String, VecDeque<i64>>,
    cycles: u64,
}

impl BleRangingMission {
    pub fn new(hal: Arc<dyn Hal>) -> Self {
        Self {
            hal,
            task_id: "ble-ranging/survey".to_string(),
            mode: Mode::Survey,
            targets: Vec::new(),
            history: HashMap::new(),
            cycles: 0,
        }
    }

    pub fn tracked_addresses(&self) -> Vec<String> {
        let mut addrs: Vec<String> = self.history.keys().cloned().collect();
        addrs.sort();
        addrs
    }

    pub fn history_for(&self, address: &str) -> Option<&VecDeque<i64>> {
        self.history.get(address)
    }

    fn observe(&mut self, address: &str, rssi: i64) {
        if self.mode == Mode::Peer && !self.targets.iter().any(|t| t == address) {
            return;
        }
        let entry = self.history.entry(address.to_string()).or_default();
        if entry.len() == HISTORY_DEPTH {
            entry.pop_front();
        }
        entry.push_back(rssi);
    }
}

impl Mission for BleRangingMission {
    fn setup(&mut self) {
        info!(mode = ?self.mode, targets = self.targets.len(), "ranging scan starting");
        self.hal.set_led(0, 0, 128);
        self.history.clear();
        self.cycles = 0;
    }

    fn advance(&mut self) {
        self.cycles += 1;
    }

    fn teardown(&mut self) {
        info!(seen = self.history.len(), "ranging scan stopped");
    }

    fn name(&self) -> &'static str {
        "ble-ranging"
    }

    fn task_label(&self) -> String {
        self.task_id.clone()
    }

    fn description(&self) -> &'static str {
        "Active scan with RSSI history logging."
    }

    fn configure(&mut self, task_id: &str, params: &Value) {
        self.task_id = task_id.to_string();
        self.mode = if task_id.ends_with("/peer") {
            Mode::Peer
        } else {
            Mode::Survey
        };

        if let Some(targets) = params.get("targets").and_then(Value::as_array) {
            self.targets = targets
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }

        if self.mode == Mode::Peer && self.targets.is_empty() {
            warn!("peer ranging configured without targets");
        }
    }

    fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        out.insert("task_id".to_string(), Value::from(self.task_id.clone()));
        out.insert("cycles".to_string(), Value::from(self.cycles));

        let devices: Map<String, Value> = self
            .history
            .iter()
            .map(|(addr, rssi)| {
                let values: Vec<Value> = rssi.iter().map(|&v| Value::from(v)).collect();
                (addr.clone(), Value::Array(values))
            })
            .collect();
        out.insert("devices".to_string(), Value::Object(devices));
        true
    }

    fn handle_command(&mut self, name: &str, value: &str) {
        match name {
            "observe" => {
                if let Some((address, rssi)) = value.split_once('=') {
                    match rssi.parse::<i64>() {
                        Ok(rssi) => self.observe(address, rssi),
                        Err(_) => debug!(%value, "discarding unparseable observation"),
                    }
                }
            }
            "track" => {
                if !self.targets.iter().any(|t| t == value) {
                    self.targets.push(value.to_string());
                }
            }
            _ => {}
        }
    }
}
