//! Static task catalog and task-id routing.
//!
//! The catalog is the capability registry external callers discover
//! tasks from. It is immutable and built once per call site; only the
//! spectrum entry carries a typed input schema.

use strix_core::{TaskDescriptor, TaskInput};

use crate::spectrum;

/// All invokable tasks on this device.
pub fn task_catalog() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor {
            id: "system/idle".to_string(),
            name: "System Idle".to_string(),
            mission: "system-idle".to_string(),
            description: "Low power background monitoring.".to_string(),
            endpoint: "/api/task/system/idle".to_string(),
            inputs: Vec::new(),
        },
        TaskDescriptor {
            id: "radio/test".to_string(),
            name: "Radio Self-Test".to_string(),
            mission: "radio-test".to_string(),
            description: "Startup hardware check across the supported bands.".to_string(),
            endpoint: "/api/task/radio/test".to_string(),
            inputs: Vec::new(),
        },
        TaskDescriptor {
            id: "spectrum/scan".to_string(),
            name: "Band Scan".to_string(),
            mission: "spectrum-scan".to_string(),
            description: "Standard sweep, returns power levels.".to_string(),
            endpoint: "/api/task/spectrum/scan".to_string(),
            inputs: vec![
                TaskInput::number(
                    "start",
                    "Start Frequency (MHz)",
                    spectrum::DEFAULT_START_MHZ,
                    spectrum::BAND1_MIN_MHZ,
                    spectrum::BAND3_MAX_MHZ,
                    0.1,
                ),
                TaskInput::number(
                    "stop",
                    "Stop Frequency (MHz)",
                    spectrum::DEFAULT_STOP_MHZ,
                    spectrum::BAND1_MIN_MHZ,
                    spectrum::BAND3_MAX_MHZ,
                    0.1,
                ),
                TaskInput::number(
                    "bandwidth",
                    "Channel Bandwidth (kHz)",
                    spectrum::DEFAULT_BANDWIDTH_KHZ,
                    spectrum::MIN_BANDWIDTH_KHZ,
                    spectrum::MAX_BANDWIDTH_KHZ,
                    1.0,
                ),
                TaskInput::number(
                    "power",
                    "Broadcast Power (dBm)",
                    spectrum::DEFAULT_POWER_DBM,
                    spectrum::MIN_POWER_DBM,
                    spectrum::MAX_POWER_DBM,
                    1.0,
                ),
            ],
        },
        TaskDescriptor {
            id: "rf-diag/noise".to_string(),
            name: "Noise Floor Check".to_string(),
            mission: "rf-noise".to_string(),
            description: "Measures RSSI without sync word/packet logic.".to_string(),
            endpoint: "/api/task/rf-diag/noise".to_string(),
            inputs: Vec::new(),
        },
        TaskDescriptor {
            id: "ble-ranging/peer".to_string(),
            name: "BLE Peer Ranging".to_string(),
            mission: "ble-ranging".to_string(),
            description: "Active scan + RSSI history logging for specific targets.".to_string(),
            endpoint: "/api/task/ble-ranging/peer".to_string(),
            inputs: Vec::new(),
        },
        TaskDescriptor {
            id: "ble-ranging/survey".to_string(),
            name: "BLE Device Survey".to_string(),
            mission: "ble-ranging".to_string(),
            description: "Lists all nearby BLE addresses and payloads.".to_string(),
            endpoint: "/api/task/ble-ranging/survey".to_string(),
            inputs: Vec::new(),
        },
    ]
}

/// Resolve a catalog task id to its implementing mission.
///
/// Prefix-based: ids under one namespace share a mission.
pub fn mission_for_task(task_id: &str) -> Option<&'static str> {
    if task_id.starts_with("system/idle") {
        Some("system-idle")
    } else if task_id.starts_with("radio/test") {
        Some("radio-test")
    } else if task_id.starts_with("spectrum") {
        Some("spectrum-scan")
    } else if task_id.starts_with("rf-diag") {
        Some("rf-noise")
    } else if task_id.starts_with("ble-ranging") {
        Some("ble-ranging")
    } else {
        None
    }
}
