//! The mission contract.

use serde_json::{Map, Value};

/// Lifecycle and metadata contract implemented by every mission.
///
/// Lifecycle hooks run under the runtime's critical section: `setup`
/// after the previous mission's `teardown`, `advance` once per worker
/// cycle while the mission is running, `teardown` before the instance
/// is dropped. `advance` must return within a few tens of milliseconds;
/// long waits belong to the worker loop, not the mission.
///
/// `configure` is invoked before the instance is handed to the runtime,
/// while it is still exclusively owned by the control context, so it
/// needs no locking. Unrecognized parameter fields are ignored and
/// defaults apply.
pub trait Mission: Send {
    fn setup(&mut self);

    /// One short, non-blocking step of work.
    fn advance(&mut self);

    /// Leave hardware in a safe state. Called before the instance is
    /// dropped on replacement.
    fn teardown(&mut self);

    /// Factory key, e.g. `spectrum-scan`.
    fn name(&self) -> &'static str;

    /// Human-readable label of the configured task.
    fn task_label(&self) -> String;

    fn description(&self) -> &'static str {
        ""
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    /// Apply task parameters. Unknown fields are ignored; out-of-range
    /// values fall back to defaults.
    fn configure(&mut self, _task_id: &str, _params: &Value) {}

    /// Best-effort status report. Returns whether anything was written.
    fn report_status(&self, _out: &mut Map<String, Value>) -> bool {
        false
    }

    /// Named command from the external API or a collaborating driver.
    fn handle_command(&mut self, _name: &str, _value: &str) {}
}
