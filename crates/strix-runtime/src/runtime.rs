//! The mission slot and its locking discipline.

use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info};

use strix_missions::Mission;

/// How long the worker context waits for the slot before skipping a
/// cycle. Long enough to ride out a mission swap, short enough that the
/// worker stays responsive to liveness checks.
const ADVANCE_LOCK_TIMEOUT: Duration = Duration::from_millis(100);

/// Bounded wait for status reads, which are best-effort.
const STATUS_LOCK_TIMEOUT: Duration = Duration::from_millis(50);

/// Outcome of one worker-context advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The active mission ran one step.
    Advanced,
    /// A mission is installed but staged, not started.
    Staged,
    /// No mission is installed.
    Empty,
    /// The slot was locked for longer than the bounded wait.
    Contended,
}

struct Slot {
    mission: Option<Box<dyn Mission>>,
    running: bool,
}

/// Exclusive owner of the active mission.
///
/// `load` and `stage` take ownership of the passed-in mission; the
/// previous mission is torn down and dropped inside the same critical
/// section, so the worker context can never observe a half-switched
/// slot.
pub struct MissionRuntime {
    slot: Mutex<Slot>,
}

impl MissionRuntime {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                mission: None,
                running: false,
            }),
        }
    }

    /// Install a mission, replacing the previous one.
    ///
    /// Blocks without bound until the slot is free: mission switches
    /// must never be dropped, even if the worker holds the lock for a
    /// full advance step.
    pub async fn load(&self, mission: Box<dyn Mission>, start_running: bool) {
        let mut slot = self.slot.lock().await;

        if let Some(mut old) = slot.mission.take() {
            info!(mission = old.name(), "stopping mission");
            old.teardown();
        }

        info!(mission = mission.name(), start_running, "starting mission");
        slot.mission = Some(mission);
        if let Some(mission) = slot.mission.as_mut() {
            mission.setup();
        }
        slot.running = start_running;
    }

    /// Install a mission without letting the worker context run it yet.
    ///
    /// Used by cluster coordination so every device can initialize a
    /// mission before any of them produces side effects.
    pub async fn stage(&self, mission: Box<dyn Mission>) {
        self.load(mission, false).await;
    }

    /// Start the currently staged mission. Returns false if the slot is
    /// empty.
    pub async fn start(&self) -> bool {
        let mut slot = self.slot.lock().await;
        if slot.mission.is_none() {
            return false;
        }
        slot.running = true;
        true
    }

    /// One worker-context advance attempt with a bounded lock wait.
    ///
    /// Contention is not an error: the control context may be mid-swap,
    /// so the worker yields and retries next cycle.
    pub async fn advance(&self) -> AdvanceOutcome {
        let Ok(mut slot) = timeout(ADVANCE_LOCK_TIMEOUT, self.slot.lock()).await else {
            debug!("mission slot contended, skipping cycle");
            return AdvanceOutcome::Contended;
        };

        let running = slot.running;
        match slot.mission.as_mut() {
            Some(mission) if running => {
                mission.advance();
                AdvanceOutcome::Advanced
            }
            Some(_) => AdvanceOutcome::Staged,
            None => AdvanceOutcome::Empty,
        }
    }

    /// Whether the active mission is marked running.
    pub async fn is_running(&self) -> bool {
        self.slot.lock().await.running
    }

    /// Factory name of the active mission, best-effort.
    pub async fn active_mission_name(&self) -> Option<String> {
        let slot = timeout(STATUS_LOCK_TIMEOUT, self.slot.lock()).await.ok()?;
        slot.mission.as_ref().map(|m| m.name().to_string())
    }

    /// Task label of the active mission, best-effort.
    pub async fn active_task_label(&self) -> Option<String> {
        let slot = timeout(STATUS_LOCK_TIMEOUT, self.slot.lock()).await.ok()?;
        slot.mission.as_ref().map(|m| m.task_label())
    }

    /// Ask the active mission to write its status. Returns whether
    /// anything was written; a contended slot writes nothing.
    pub async fn report_status(&self, out: &mut Map<String, Value>) -> bool {
        let Ok(slot) = timeout(STATUS_LOCK_TIMEOUT, self.slot.lock()).await else {
            return false;
        };
        match slot.mission.as_ref() {
            Some(mission) => mission.report_status(out),
            None => false,
        }
    }

    /// Forward a command to the active mission. Returns whether a
    /// mission was there to receive it.
    pub async fn handle_command(&self, name: &str, value: &str) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.mission.as_mut() {
            Some(mission) => {
                mission.handle_command(name, value);
                true
            }
            None => false,
        }
    }
}

impl Default for MissionRuntime {
    fn default() -> Self {
        Self::new()
    }
}
