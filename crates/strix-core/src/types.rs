//! Domain types for the strix orchestration core.
//!
//! These types cross crate boundaries: tasks and catalog descriptors
//! flow between the scheduler, the missions crate, and the control
//! surface; the status document is the wire contract every device both
//! serves and probes on its peers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

/// Unique identifier for a scheduled task.
pub type TaskId = String;

/// Name of a mission implementation (factory key).
pub type MissionName = String;

// ── Tasks ──────────────────────────────────────────────────────────

/// Priority class of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Startup and hardware self-checks. Always preempts.
    Critical,
    /// Requested through the external API.
    User,
    /// Directed by cluster convergence.
    Cluster,
    /// Idle and background scanning.
    Background,
}

/// The unit of scheduling: one mission invocation with parameters,
/// a priority class, and an optional duration budget.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Factory key selecting the mission to instantiate.
    pub mission: MissionName,
    /// Human-readable label, shown in status output.
    pub label: String,
    /// Mission-specific parameters, passed to `configure`.
    pub params: Value,
    /// Duration budget. `Duration::ZERO` means unbounded.
    pub duration: Duration,
    pub created_at: Instant,
    /// Set by the scheduler when the task becomes current.
    pub running: bool,
    pub started_at: Option<Instant>,
}

impl Task {
    /// Create a task with an empty id (the scheduler assigns a fallback).
    pub fn new(kind: TaskKind, mission: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            kind,
            mission: mission.into(),
            label: label.into(),
            params: Value::Null,
            duration: Duration::ZERO,
            created_at: Instant::now(),
            running: false,
            started_at: None,
        }
    }

    /// Set the task id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the mission parameter payload.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Set the duration budget.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the duration budget has elapsed. Unbounded tasks never expire.
    pub fn expired(&self) -> bool {
        if self.duration.is_zero() {
            return false;
        }
        match self.started_at {
            Some(started) => started.elapsed() >= self.duration,
            None => false,
        }
    }

    /// Serializable view for status reporting.
    pub fn view(&self) -> TaskView {
        TaskView {
            id: self.id.clone(),
            kind: self.kind,
            mission: self.mission.clone(),
            label: self.label.clone(),
            params: self.params.clone(),
            duration_ms: self.duration.as_millis() as u64,
            running: self.running,
            elapsed_ms: self.started_at.map(|s| s.elapsed().as_millis() as u64),
        }
    }
}

/// Snapshot of a task for the external API. Cross-context readers get
/// this copy, never a live `Task`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub kind: TaskKind,
    pub mission: MissionName,
    pub label: String,
    pub params: Value,
    pub duration_ms: u64,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

// ── Task catalog ───────────────────────────────────────────────────

/// Static descriptor of an invokable task, for capability discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDescriptor {
    /// Catalog id, e.g. `spectrum/scan`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Factory key of the implementing mission.
    pub mission: MissionName,
    pub description: String,
    /// Invocation endpoint path served by the external API layer.
    pub endpoint: String,
    /// Typed input schema. Empty for parameterless tasks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<TaskInput>,
}

/// One typed input field of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskInput {
    pub name: String,
    pub label: String,
    /// Type tag, e.g. `number` or `text`.
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl TaskInput {
    /// A required numeric input with default and bounds.
    pub fn number(
        name: &str,
        label: &str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: "number".to_string(),
            required: true,
            default: serde_json::Number::from_f64(default).map(Value::Number),
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }
}

// ── Peer status exchange ───────────────────────────────────────────

/// The status document exchanged between devices.
///
/// Served at the well-known status path by every device and fetched
/// during peer verification and probing. Only `hostname` is required;
/// a 200 response without it is treated as a failed verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatusDoc {
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Desired-task signal read by the cluster coordinator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_task: Option<DesiredTask>,
}

/// A peer's advertised desired task: what the cluster should run, and
/// whether execution has been requested yet (two-phase stage/start).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DesiredTask {
    /// Catalog task id, e.g. `spectrum/scan`.
    pub id: String,
    #[serde(default)]
    pub params: Value,
    /// True once some device has requested the staged task to start.
    #[serde(default)]
    pub start: bool,
}
