//! Task queue and lifecycle.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};

use strix_core::{Task, TaskKind, TaskView};
use strix_missions::{IDLE_MISSION, MissionFactory};
use strix_runtime::MissionRuntime;

/// Owns the queue and the current task; drives the mission runtime.
///
/// Mutated only from the control context. Cross-context readers take
/// [`TaskView`] snapshots.
pub struct Scheduler {
    runtime: Arc<MissionRuntime>,
    factory: MissionFactory,
    queue: VecDeque<Task>,
    current: Option<Task>,
    idle: bool,
    /// Monotonic source for fallback task ids.
    next_seq: u64,
}

impl Scheduler {
    pub fn new(runtime: Arc<MissionRuntime>, factory: MissionFactory) -> Self {
        Self {
            runtime,
            factory,
            queue: VecDeque::new(),
            current: None,
            idle: true,
            next_seq: 1,
        }
    }

    /// Start with the idle mission active.
    pub async fn begin(&mut self) {
        info!("scheduler starting");
        self.start_idle().await;
    }

    /// Append a task to the queue. Takes effect on a later `tick`.
    ///
    /// Assigns a fallback id if the caller omitted one.
    pub fn enqueue(&mut self, mut task: Task) {
        if task.id.is_empty() {
            task.id = format!("task-{}", self.next_seq());
        }
        info!(task = %task.label, mission = %task.mission, id = %task.id, "task enqueued");
        self.queue.push_back(task);
    }

    /// Switch to a task immediately, bypassing FIFO order.
    pub async fn preempt(&mut self, mut task: Task) {
        if task.id.is_empty() {
            task.id = format!("task-{}", self.next_seq());
        }
        warn!(task = %task.label, "preempting current task");
        self.switch_to(task).await;
    }

    /// One control-context pass: expire the current task, then promote
    /// the queue front if idle.
    pub async fn tick(&mut self) {
        if !self.idle {
            let expired = self.current.as_ref().is_some_and(Task::expired);
            if expired {
                if let Some(current) = &self.current {
                    info!(task = %current.label, "task expired");
                }
                self.start_idle().await;
            }
        }

        if self.idle {
            if let Some(next) = self.queue.pop_front() {
                self.switch_to(next).await;
            }
        }
    }

    /// Whether the designated background task is active.
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Snapshot of the current task.
    pub fn current_task(&self) -> Option<TaskView> {
        self.current.as_ref().map(Task::view)
    }

    /// Snapshot of the queue, front first.
    pub fn queued_tasks(&self) -> Vec<TaskView> {
        self.queue.iter().map(Task::view).collect()
    }

    /// The only path by which the active mission changes.
    async fn switch_to(&mut self, mut task: Task) {
        task.started_at = Some(Instant::now());
        task.running = true;
        self.idle = task.kind == TaskKind::Background;

        info!(task = %task.label, mission = %task.mission, "switching task");

        let mut mission = self.factory.create(&task.mission);
        mission.configure(&task.id, &task.params);
        self.runtime.load(mission, true).await;

        self.current = Some(task);
    }

    /// Fall back to the idle task. A no-op when the idle mission is
    /// already active, so idle ticks do not restart it.
    async fn start_idle(&mut self) {
        let already_idle = self.idle
            && self
                .current
                .as_ref()
                .is_some_and(|c| c.mission == IDLE_MISSION);
        if already_idle {
            return;
        }

        let idle = Task::new(TaskKind::Background, IDLE_MISSION, "System Idle")
            .with_id(format!("idle-{}", self.next_seq()));
        self.switch_to(idle).await;
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
