//! The worker-context loop.
//!
//! A dedicated task that repeatedly advances the active mission. It
//! must never block indefinitely: contention and idle slots only change
//! how long it yields before the next cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::runtime::{AdvanceOutcome, MissionRuntime};

/// Yield after a successful advance, to be nice to the control context.
const ADVANCE_YIELD: Duration = Duration::from_millis(1);

/// Longer yield when there is nothing to run.
const IDLE_YIELD: Duration = Duration::from_millis(100);

/// Drive the active mission until shutdown is signalled.
pub async fn run_worker(runtime: Arc<MissionRuntime>, mut shutdown: watch::Receiver<bool>) {
    info!("mission worker started");

    loop {
        let yield_for = match runtime.advance().await {
            AdvanceOutcome::Advanced | AdvanceOutcome::Contended => ADVANCE_YIELD,
            AdvanceOutcome::Staged | AdvanceOutcome::Empty => IDLE_YIELD,
        };

        tokio::select! {
            _ = tokio::time::sleep(yield_for) => {}
            _ = shutdown.changed() => {
                debug!("mission worker shutting down");
                break;
            }
        }
    }
}
