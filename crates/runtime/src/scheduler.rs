//! Level-driven gravity timer.
//!
//! Emits one `down` move per period while the game is active. A tick that
//! finds a key move in flight waits for it instead of being lost. The timer
//! is torn down whenever the game stops being active or the level changes,
//! and rebuilt with the new period when it becomes active again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::api::Backend;
use crate::core::{GameController, MoveOutcome};
use crate::types::{drop_interval_ms, MoveType};

/// Running drop timer. Stopped on drop.
pub struct DropScheduler {
    handle: JoinHandle<()>,
}

impl DropScheduler {
    pub fn spawn<B: Backend>(controller: Arc<GameController<B>>) -> Self {
        Self {
            handle: tokio::spawn(run(controller)),
        }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DropScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn drop_period(level: u32) -> Duration {
    Duration::from_millis(drop_interval_ms(level))
}

async fn run<B: Backend>(controller: Arc<GameController<B>>) {
    let mut state_rx = controller.subscribe();

    loop {
        let gate = state_rx.borrow_and_update().drop_gate();
        let Some(level) = gate else {
            if state_rx.changed().await.is_err() {
                return;
            }
            continue;
        };

        let period = drop_period(level);
        debug!(level, period_ms = period.as_millis() as u64, "drop timer armed");
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = state_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if state_rx.borrow_and_update().drop_gate() != Some(level) {
                        debug!(level, "drop timer disarmed");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match controller.dispatch_waiting(MoveType::Down).await {
                        Ok(MoveOutcome::Skipped(reason)) => trace!(%reason, "drop tick skipped"),
                        Ok(outcome) => trace!(?outcome, "drop tick"),
                        Err(e) => warn!(error = %e, "drop tick failed"),
                    }
                }
            }
        }
    }
}
