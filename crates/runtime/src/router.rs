//! Routes key presses to the controller while a game is running.
//!
//! The router is attached only while the game is active (ongoing and not
//! paused). While detached, and for keys it does not map, events are passed
//! through untouched to the shell. Keys the router handles are consumed.
//!
//! Intents are handled one at a time in arrival order. An intent that finds
//! another move in flight (a drop tick, usually) waits for it, so no key
//! press is lost.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::api::Backend;
use crate::core::GameController;
use crate::input::{is_key_down, route_key, RoutedInput};

/// Running input router. Stopped on drop.
pub struct InputRouter {
    handle: JoinHandle<()>,
}

impl InputRouter {
    /// Start routing `keys`; unhandled keys go to `passthrough`.
    pub fn spawn<B: Backend>(
        controller: Arc<GameController<B>>,
        keys: mpsc::UnboundedReceiver<KeyEvent>,
        passthrough: mpsc::UnboundedSender<KeyEvent>,
    ) -> Self {
        Self {
            handle: tokio::spawn(run(controller, keys, passthrough)),
        }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for InputRouter {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<B: Backend>(
    controller: Arc<GameController<B>>,
    mut keys: mpsc::UnboundedReceiver<KeyEvent>,
    passthrough: mpsc::UnboundedSender<KeyEvent>,
) {
    let mut state_rx = controller.subscribe();
    let mut attached = state_rx.borrow_and_update().is_active();

    loop {
        tokio::select! {
            biased;

            changed = state_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let active = state_rx.borrow_and_update().is_active();
                if active != attached {
                    attached = active;
                    debug!(attached, "input router");
                }
            }
            key = keys.recv() => {
                let Some(key) = key else {
                    return;
                };
                if !is_key_down(&key) {
                    continue;
                }
                let routed = if attached { route_key(key) } else { None };
                match routed {
                    Some(RoutedInput::Move(move_type)) => {
                        match controller.dispatch_waiting(move_type).await {
                            Ok(outcome) => trace!(%move_type, ?outcome, "key move"),
                            Err(e) => warn!(%move_type, error = %e, "key move failed"),
                        }
                    }
                    Some(RoutedInput::TogglePause) => {
                        if let Err(e) = controller.toggle_pause().await {
                            warn!(error = %e, "pause toggle failed");
                        }
                    }
                    None => {
                        if passthrough.send(key).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}
