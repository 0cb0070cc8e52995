//! Terminal Tetris client (default binary).
//!
//! The game itself runs on the server. This binary creates or resumes a
//! game, drives it with the drop timer and the keyboard, and redraws a text
//! frame whenever the controller publishes a change.

mod screen;

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tetris_client::api::HttpBackend;
use tetris_client::core::GameController;
use tetris_client::input::{is_key_down, shell_command, ShellCommand};
use tetris_client::runtime::{open_game, telemetry, ClientConfig, DropScheduler, InputRouter};

use screen::{frame_lines, Screen};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ClientConfig::from_env().apply_args(&args)?;
    telemetry::init(&config.log_file())?;
    info!(url = %config.api.base_url, level = config.level, "starting");

    // A failed first game is shown on the no-game screen; `n` retries.
    let backend = HttpBackend::new(&config.api)?;
    let controller =
        open_game(backend, &config, |b| b.is_authenticated().then(|| b.anonymous())).await;
    let controller = Arc::new(controller);

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(controller, &config, &mut screen).await;

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

/// Blocking terminal reader feeding the async side.
fn spawn_key_reader(keys: mpsc::UnboundedSender<KeyEvent>) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) => {
                if keys.send(key).is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "terminal input closed");
                return;
            }
        }
    });
}

async fn run(
    controller: Arc<GameController<HttpBackend>>,
    config: &ClientConfig,
    screen: &mut Screen,
) -> Result<()> {
    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let (shell_tx, mut shell_rx) = mpsc::unbounded_channel();
    spawn_key_reader(key_tx);

    let _router = InputRouter::spawn(Arc::clone(&controller), key_rx, shell_tx);
    let _scheduler = DropScheduler::spawn(Arc::clone(&controller));

    let mut state_rx = controller.subscribe();
    let frame = frame_lines(&state_rx.borrow_and_update());
    screen.draw(&frame)?;

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let frame = frame_lines(&state_rx.borrow_and_update());
                screen.draw(&frame)?;
            }
            key = shell_rx.recv() => {
                let Some(key) = key else {
                    return Ok(());
                };
                if !is_key_down(&key) {
                    continue;
                }
                let Some(command) = shell_command(key) else {
                    continue;
                };
                debug!(?command, "shell command");
                match command {
                    ShellCommand::Quit => return Ok(()),
                    ShellCommand::DismissError => controller.dismiss_error(),
                    ShellCommand::TogglePause => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            let _ = controller.toggle_pause().await;
                        });
                    }
                    ShellCommand::Forfeit => {
                        if controller.state().has_active_game() {
                            let controller = Arc::clone(&controller);
                            tokio::spawn(async move {
                                let _ = controller.forfeit().await;
                            });
                        }
                    }
                    ShellCommand::NewGame => {
                        if !controller.state().has_active_game() {
                            let controller = Arc::clone(&controller);
                            let request = config.create_request();
                            tokio::spawn(async move {
                                controller.reset();
                                let _ = controller.create_game(request).await;
                            });
                        }
                    }
                }
            }
        }
    }
}
