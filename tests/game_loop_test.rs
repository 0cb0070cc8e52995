use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use tetris_client::api::scripted::fixtures::{created, falling, move_from, piece, status};
use tetris_client::api::scripted::{BackendCall, ScriptedBackend};
use tetris_client::core::GameController;
use tetris_client::runtime::{DropScheduler, InputRouter};
use tetris_client::types::{CreateGameRequest, GameStatus, MoveRequest, MoveType};

fn moves(backend: &ScriptedBackend) -> Vec<MoveType> {
    backend.move_calls().iter().map(|r| r.move_type).collect()
}

#[tokio::test(start_paused = true)]
async fn timer_and_keys_drive_one_game_to_the_end() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_create(Ok(created(8, 1)));
    backend.set_status(status(GameStatus::Ongoing, 1));

    let controller = Arc::new(GameController::new(Arc::clone(&backend)));
    controller
        .create_game(CreateGameRequest::default())
        .await
        .unwrap();
    backend.clear_calls();

    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let (pass_tx, mut passed) = mpsc::unbounded_channel();
    let _router = InputRouter::spawn(Arc::clone(&controller), key_rx, pass_tx);
    let _scheduler = DropScheduler::spawn(Arc::clone(&controller));

    // First hold stores the falling piece.
    let mut stored = move_from(&status(GameStatus::Ongoing, 1));
    stored.current_piece = Some(falling(1, 0, 3));
    stored.held_piece = Some(piece(6));
    stored.can_hold = Some(false);
    backend.set_move(stored.clone());
    key_tx
        .send(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE))
        .unwrap();
    key_tx
        .send(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
        .unwrap();
    assert_eq!(passed.recv().await.unwrap().code, KeyCode::Char('x'));
    assert_eq!(backend.move_calls(), vec![MoveRequest::new(MoveType::Hold)]);
    assert_eq!(controller.snapshot().unwrap().held_piece, Some(piece(6)));

    // Gravity keeps ticking; each tick lands one row lower.
    let mut lower = stored.clone();
    lower.current_piece = Some(falling(1, 1, 3));
    backend.set_move(lower);
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(moves(&backend), vec![MoveType::Hold, MoveType::Down, MoveType::Down]);

    // A tick that tops out ends the game and stops the timer.
    let mut over = stored.clone();
    over.status = GameStatus::GameOver;
    backend.set_move(over);
    backend.set_status(status(GameStatus::GameOver, 1));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(controller.state().is_game_over());
    assert!(backend.calls().contains(&BackendCall::Status(8)));

    backend.clear_calls();
    tokio::time::sleep(Duration::from_millis(5000)).await;
    key_tx
        .send(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE))
        .unwrap();
    assert_eq!(passed.recv().await.unwrap().code, KeyCode::Left);
    assert!(backend.calls().is_empty());
    assert_eq!(
        controller.snapshot().unwrap().held_piece,
        Some(piece(6)),
        "held piece survives the final refetch"
    );
}

#[tokio::test(start_paused = true)]
async fn held_key_does_not_starve_gravity() {
    let backend = Arc::new(ScriptedBackend::new().with_move_delay(Duration::from_millis(80)));
    backend.push_create(Ok(created(8, 1)));
    backend.set_status(status(GameStatus::Ongoing, 1));
    backend.set_move(move_from(&status(GameStatus::Ongoing, 1)));

    let controller = Arc::new(GameController::new(Arc::clone(&backend)));
    controller
        .create_game(CreateGameRequest::default())
        .await
        .unwrap();
    backend.clear_calls();

    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let (pass_tx, mut passed) = mpsc::unbounded_channel();
    let _router = InputRouter::spawn(Arc::clone(&controller), key_rx, pass_tx);
    let _scheduler = DropScheduler::spawn(Arc::clone(&controller));

    // Auto-repeat at roughly 30 Hz for five seconds.
    let sent = 150;
    let repeater = {
        let key_tx = key_tx.clone();
        tokio::spawn(async move {
            for _ in 0..sent {
                key_tx
                    .send(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE))
                    .unwrap();
                tokio::time::sleep(Duration::from_millis(33)).await;
            }
        })
    };
    tokio::time::sleep(Duration::from_millis(5050)).await;
    let downs = moves(&backend)
        .iter()
        .filter(|m| **m == MoveType::Down)
        .count();
    assert!(downs >= 4, "only {downs} drops in 5s");

    // Every key press is eventually sent.
    repeater.await.unwrap();
    key_tx
        .send(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
        .unwrap();
    assert_eq!(passed.recv().await.unwrap().code, KeyCode::Char('x'));
    let lefts = moves(&backend)
        .iter()
        .filter(|m| **m == MoveType::Left)
        .count();
    assert_eq!(lefts, sent);
}
