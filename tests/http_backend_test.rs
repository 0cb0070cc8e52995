use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tetris_client::api::{ApiConfig, ApiError, Backend, HttpBackend};
use tetris_client::core::{GameController, MoveOutcome};
use tetris_client::types::{CreateGameRequest, GameStatus, MoveRequest, MoveType};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// Answers one request per canned response, in order, then stops.
async fn serve(responses: Vec<(u16, String)>) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&log);

    tokio::spawn(async move {
        for (code, body) in responses {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).await.unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut content_length = 0usize;
            let mut authorization = None;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let value = value.trim().to_string();
                    match name.to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.parse().unwrap(),
                        "authorization" => authorization = Some(value),
                        _ => {}
                    }
                }
            }
            let mut body_bytes = vec![0u8; content_length];
            reader.read_exact(&mut body_bytes).await.unwrap();

            recorded.lock().unwrap().push(Recorded {
                method,
                path,
                authorization,
                body: String::from_utf8(body_bytes).unwrap(),
            });

            let response = format!(
                "HTTP/1.1 {code} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            write_half.write_all(response.as_bytes()).await.unwrap();
            write_half.flush().await.unwrap();
        }
    });

    (format!("http://{addr}"), log)
}

fn backend(base_url: &str, token: Option<&str>) -> HttpBackend {
    HttpBackend::new(&ApiConfig {
        base_url: base_url.to_string(),
        token: token.map(str::to_string),
        timeout_ms: 2_000,
    })
    .unwrap()
}

fn board_json(width: usize, height: usize) -> String {
    let row = format!("[{}]", vec!["0"; width].join(","));
    format!("[{}]", vec![row; height].join(","))
}

fn status_json(status: &str, score: u64) -> String {
    format!(
        r#"{{"board":{},"current_piece":{{"shape":[[6,6,6],[0,6,0]],"color":6,"position":[0,3],"rotation":0}},"next_piece":{{"shape":[[1,1,1,1]],"color":1}},"held_piece":null,"score":{score},"level":1,"lines_cleared":0,"can_hold":true,"status":"{status}"}}"#,
        board_json(10, 20)
    )
}

fn body_json(r: &Recorded) -> serde_json::Value {
    serde_json::from_str(&r.body).unwrap()
}

#[tokio::test]
async fn create_game_posts_settings_with_bearer_token() {
    let (url, log) = serve(vec![(
        200,
        r#"{"game_id":17,"width":10,"height":20,"level":3}"#.to_string(),
    )])
    .await;

    let created = backend(&url, Some("secret"))
        .create_game(&CreateGameRequest {
            level: 3,
            ..CreateGameRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(created.game_id, 17);

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, "/tetris");
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(body_json(&calls[0]), serde_json::json!({"level": 3}));
}

#[tokio::test]
async fn hold_pop_sends_both_flags() {
    let (url, log) = serve(vec![(200, status_json("ongoing", 0))]).await;

    backend(&url, None)
        .make_move(17, &MoveRequest::hold_pop())
        .await
        .unwrap();

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls[0].path, "/tetris/17/moves");
    assert_eq!(calls[0].authorization, None);
    assert_eq!(
        body_json(&calls[0]),
        serde_json::json!({"move_type": "hold", "clear_hold": true, "skip_store": true})
    );
}

#[tokio::test]
async fn plain_move_sends_only_move_type() {
    let (url, log) = serve(vec![(200, status_json("ongoing", 0))]).await;

    backend(&url, None)
        .make_move(17, &MoveRequest::new(MoveType::HardDrop))
        .await
        .unwrap();

    let calls = log.lock().unwrap().clone();
    assert_eq!(body_json(&calls[0]), serde_json::json!({"move_type": "hard_drop"}));
}

#[tokio::test]
async fn pause_and_forfeit_hit_their_endpoints() {
    let (url, log) = serve(vec![
        (200, r#"{"game_id":17,"status":"paused"}"#.to_string()),
        (
            200,
            r#"{"game_id":17,"score":120,"status":"game_over","message":"Game forfeited"}"#
                .to_string(),
        ),
    ])
    .await;
    let backend = backend(&url, None);

    let paused = backend.pause(17, true).await.unwrap();
    assert_eq!(paused.status, GameStatus::Paused);
    let forfeited = backend.forfeit(17).await.unwrap();
    assert_eq!(forfeited.score, Some(120));

    let calls = log.lock().unwrap().clone();
    assert_eq!((calls[0].method.as_str(), calls[0].path.as_str()), ("POST", "/tetris/17/pause"));
    assert_eq!(body_json(&calls[0]), serde_json::json!({"paused": true}));
    assert_eq!((calls[1].method.as_str(), calls[1].path.as_str()), ("DELETE", "/tetris/17"));
}

#[tokio::test]
async fn error_body_detail_becomes_the_message() {
    let (url, _log) = serve(vec![
        (
            401,
            r#"{"detail":"Not authenticated","status_code":401}"#.to_string(),
        ),
        (500, "internal failure".to_string()),
    ])
    .await;
    let backend = backend(&url, Some("stale"));

    let err = backend
        .create_game(&CreateGameRequest::default())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Not authenticated");

    let err = backend.game_status(17).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}"), None)
        .game_status(1)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
}

#[tokio::test]
async fn controller_runs_a_game_over_http() {
    let (url, log) = serve(vec![
        (200, r#"{"game_id":5,"width":10,"height":20,"level":1}"#.to_string()),
        (200, status_json("ongoing", 0)),
        (200, status_json("ongoing", 10)),
    ])
    .await;
    let controller = GameController::new(backend(&url, None));

    let session = tokio::time::timeout(
        Duration::from_secs(5),
        controller.create_game(CreateGameRequest::default()),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(session.id, 5);
    assert!(controller.is_active());

    let outcome = controller.dispatch(MoveType::Down).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Patched);
    assert_eq!(controller.snapshot().unwrap().score, 10);

    let paths: Vec<String> = log.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec!["/tetris", "/tetris/5", "/tetris/5/moves"]);
}
