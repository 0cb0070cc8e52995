//! Opening the first game.
//!
//! A failure here never ends the client: the message stays in the error
//! slot and the shell offers a new game instead.

use tracing::warn;

use crate::api::Backend;
use crate::config::ClientConfig;
use crate::core::{GameController, SessionError};

/// Create a game, or attach to `config.resume` when set.
pub async fn start_game<B: Backend>(
    controller: &GameController<B>,
    config: &ClientConfig,
) -> Result<(), SessionError> {
    match config.resume {
        Some(id) => controller.get_status(Some(id)).await.map(|_| ()),
        None => controller
            .create_game(config.create_request())
            .await
            .map(|_| ()),
    }
}

/// Build a controller over `backend` and open the first game.
///
/// When the server wants credentials it did not accept, `anonymous` is asked
/// for a backend without them; if it provides one, the game is opened again
/// on that backend and marked unscored.
pub async fn open_game<B, F>(
    backend: B,
    config: &ClientConfig,
    anonymous: F,
) -> GameController<B>
where
    B: Backend,
    F: FnOnce(&B) -> Option<B>,
{
    let controller = GameController::new(backend);
    let err = match start_game(&controller, config).await {
        Ok(()) => return controller,
        Err(e) => e,
    };

    if err.is_auth_required() {
        if let Some(fallback) = anonymous(controller.backend()) {
            warn!("credentials rejected; playing anonymously, scores will not be saved");
            let controller = GameController::new(fallback);
            controller.set_unscored(true);
            if let Err(e) = start_game(&controller, config).await {
                warn!(error = %e, "could not open a game");
            }
            return controller;
        }
    }

    warn!(error = %err, "could not open a game");
    controller
}
