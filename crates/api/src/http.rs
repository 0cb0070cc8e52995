//! reqwest implementation of [`Backend`].

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::types::{
    CreateGameRequest, CreateGameResponse, ErrorBody, ForfeitResponse, MoveRequest, MoveResponse,
    PauseRequest, PauseResponse, StatusResponse,
};
use crate::{ApiConfig, ApiError, Backend};

/// JSON-over-HTTP client for the game server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// A copy of this backend that sends no credentials.
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            trace!(status = status.as_u16(), len = body.len(), "backend response");
            return Ok(serde_json::from_slice(&body)?);
        }

        let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
        let detail = parsed.detail.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        debug!(status = status.as_u16(), %detail, "backend rejected request");
        Err(ApiError::Status {
            status: parsed.status_code.unwrap_or(status.as_u16()),
            detail,
        })
    }
}

impl Backend for HttpBackend {
    async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<CreateGameResponse, ApiError> {
        self.send(self.request(Method::POST, "/tetris").json(request))
            .await
    }

    async fn game_status(&self, game_id: u64) -> Result<StatusResponse, ApiError> {
        self.send(self.request(Method::GET, &format!("/tetris/{game_id}")))
            .await
    }

    async fn make_move(
        &self,
        game_id: u64,
        request: &MoveRequest,
    ) -> Result<MoveResponse, ApiError> {
        debug!(
            game_id,
            move_type = %request.move_type,
            clear_hold = request.clear_hold,
            "sending move"
        );
        self.send(
            self.request(Method::POST, &format!("/tetris/{game_id}/moves"))
                .json(request),
        )
        .await
    }

    async fn pause(&self, game_id: u64, paused: bool) -> Result<PauseResponse, ApiError> {
        self.send(
            self.request(Method::POST, &format!("/tetris/{game_id}/pause"))
                .json(&PauseRequest { paused }),
        )
        .await
    }

    async fn forfeit(&self, game_id: u64) -> Result<ForfeitResponse, ApiError> {
        self.send(self.request(Method::DELETE, &format!("/tetris/{game_id}")))
            .await
    }
}
