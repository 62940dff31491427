//! Game Catalog Service client.
//!
//! Async HTTP client using `reqwest`. Loads are anonymous; updates carry the
//! caller's bearer credential on the individual request.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DEFAULT_REJECTION_MESSAGE, LoadError, SubmitError};
use crate::types::{Credentials, GameId, GameUpdate, RawGameRecord};

/// Abstract access to the catalog.
///
/// The editor drives this trait; [`HttpCatalog`] is the production
/// implementation and tests supply in-memory mocks.
pub trait CatalogService: Send + Sync {
    /// Fetches the current record for `id`.
    fn fetch_game<'a>(
        &'a self,
        id: &'a GameId,
    ) -> Pin<Box<dyn Future<Output = Result<RawGameRecord, LoadError>> + Send + 'a>>;

    /// Replaces the listing fields of `id` with `update`.
    fn update_game<'a>(
        &'a self,
        id: &'a GameId,
        update: &'a GameUpdate,
        credentials: &'a Credentials,
    ) -> Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>>;
}

/// The `msg` string of a catalog failure body (`{ "msg": "..." }`).
fn message_field(body: &Value) -> Option<String> {
    body.get("msg")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_field)
}

/// HTTP client for the catalog's `/games` resource.
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Creates a client rooted at `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn game_url(&self, id: &GameId) -> String {
        format!("{}/games/{}", self.base_url, id.path_segment())
    }

    /// Performs `GET /games/{id}`.
    pub async fn get_game(&self, id: &GameId) -> Result<RawGameRecord, LoadError> {
        let url = self.game_url(id);
        debug!(game_id = %id, %url, "fetching game record");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            warn!(game_id = %id, status = status.as_u16(), "catalog refused record fetch");
            return Err(LoadError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Performs `PUT /games/{id}` with a bearer credential.
    pub async fn put_game(
        &self,
        id: &GameId,
        update: &GameUpdate,
        credentials: &Credentials,
    ) -> Result<(), SubmitError> {
        let url = self.game_url(id);
        let auth = credentials.header_value()?;
        debug!(game_id = %id, %url, "submitting game update");

        let resp = self
            .http
            .put(&url)
            .header(AUTHORIZATION, auth)
            .json(update)
            .send()
            .await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(());
        }

        // Only a JSON failure body counts as a rejection by the catalog.
        let body = resp.bytes().await?;
        let body: Value =
            serde_json::from_slice(&body).map_err(|source| SubmitError::MalformedBody {
                status: status.as_u16(),
                source,
            })?;
        let message =
            message_field(&body).unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl CatalogService for HttpCatalog {
    fn fetch_game<'a>(
        &'a self,
        id: &'a GameId,
    ) -> Pin<Box<dyn Future<Output = Result<RawGameRecord, LoadError>> + Send + 'a>> {
        Box::pin(self.get_game(id))
    }

    fn update_game<'a>(
        &'a self,
        id: &'a GameId,
        update: &'a GameUpdate,
        credentials: &'a Credentials,
    ) -> Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>> {
        Box::pin(self.put_game(id, update, credentials))
    }
}
