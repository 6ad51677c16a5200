//! Note store backed by a Qdrant collection over its REST API.
//!
//! Every note is a point with a one-dimensional dummy vector and the comment
//! in its payload under `text`.

use crate::effects::{NoteStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Dimension of the placeholder vector attached to each note.
pub const VECTOR_SIZE: usize = 1;

/// Connection settings for [`QdrantNoteStore`].
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Base URL of the Qdrant HTTP API, e.g. `https://xyz.cloud.qdrant.io:6333`.
    pub url: String,
    /// Sent as the `api-key` header when present.
    pub api_key: Option<String>,
    pub collection: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retries after a transport error.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            collection: "user_feedback".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: u64,
}

#[derive(Debug, Serialize)]
struct Point<'a> {
    id: u64,
    vector: [f32; VECTOR_SIZE],
    payload: NotePayload<'a>,
}

#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    text: &'a str,
}

/// Blocking Qdrant client implementing [`NoteStore`].
#[derive(Debug, Clone)]
pub struct QdrantNoteStore {
    client: reqwest::blocking::Client,
    config: QdrantConfig,
}

impl QdrantNoteStore {
    /// Connect and make sure the collection exists, creating it if needed.
    pub fn connect(config: QdrantConfig) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cluster-feedback/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let store = Self { client, config };
        store.ensure_collection()?;
        Ok(store)
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    fn ensure_collection(&self) -> Result<(), StoreError> {
        let list: CollectionList = self.send(reqwest::Method::GET, "/collections", None)?;
        if list
            .collections
            .iter()
            .any(|c| c.name == self.config.collection)
        {
            debug!(collection = %self.config.collection, "collection present");
            return Ok(());
        }

        let path = format!("/collections/{}", self.config.collection);
        let body = json!({
            "vectors": { "size": VECTOR_SIZE, "distance": "Cosine" }
        });
        let _: serde_json::Value = self.send(reqwest::Method::PUT, &path, Some(&body))?;
        info!(collection = %self.config.collection, "created note collection");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Send one request, retrying transport errors with exponential backoff.
    /// HTTP error statuses are not retried.
    fn send<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, StoreError> {
        let url = self.url(path);
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 0;

        let response = loop {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(key) = &self.config.api_key {
                request = request.header("api-key", key);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, %url, attempt, "qdrant request");
            match request.send() {
                Ok(response) => break response,
                Err(e) if attempt < self.config.max_retries => {
                    warn!(%url, attempt, error = %e, "qdrant request failed, retrying");
                    thread::sleep(backoff);
                    backoff = next_backoff(backoff, self.config.max_backoff);
                    attempt += 1;
                }
                Err(e) => return Err(StoreError::Transport(e.to_string())),
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(envelope.result)
    }
}

/// Double `current`, never exceeding `max`.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}

impl NoteStore for QdrantNoteStore {
    fn count(&self) -> Result<u64, StoreError> {
        let path = format!("/collections/{}/points/count", self.config.collection);
        let result: CountResult =
            self.send(reqwest::Method::POST, &path, Some(&json!({ "exact": true })))?;
        Ok(result.count)
    }

    fn append(&self, id: u64, text: &str) -> Result<(), StoreError> {
        let path = format!("/collections/{}/points?wait=true", self.config.collection);
        let point = Point {
            id,
            vector: [0.0; VECTOR_SIZE],
            payload: NotePayload { text },
        };
        let body = json!({ "points": [point] });
        let _: serde_json::Value = self.send(reqwest::Method::PUT, &path, Some(&body))?;
        Ok(())
    }
}
