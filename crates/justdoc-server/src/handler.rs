use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use justdoc_store::{ChannelInfo, DocumentStore, StoreResult};

use crate::error::{ServerError, ServerResult};
use crate::names::{validate_channel, validate_pair};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub max_body_size: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, max_body_size: usize) -> Self {
        Self {
            store,
            max_body_size,
        }
    }

    /// Run a store operation on the blocking pool.
    async fn run<T, F>(&self, op: F) -> ServerResult<StoreResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || op(store.as_ref())).await?)
    }
}

/// Outcome of a document write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
}

/// Body of a successful `POST /{channel}/{document}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub status: WriteStatus,
    pub channel: String,
    pub document: String,
}

/// `GET /`
pub async fn list_channels(State(state): State<AppState>) -> ServerResult<Json<Vec<ChannelInfo>>> {
    let channels = state.run(|store| store.list_channels()).await??;
    Ok(Json(channels))
}

/// `GET /{channel}/`
pub async fn list_documents(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> ServerResult<Json<Vec<String>>> {
    validate_channel(&channel)?;
    let names = state
        .run(move |store| store.list_documents(&channel))
        .await?
        .map_err(|e| ServerError::from_store(e, "Channel not found"))?;
    Ok(Json(names))
}

/// `GET /{channel}/{document}`: the stored bytes, unmodified.
pub async fn get_document(
    State(state): State<AppState>,
    Path((channel, document)): Path<(String, String)>,
) -> ServerResult<Response> {
    validate_pair(&channel, &document)?;
    let data = state
        .run(move |store| store.get_document(&channel, &document))
        .await?
        .map_err(|e| ServerError::from_store(e, "Document not found"))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], data).into_response())
}

/// `POST /{channel}/{document}`
pub async fn put_document(
    State(state): State<AppState>,
    Path((channel, document)): Path<(String, String)>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<(StatusCode, Json<WriteResponse>)> {
    validate_pair(&channel, &document)?;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge {
                limit: state.max_body_size,
            }
        } else {
            ServerError::BadRequest("Failed to read request body".into())
        }
    })?;
    if !is_valid_json(&body) {
        return Err(ServerError::InvalidJson);
    }

    let (ch, doc) = (channel.clone(), document.clone());
    let created = state
        .run(move |store| store.put_document(&ch, &doc, &body))
        .await??;

    let (status, code) = if created {
        (WriteStatus::Created, StatusCode::CREATED)
    } else {
        (WriteStatus::Updated, StatusCode::OK)
    };
    tracing::debug!(%channel, %document, ?status, "document stored");
    Ok((
        code,
        Json(WriteResponse {
            status,
            channel,
            document,
        }),
    ))
}

fn is_valid_json(data: &[u8]) -> bool {
    serde_json::from_slice::<serde::de::IgnoredAny>(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_validity() {
        assert!(is_valid_json(br#"{"theme":"dark"}"#));
        assert!(is_valid_json(b"[1, 2, 3]"));
        assert!(is_valid_json(b"  \"str\"  "));
        assert!(is_valid_json(b"null"));
        assert!(!is_valid_json(b""));
        assert!(!is_valid_json(b"{"));
        assert!(!is_valid_json(b"{} trailing"));
    }

    #[test]
    fn write_response_shape() {
        let body = WriteResponse {
            status: WriteStatus::Created,
            channel: "myapp".into(),
            document: "settings".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "created", "channel": "myapp", "document": "settings"})
        );
    }
}
