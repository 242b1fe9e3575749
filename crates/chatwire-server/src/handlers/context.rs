//! Small string store for auxiliary actions: `GET`/`PUT /api/context/{key}`.
//!
//! Values go through the injected [`ContextStore`] capability on
//! [`AppState`], never a process-global map, so a deployment can swap the
//! in-memory table for an external cache without touching the handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use chatwire_core::error::RelayError;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContextEntry {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ContextUpdate {
    value: String,
}

pub async fn get_value(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ContextEntry>, ApiError> {
    match state.store.get(&key) {
        Some(value) => Ok(Json(ContextEntry { key, value })),
        None => Err(ApiError::NotFound(format!("no context value under `{key}`"))),
    }
}

pub async fn put_value(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let update: ContextUpdate = serde_json::from_slice(&body)
        .map_err(|err| RelayError::Validation(format!("malformed request body: {err}")))?;
    state.store.set(&key, update.value);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use crate::config::ServerConfig;

    use axum::body::Body;
    use axum::http::{Request, header};
    use chatwire_core::store::MemoryStore;
    use chatwire_openai::OpenAiClient;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> axum::Router {
        let state = AppState::with_backend(
            ServerConfig::for_tests(Some("sk-test")),
            Arc::new(OpenAiClient::new("sk-test")),
            Arc::new(MemoryStore::new()),
        );
        router(Arc::new(state))
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let app = test_router();

        let put = Request::builder()
            .method("PUT")
            .uri("/api/context/favorite-color")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"value":"teal"}"#))
            .unwrap();
        let response = app.clone().oneshot(put).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let get = Request::builder()
            .uri("/api/context/favorite-color")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["key"], "favorite-color");
        assert_eq!(json["value"], "teal");
    }

    #[tokio::test]
    async fn missing_key_is_a_404() {
        let get = Request::builder()
            .uri("/api/context/unset")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
