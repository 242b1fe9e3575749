//! Router assembly.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{chat, context, prefs};
use crate::state::AppState;

/// Build the relay's router. Method discipline comes from the routing
/// table itself: anything but `POST` on the chat route is answered with
/// `405` before a handler runs.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat::relay))
        .route("/api/preferences", post(prefs::update))
        .route(
            "/api/context/{key}",
            get(context::get_value).put(context::put_value),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chatwire_core::store::MemoryStore;
    use chatwire_openai::OpenAiClient;
    use tower::ServiceExt;

    #[tokio::test]
    async fn non_post_on_the_chat_route_is_rejected() {
        let state = AppState::with_backend(
            ServerConfig::for_tests(Some("sk-test")),
            Arc::new(OpenAiClient::new("sk-test")),
            Arc::new(MemoryStore::new()),
        );
        let app = router(Arc::new(state));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
