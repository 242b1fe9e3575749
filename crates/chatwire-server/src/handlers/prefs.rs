//! The preference-setting endpoint: `POST /api/preferences`.
//!
//! Writes the cookies the preference extractor reads on every chat
//! request. The two sides share one contract: names from
//! `chatwire-prompt`, values percent-encoded, `Path=/`, `HttpOnly`,
//! `SameSite=Lax`. Sending an empty string clears the cookie.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use serde::Deserialize;

use chatwire_core::error::RelayError;
use chatwire_prompt::preferences::{INJECTED_NOTE_COOKIE, TRANSLATE_LANG_COOKIE};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    #[serde(default)]
    translate_lang: Option<String>,
    #[serde(default)]
    injected_note: Option<String>,
}

pub async fn update(body: Bytes) -> Result<(StatusCode, HeaderMap), ApiError> {
    let update: PreferenceUpdate = serde_json::from_slice(&body)
        .map_err(|err| RelayError::Validation(format!("malformed request body: {err}")))?;

    if update.translate_lang.is_none() && update.injected_note.is_none() {
        return Err(RelayError::Validation(
            "request must carry `translateLang` or `injectedNote`".into(),
        )
        .into());
    }

    let mut headers = HeaderMap::new();
    if let Some(lang) = &update.translate_lang {
        append_cookie(&mut headers, TRANSLATE_LANG_COOKIE, lang)?;
    }
    if let Some(note) = &update.injected_note {
        append_cookie(&mut headers, INJECTED_NOTE_COOKIE, note)?;
    }

    Ok((StatusCode::NO_CONTENT, headers))
}

fn append_cookie(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ApiError> {
    let cookie = if value.is_empty() {
        format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    } else {
        format!(
            "{name}={}; Path=/; HttpOnly; SameSite=Lax",
            urlencoding::encode(value)
        )
    };
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| RelayError::Validation("preference value is not header-safe".into()))?;
    headers.append(header::SET_COOKIE, cookie);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use crate::config::ServerConfig;
    use crate::state::AppState;

    use axum::body::Body;
    use axum::http::Request;
    use chatwire_core::store::MemoryStore;
    use chatwire_openai::OpenAiClient;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> axum::Router {
        let state = AppState::with_backend(
            ServerConfig::for_tests(Some("sk-test")),
            Arc::new(OpenAiClient::new("sk-test")),
            Arc::new(MemoryStore::new()),
        );
        router(Arc::new(state))
    }

    fn prefs_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/preferences")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn sets_a_percent_encoded_cookie_with_the_contract_attributes() {
        let response = test_router()
            .oneshot(prefs_request(r#"{"translateLang":"Français"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("translateLang=Fran%C3%A7ais"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn empty_value_clears_the_cookie() {
        let response = test_router()
            .oneshot(prefs_request(r#"{"injectedNote":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("injectedNote=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn round_trips_through_the_extractor() {
        use chatwire_prompt::PreferenceBundle;

        let response = test_router()
            .oneshot(prefs_request(r#"{"translateLang":"Français"}"#))
            .await
            .unwrap();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let pair = cookie.split(';').next().unwrap();

        let bundle = PreferenceBundle::from_cookie_header(Some(pair));
        assert_eq!(bundle.translate_language.as_deref(), Some("Français"));
    }

    #[tokio::test]
    async fn empty_update_is_a_400() {
        let response = test_router().oneshot(prefs_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
