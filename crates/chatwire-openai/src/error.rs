use chatwire_core::error::RelayError;
use reqwest::StatusCode;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn't serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("upstream returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("upstream format error: {0}")]
    Format(String),
}

impl From<OpenAiError> for RelayError {
    fn from(value: OpenAiError) -> Self {
        match value {
            OpenAiError::Http(err) => RelayError::transport(err),
            OpenAiError::Serde(err) => RelayError::UpstreamFormat(err.to_string()),
            OpenAiError::Api { status, body } => RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            },
            OpenAiError::Format(detail) => RelayError::UpstreamFormat(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_upstream_status() {
        let err = OpenAiError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited".into(),
        };
        match RelayError::from(err) {
            RelayError::UpstreamStatus { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn format_error_maps_to_upstream_format() {
        let err = OpenAiError::Format("response has no choices".into());
        assert!(matches!(RelayError::from(err), RelayError::UpstreamFormat(_)));
    }
}
