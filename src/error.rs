use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::FieldErrors;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Try again later.";

// Failures talking to the inference backend
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("empty response from model")]
    Empty,
}

/// Everything the summarize route can answer with besides a summary.
/// Each variant renders as a `{"status": "error", ...}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request")]
    Validation(FieldErrors),

    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Inference backend error: {0}")]
    Inference(#[from] InferenceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error", "errors": errors })),
            )
                .into_response(),
            ApiError::RateLimited { retry_after } => {
                let mut res = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "status": "error", "message": RATE_LIMIT_MESSAGE })),
                )
                    .into_response();
                if let Some(wait) = retry_after {
                    // whole seconds, rounded up
                    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                    res.headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from(secs.max(1)));
                }
                res
            }
            err @ ApiError::Inference(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": err.to_string() })),
            )
                .into_response(),
        }
    }
}

// Invalid startup settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rate limit window must be at least one second")]
    ZeroWindow,

    #[error("inference timeout must be at least one second")]
    ZeroTimeout,

    #[error("invalid backend url {url:?}: {reason}")]
    BackendUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field_error;

    #[test]
    fn validation_maps_to_400() {
        let res = ApiError::Validation(field_error("text", "Text cannot be empty.")).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limited_sets_retry_after_rounded_up() {
        let res = ApiError::RateLimited {
            retry_after: Some(Duration::from_millis(2500)),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()[RETRY_AFTER], "3");
    }

    #[test]
    fn rate_limited_without_hint_has_no_header() {
        let res = ApiError::RateLimited { retry_after: None }.into_response();
        assert!(res.headers().get(RETRY_AFTER).is_none());
    }

    #[test]
    fn inference_message_names_the_cause() {
        let err = ApiError::from(InferenceError::Empty);
        assert_eq!(err.to_string(), "Inference backend error: empty response from model");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
