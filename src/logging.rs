//! Middleware for logging requests and responses.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// Request and response bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that is read for logging and passed on to the handlers.
///
/// Matches the default body limit of axum's extractors.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// The `password` field of JSON request bodies is never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({
                    "error": format!(
                        "the request body could not be read or is larger than {MAX_REQUEST_BODY_BYTES} bytes"
                    )
                })),
            )
                .into_response();
        }
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    if is_json(parts.headers.get(CONTENT_TYPE)) {
        log_request(&parts, &redact_password(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_json(content_type: Option<&axum::http::HeaderValue>) -> bool {
    content_type
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Replace the value of a top-level `password` field in a JSON object.
///
/// Bodies that are not JSON objects are returned unchanged.
fn redact_password(body_text: &str) -> String {
    let mut json = match serde_json::from_str::<Value>(body_text) {
        Ok(Value::Object(object)) => object,
        _ => return body_text.to_string(),
    };

    match json.get_mut("password") {
        Some(password) => {
            *password = Value::String(REDACTED.to_string());
            Value::Object(json).to_string()
        }
        None => body_text.to_string(),
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a char boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::http::HeaderValue;
    use serde_json::{Value, json};

    use super::{is_json, redact_password, truncate};

    #[test]
    fn redacts_password_field() {
        let body = json!({"email": "a@x.com", "password": "hunter2"}).to_string();

        let redacted: Value = serde_json::from_str(&redact_password(&body)).unwrap();

        assert_eq!(redacted, json!({"email": "a@x.com", "password": "********"}));
    }

    #[test]
    fn leaves_body_without_password_unchanged() {
        let body = r#"{"description":"Salário","amount":"10.00"}"#;

        assert_eq!(redact_password(body), body);
    }

    #[test]
    fn leaves_invalid_json_unchanged() {
        let body = "password=hunter2";

        assert_eq!(redact_password(body), body);
    }

    #[test]
    fn detects_json_content_type() {
        assert!(is_json(Some(&HeaderValue::from_static("application/json"))));
        assert!(is_json(Some(&HeaderValue::from_static(
            "application/json; charset=utf-8"
        ))));
        assert!(!is_json(Some(&HeaderValue::from_static("text/plain"))));
        assert!(!is_json(None));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // 'ç' takes two bytes, so a limit of 3 would split it.
        assert_eq!(truncate("laçamento", 3), "la");
        assert_eq!(truncate("laçamento", 4), "laç");
        assert_eq!(truncate("short", 64), "short");
    }
}
