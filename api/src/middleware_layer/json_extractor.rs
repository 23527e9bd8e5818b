use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::error_body::{ApiErrorDetail, ErrorBody};

const REQUEST_ID: &str = "X-Request-Id";

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

/// Extracts the failing field path from a serde rejection message, e.g.
/// `conversation_history[0].role` or the name in ``missing field `message` ``.
fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    let rest = msg
        .split_once("target type: ")
        .map_or(msg, |(_, rest)| rest);

    if let Some(idx) = rest.find("missing field `") {
        let after = &rest[idx + "missing field `".len()..];
        return after.find('`').map(|end| after[..end].to_string());
    }

    rest.split_once(": ")
        .map(|(path, _)| path)
        .filter(|path| !path.is_empty() && !path.contains(' '))
        .map(str::to_string)
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("unknown variant") {
        Some("Allowed roles are \"system\", \"user\" and \"assistant\".".into())
    } else if msg.contains("missing field") {
        Some("This field is required.".into())
    } else if msg.contains("expected a sequence") {
        Some("Expected an array here (e.g. [{\"role\": \"user\", \"content\": \"...\"}]).".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else if msg.contains("expected a string") || msg.contains("expected a borrowed string") {
        Some("Expected a string here.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get(REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert(REQUEST_ID, value);
    }
    id
}

/// Re-shapes axum's plain-text body rejections (400, 415, 422) into
/// [`ErrorBody`] JSON and tags them with an `X-Request-Id` header.
///
/// Responses that are already JSON pass through untouched.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    let code = match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => return res,
    };

    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    let original = String::from_utf8_lossy(&bytes);
    let request_id = ensure_request_id(&mut parts);
    tracing::debug!(%request_id, %status, rejection = %original.trim(), "request body rejected");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_for(&original),
    };
    let details = if detail.path.is_some() || detail.hint.is_some() {
        vec![detail]
    } else {
        Vec::new()
    };

    let envelope = ErrorBody::new(code, original.trim()).with_details(details);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_path() {
        let msg = "Failed to deserialize the JSON body into the target type: conversation_history[0].role: unknown variant `tool`, expected one of `system`, `user`, `assistant` at line 1 column 60";
        assert_eq!(
            guess_path_from_serde_msg(msg).as_deref(),
            Some("conversation_history[0].role")
        );
        assert!(hint_for(msg).unwrap().contains("assistant"));
    }

    #[test]
    fn finds_missing_field() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `message` at line 1 column 2";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("message"));
        assert_eq!(hint_for(msg).as_deref(), Some("This field is required."));
    }

    #[test]
    fn syntax_errors_have_no_path() {
        let msg = "Failed to parse the request body as JSON: expected value at line 1 column 1";
        assert_eq!(guess_path_from_serde_msg(msg), None);
    }
}
