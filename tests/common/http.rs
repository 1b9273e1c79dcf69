use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

/// Drives one request through the router without binding a socket.
pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, String)],
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }

    let req = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    app.clone().oneshot(req).await.expect("router response")
}

pub async fn response_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let (parts, body) = resp.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("read body bytes");

    // 204 and friends come back with an empty body; keep those addressable.
    let json = match serde_json::from_slice::<Value>(&bytes) {
        Ok(v) => v,
        Err(_) if bytes.is_empty() => serde_json::json!({}),
        Err(e) => panic!("body is not json: {e}"),
    };

    (parts.status, parts.headers, json)
}

/// Every success payload in this API is wrapped as `{"success": true, "data": ...}`.
/// Asserts the wrapper and hands back the inner payload.
pub fn json_data(body: &Value) -> &Value {
    assert_eq!(body["success"], true, "expected success envelope: {body}");
    body.get("data")
        .unwrap_or_else(|| panic!("success envelope without data: {body}"))
}

/// Error payloads carry `{"success": false, "code": ..., "message": ...}`.
pub fn assert_json_error(body: &Value, code: &str) {
    assert_eq!(body["success"], false, "expected error envelope: {body}");
    assert_eq!(body["code"], code, "unexpected error code: {body}");
    assert!(
        body["message"].is_string(),
        "error envelope without message: {body}"
    );
}

pub fn assert_status_ok_json(status: StatusCode, body: &Value) {
    assert!(status.is_success(), "unexpected status {status}: {body}");
    json_data(body);
}
