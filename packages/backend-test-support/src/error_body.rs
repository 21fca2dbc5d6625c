//! Assertions for the failure contract:
//! `{ success: false, code, message, trace_id }` with a matching `x-trace-id`
//! header and an `application/json` content type.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use serde::Deserialize;

/// Mirror of the backend's error body, kept independent of backend types.
#[derive(Debug, Deserialize)]
pub struct ErrorBodyLike {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: String,
}

/// Assert status, code and trace-id consistency; returns the parsed body.
pub async fn assert_error_body<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorBodyLike
where
    B: MessageBody,
{
    assert_eq!(resp.status(), expected_status, "unexpected status");

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(
        content_type.starts_with("application/json"),
        "content type was {content_type:?}"
    );

    let header_trace = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-trace-id header missing");

    let bytes = actix_web::test::read_body(resp).await;
    let body: ErrorBodyLike = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("error body did not parse ({e}): {bytes:?}"));

    assert!(!body.success, "success must be false");
    assert_eq!(body.code, expected_code, "unexpected code: {}", body.message);
    assert_eq!(body.trace_id, header_trace, "body and header trace ids differ");
    assert!(!body.message.is_empty(), "message must not be empty");

    body
}
