//! Assertions on the JSON error contract, independent of the API crate's types.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the API error body
#[derive(Debug, Deserialize)]
pub struct ErrorBodyLike {
    pub error: String,
    pub code: String,
    pub status: u16,
    pub trace_id: String,
}

/// Check status, code, the `x-trace-id` header/body parity and JSON content type.
///
/// Returns the parsed body for further assertions.
pub fn assert_error_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status, "unexpected HTTP status");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "expected JSON error body, got content-type {content_type:?}"
    );

    let parsed: ErrorBodyLike =
        serde_json::from_slice(body).expect("response body should be the JSON error body");

    let trace_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        parsed.trace_id, trace_header,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(parsed.code, expected_code);
    assert_eq!(parsed.status, expected_status.as_u16());
    assert!(!parsed.error.is_empty(), "error message should not be empty");

    parsed
}

/// [`assert_error_parts`] for a response from `actix_web::test::call_service`.
pub async fn assert_error_body(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
) -> ErrorBodyLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    assert_error_parts(status, &headers, &body, expected_code, expected_status)
}
