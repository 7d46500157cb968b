#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use api_test_support::error_body::ErrorBodyLike;

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    api_test_support::logging::init();
}

/// Assert the JSON error contract and return the parsed body.
pub async fn assert_error(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorBodyLike {
    api_test_support::assert_error_body(resp, expected_code, expected_status).await
}
