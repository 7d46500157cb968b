mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use api_test_support::unique_username;
use ledger_api::middleware::account_ownership::TOKEN_HEADER;
use serde_json::{json, Value};
use support::app_builder::create_test_app;
use support::factory::{create_account_via_api, sign_in_via_api, TEST_PASSWORD};
use support::test_state::build_test_state;

use crate::common::assert_error;

#[actix_web::test]
async fn create_returns_201_with_id() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/v1/account/create")
        .set_json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": unique_username("ada"),
            "password": "analytical-engine",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
}

#[actix_web::test]
async fn duplicate_username_is_conflict() {
    let app = create_test_app(build_test_state().await).await;
    let username = unique_username("dup");
    create_account_via_api(&app, &username).await;

    let req = test::TestRequest::post()
        .uri("/v1/account/create")
        .set_json(json!({
            "firstName": "Other",
            "lastName": "Person",
            "username": username,
            "password": "another-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error(resp, StatusCode::CONFLICT, "USERNAME_TAKEN").await;
}

#[actix_web::test]
async fn create_rejects_invalid_fields() {
    let app = create_test_app(build_test_state().await).await;

    let cases = [
        json!({ "firstName": "", "lastName": "L", "username": unique_username("a"), "password": "long-enough" }),
        json!({ "firstName": "F", "lastName": "L", "username": "  ", "password": "long-enough" }),
        json!({ "firstName": "F", "lastName": "L", "username": unique_username("b"), "password": "short" }),
        json!({ "firstName": "x".repeat(51), "lastName": "L", "username": unique_username("c"), "password": "long-enough" }),
    ];

    for case in cases {
        let req = test::TestRequest::post()
            .uri("/v1/account/create")
            .set_json(case)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

#[actix_web::test]
async fn create_with_missing_field_is_bad_request() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/v1/account/create")
        .set_json(json!({ "firstName": "F", "lastName": "L" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
}

#[actix_web::test]
async fn list_is_public_and_hides_credentials() {
    let app = create_test_app(build_test_state().await).await;
    let first = create_account_via_api(&app, &unique_username("one")).await;
    let second = create_account_via_api(&app, &unique_username("two")).await;

    let req = test::TestRequest::get().uri("/v1/accounts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let accounts = body.as_array().expect("list is a JSON array");
    assert_eq!(accounts.len(), 2);

    let ids: Vec<&str> = accounts.iter().filter_map(|a| a["id"].as_str()).collect();
    assert!(ids.contains(&first.to_string().as_str()));
    assert!(ids.contains(&second.to_string().as_str()));
    for account in accounts {
        assert!(account.get("passwordHash").is_none());
        assert!(account.get("username").is_none());
        assert_eq!(account["balance"], 0);
    }
}

#[actix_web::test]
async fn owner_can_read_update_and_delete() {
    let app = create_test_app(build_test_state().await).await;
    let username = unique_username("owner");
    let id = create_account_via_api(&app, &username).await;
    let token = sign_in_via_api(&app, &username, TEST_PASSWORD).await;
    let uri = format!("/v1/account/{id}");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["firstName"], "Test");
    assert!(body["number"].as_i64().unwrap() > 0);
    assert!(body["createdAt"].is_string());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, token.as_str()))
        .set_json(json!({ "firstName": "Renamed", "lastName": "Person" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["firstName"], "Renamed");
    assert_eq!(body["lastName"], "Person");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Token outlives the account
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error(resp, StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND").await;
}

#[actix_web::test]
async fn update_with_blank_name_is_rejected() {
    let app = create_test_app(build_test_state().await).await;
    let username = unique_username("blank");
    let id = create_account_via_api(&app, &username).await;
    let token = sign_in_via_api(&app, &username, TEST_PASSWORD).await;

    let req = test::TestRequest::put()
        .uri(&format!("/v1/account/{id}"))
        .insert_header((TOKEN_HEADER, token))
        .set_json(json!({ "firstName": "   ", "lastName": "Person" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[actix_web::test]
async fn gated_methods_require_token() {
    let app = create_test_app(build_test_state().await).await;
    let id = create_account_via_api(&app, &unique_username("nohdr")).await;
    let uri = format!("/v1/account/{id}");

    let requests = [
        test::TestRequest::get().uri(&uri).to_request(),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "firstName": "A", "lastName": "B" }))
            .to_request(),
        test::TestRequest::delete().uri(&uri).to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_error(resp, StatusCode::UNAUTHORIZED, "MISSING_TOKEN").await;
    }
}
