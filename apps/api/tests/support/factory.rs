use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use ledger_api::repos::accounts as accounts_repo;
use ledger_api::services::accounts::{create_account_with_id, NewAccount};
use ledger_api::state::app_state::AppState;
use serde_json::{json, Value};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Register through `POST /v1/account/create`, returning the new id.
pub async fn create_account_via_api<S>(app: &S, username: &str) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/v1/account/create")
        .set_json(json!({
            "firstName": "Test",
            "lastName": "User",
            "username": username,
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    Uuid::parse_str(body["id"].as_str().expect("id in create response")).expect("uuid id")
}

/// Sign in through `POST /v1/account/signin`, returning the token.
pub async fn sign_in_via_api<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/v1/account/signin")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .expect("token in sign-in response")
        .to_string()
}

/// Insert an account with a known id directly through the service layer.
pub async fn seed_account(state: &AppState, id: Uuid, username: &str) {
    let db = state.db().expect("test state has a database");
    create_account_with_id(
        db,
        &state.hasher,
        NewAccount {
            first_name: "Seeded".into(),
            last_name: "Account".into(),
            username: username.into(),
            password: TEST_PASSWORD.into(),
        },
        id,
    )
    .await
    .expect("seed account");
}

pub async fn fund(state: &AppState, id: Uuid, balance: i64) {
    let db = state.db().expect("test state has a database");
    accounts_repo::set_balance(db, id, balance)
        .await
        .expect("set balance");
}
