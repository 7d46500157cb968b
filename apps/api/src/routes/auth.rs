use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::accounts as accounts_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
}

/// Exchange username and password for an access token.
async fn sign_in(
    body: ValidatedJson<SignInRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let SignInRequest { username, password } = body.into_inner();

    let token = accounts_service::sign_in(
        db,
        &app_state.hasher,
        &app_state.security,
        &username,
        &password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(SignInResponse { token }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/account/signin").route(web::post().to(sign_in)));
}
