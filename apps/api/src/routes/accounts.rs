use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AccountId, AuthenticatedAccount, ValidatedJson};
use crate::middleware::AccountOwnership;
use crate::repos::accounts::Account;
use crate::services::accounts::{self as accounts_service, NewAccount};
use crate::state::app_state::AppState;

/// Public view of an account; never includes the username or password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: Uuid,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    pub balance: i64,
}

async fn create_account(
    body: ValidatedJson<CreateAccountRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();

    let id = accounts_service::create_account(
        db,
        &app_state.hasher,
        NewAccount {
            first_name: body.first_name,
            last_name: body.last_name,
            username: body.username,
            password: body.password,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(CreateAccountResponse { id }))
}

async fn list_accounts(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let accounts: Vec<AccountResponse> = accounts_service::list_accounts(db)
        .await?
        .into_iter()
        .map(AccountResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(accounts))
}

async fn get_account(
    account_id: AccountId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let account = accounts_service::get_account(db, account_id.0).await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

async fn update_account(
    account_id: AccountId,
    body: ValidatedJson<UpdateAccountRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    accounts_service::update_account(db, account_id.0, &body.first_name, &body.last_name).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn delete_account(
    account_id: AccountId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    accounts_service::delete_account(db, account_id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn transfer(
    caller: AuthenticatedAccount,
    body: ValidatedJson<TransferRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let outcome =
        accounts_service::transfer(db, caller.account_id(), body.to_account, body.amount).await?;

    Ok(HttpResponse::Created().json(TransferResponse {
        from_account: outcome.from_account,
        to_account: outcome.to_account,
        amount: outcome.amount,
        balance: outcome.balance,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/account/create").route(web::post().to(create_account)))
        .service(web::resource("/accounts").route(web::get().to(list_accounts)))
        .service(
            web::resource("/account/{account_id}")
                .wrap(AccountOwnership)
                .route(web::get().to(get_account))
                .route(web::put().to(update_account))
                .route(web::delete().to(delete_account)),
        )
        .service(
            web::resource("/account/{account_id}/transfer")
                .wrap(AccountOwnership)
                .route(web::post().to(transfer)),
        );
}
