//! Account operations: registration, sign-in, CRUD and transfers.

use std::time::SystemTime;

use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::accounts_sea::AccountCreate;
use crate::auth::jwt::mint_access_token;
use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::logging::pii::mask_username;
use crate::logging::security;
use crate::repos::accounts::{self as accounts_repo, Account};
use crate::state::security_config::SecurityConfig;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_USERNAME_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Account numbers are drawn from `[1, ACCOUNT_NUMBER_UPPER)`.
pub const ACCOUNT_NUMBER_UPPER: i64 = 1_000_000_000;

/// Input for [`create_account`]
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Result of a successful transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    /// Source balance after the debit
    pub balance: i64,
}

fn validate_name(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_username(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("username is required"));
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_password(value: &str) -> Result<(), DomainError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn random_account_number() -> i64 {
    rand::rng().random_range(1..ACCOUNT_NUMBER_UPPER)
}

/// Register an account and return its id.
pub async fn create_account<C: ConnectionTrait>(
    conn: &C,
    hasher: &PasswordHasher,
    input: NewAccount,
) -> Result<Uuid, AppError> {
    create_account_with_id(conn, hasher, input, Uuid::new_v4()).await
}

/// [`create_account`] with a caller-chosen id; used for seeding known accounts.
pub async fn create_account_with_id<C: ConnectionTrait>(
    conn: &C,
    hasher: &PasswordHasher,
    input: NewAccount,
    id: Uuid,
) -> Result<Uuid, AppError> {
    let first_name = validate_name("firstName", &input.first_name)?;
    let last_name = validate_name("lastName", &input.last_name)?;
    let username = validate_username(&input.username)?;
    validate_password(&input.password)?;

    // Cheap pre-check; the unique index still catches races.
    if accounts_repo::find_by_username(conn, &username).await?.is_some() {
        return Err(
            DomainError::conflict(ConflictKind::UsernameTaken, "Username already taken").into(),
        );
    }

    let password_hash = hasher.hash_blocking(input.password).await?;
    let dto = AccountCreate::new(
        first_name,
        last_name,
        username,
        password_hash,
        random_account_number(),
    )
    .with_id(id);

    let account = accounts_repo::create(conn, dto).await?;
    info!(account_id = %account.id, username = %mask_username(&account.username), "account created");
    Ok(account.id)
}

/// Check credentials and mint a token.
///
/// Unknown username and wrong password are indistinguishable to the caller.
pub async fn sign_in<C: ConnectionTrait>(
    conn: &C,
    hasher: &PasswordHasher,
    security_config: &SecurityConfig,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let account = accounts_repo::find_by_username(conn, username.trim()).await?;

    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
    let verified = hasher
        .verify_blocking(password.to_string(), stored_hash)
        .await?;

    match account {
        Some(account) if verified => {
            debug!(account_id = %account.id, "sign-in succeeded");
            mint_access_token(account.id, SystemTime::now(), security_config)
        }
        Some(_) => {
            security::login_failed("wrong_password", username);
            Err(AppError::CredentialMismatch)
        }
        None => {
            security::login_failed("unknown_username", username);
            Err(AppError::CredentialMismatch)
        }
    }
}

pub async fn get_account<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Account, AppError> {
    Ok(accounts_repo::require_by_id(conn, id).await?)
}

pub async fn list_accounts<C: ConnectionTrait>(conn: &C) -> Result<Vec<Account>, AppError> {
    Ok(accounts_repo::list(conn).await?)
}

/// Rename an account. Username, password and balance are not touched.
pub async fn update_account<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    first_name: &str,
    last_name: &str,
) -> Result<Account, AppError> {
    let first_name = validate_name("firstName", first_name)?;
    let last_name = validate_name("lastName", last_name)?;
    Ok(accounts_repo::update_names(conn, id, first_name, last_name).await?)
}

pub async fn delete_account<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), AppError> {
    accounts_repo::delete(conn, id).await?;
    info!(account_id = %id, "account deleted");
    Ok(())
}

/// Move `amount` from `from` to `to` in one transaction.
///
/// The debit is conditional on the balance, so concurrent transfers cannot
/// overdraw the source.
pub async fn transfer(
    db: &DatabaseConnection,
    from: Uuid,
    to: Uuid,
    amount: i64,
) -> Result<TransferOutcome, AppError> {
    if amount <= 0 {
        return Err(DomainError::validation("amount must be positive").into());
    }
    if from == to {
        return Err(DomainError::validation("cannot transfer to the same account").into());
    }

    let txn = db.begin().await?;

    accounts_repo::require_by_id(&txn, from).await?;
    accounts_repo::require_by_id(&txn, to).await?;

    if !accounts_repo::debit(&txn, from, amount).await? {
        return Err(
            DomainError::conflict(ConflictKind::InsufficientFunds, "Insufficient funds").into(),
        );
    }
    accounts_repo::credit(&txn, to, amount).await?;

    let source = accounts_repo::require_by_id(&txn, from).await?;
    txn.commit().await?;

    info!(from = %from, to = %to, amount, "transfer completed");
    Ok(TransferOutcome {
        from_account: from,
        to_account: to,
        amount,
        balance: source.balance,
    })
}
