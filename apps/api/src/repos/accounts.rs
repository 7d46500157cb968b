//! Account repository functions for the domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::accounts_sea as accounts_adapter;
use crate::adapters::accounts_sea::{AccountCreate, AccountNamesUpdate};
use crate::entities::accounts;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Account domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: OffsetDateTime,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            password_hash: model.password_hash,
            number: model.number,
            balance: model.balance,
            created_at: model.created_at,
        }
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::not_found(NotFoundKind::Account, format!("Account {id} not found"))
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<Account>, DomainError> {
    let account = accounts_adapter::find_by_id(conn, id).await?;
    Ok(account.map(Account::from))
}

/// Like [`find_by_id`] but a missing account is an error.
pub async fn require_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Account, DomainError> {
    find_by_id(conn, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<Account>, DomainError> {
    let account = accounts_adapter::find_by_username(conn, username).await?;
    Ok(account.map(Account::from))
}

pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<Account>, DomainError> {
    let accounts = accounts_adapter::list(conn).await?;
    Ok(accounts.into_iter().map(Account::from).collect())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    dto: AccountCreate,
) -> Result<Account, DomainError> {
    let account = accounts_adapter::create(conn, dto).await?;
    Ok(Account::from(account))
}

pub async fn update_names<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    first_name: String,
    last_name: String,
) -> Result<Account, DomainError> {
    let account = accounts_adapter::update_names(
        conn,
        AccountNamesUpdate {
            id,
            first_name,
            last_name,
        },
    )
    .await?;
    Ok(Account::from(account))
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    accounts_adapter::delete(conn, id).await?;
    Ok(())
}

/// Conditional debit; `false` when the balance does not cover `amount`
/// or the account is gone.
pub async fn debit<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    amount: i64,
) -> Result<bool, DomainError> {
    Ok(accounts_adapter::debit(conn, id, amount).await?)
}

pub async fn credit<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    amount: i64,
) -> Result<(), DomainError> {
    accounts_adapter::credit(conn, id, amount).await?;
    Ok(())
}

pub async fn set_balance<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    balance: i64,
) -> Result<(), DomainError> {
    accounts_adapter::set_balance(conn, id, balance).await?;
    Ok(())
}
