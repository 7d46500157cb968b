//! SeaORM adapter for the accounts table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::accounts;
use crate::infra::db_errors::ACCOUNT_NOT_FOUND_PREFIX;

pub mod dto;

pub use dto::{AccountCreate, AccountNamesUpdate};

fn account_not_found(id: Uuid) -> DbErr {
    DbErr::Custom(format!("{ACCOUNT_NOT_FOUND_PREFIX}{id}"))
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(accounts::Column::Username.eq(username))
        .one(conn)
        .await
}

/// All accounts, oldest first.
pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .order_by_asc(accounts::Column::CreatedAt)
        .order_by_asc(accounts::Column::Id)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    dto: AccountCreate,
) -> Result<accounts::Model, DbErr> {
    let account = accounts::ActiveModel {
        id: Set(dto.id),
        first_name: Set(dto.first_name),
        last_name: Set(dto.last_name),
        username: Set(dto.username),
        password_hash: Set(dto.password_hash),
        number: Set(dto.number),
        balance: Set(0),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    account.insert(conn).await
}

pub async fn update_names<C: ConnectionTrait>(
    conn: &C,
    dto: AccountNamesUpdate,
) -> Result<accounts::Model, DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(accounts::Column::FirstName, Expr::value(dto.first_name))
        .col_expr(accounts::Column::LastName, Expr::value(dto.last_name))
        .filter(accounts::Column::Id.eq(dto.id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(account_not_found(dto.id));
    }

    find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| account_not_found(dto.id))
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
    let result = accounts::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(account_not_found(id));
    }
    Ok(())
}

/// Subtract `amount` only if the balance covers it.
///
/// Returns `false` when no row matched (missing account or insufficient
/// balance); the caller tells the two apart.
pub async fn debit<C: ConnectionTrait>(conn: &C, id: Uuid, amount: i64) -> Result<bool, DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).sub(amount),
        )
        .filter(accounts::Column::Id.eq(id))
        .filter(accounts::Column::Balance.gte(amount))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

pub async fn credit<C: ConnectionTrait>(conn: &C, id: Uuid, amount: i64) -> Result<(), DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).add(amount),
        )
        .filter(accounts::Column::Id.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(account_not_found(id));
    }
    Ok(())
}

/// Overwrite a balance. Used to seed funds; transfers go through debit/credit.
pub async fn set_balance<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    balance: i64,
) -> Result<(), DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(accounts::Column::Balance, Expr::value(balance))
        .filter(accounts::Column::Id.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(account_not_found(id));
    }
    Ok(())
}
