//! SeaORM -> DomainError translation helpers.
//!
//! Repositories convert `sea_orm::DbErr` into `DomainError` here; handlers then
//! map `DomainError` to `AppError` via `From`.

use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Prefix used by adapters to signal a missing account through `DbErr::Custom`.
pub const ACCOUNT_NOT_FOUND_PREFIX: &str = "ACCOUNT_NOT_FOUND:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map a unique-violation message to a domain conflict.
///
/// Postgres reports the index name, SQLite reports `table.column`.
fn unique_violation_to_conflict(msg: &str) -> (ConflictKind, &'static str) {
    if msg.contains("idx_accounts_username_unique") || msg.contains("accounts.username") {
        return (ConflictKind::UsernameTaken, "Username already taken");
    }
    (
        ConflictKind::Other("Unique".into()),
        "Unique constraint violation",
    )
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        DbErr::Custom(msg) if msg.starts_with(ACCOUNT_NOT_FOUND_PREFIX) => {
            let id = msg.trim_start_matches(ACCOUNT_NOT_FOUND_PREFIX);
            warn!(trace_id = %trace_id, account_id = %id, "Account not found");
            return DomainError::not_found(NotFoundKind::Account, "Account not found");
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&detail), "Unique constraint violation");
        let (kind, msg) = unique_violation_to_conflict(&detail);
        return DomainError::conflict(kind, msg);
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        let (kind, msg) = unique_violation_to_conflict(&error_msg);
        return DomainError::conflict(kind, msg);
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    if matches!(e, DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. }) {
        error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Stored data failed to decode");
        return DomainError::infra(InfraErrorKind::DataCorruption, "Stored data is corrupt");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        map_db_err(e)
    }
}
