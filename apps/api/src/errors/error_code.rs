//! Error codes for the ledger API.
//!
//! Every code that can appear in an error response is listed here; never pass
//! ad-hoc strings as error codes. Codes are SCREAMING_SNAKE_CASE and map 1:1
//! to the `code` member of the JSON error body.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No token in the `x-jwt-token` header
    MissingToken,
    /// Token failed structural, algorithm, signature, or expiry checks
    InvalidToken,
    /// Token verified but its payload has the wrong shape
    InvalidClaims,
    /// Token is valid but belongs to a different account
    PermissionDenied,
    /// Sign-in failed; deliberately does not say which part was wrong
    CredentialMismatch,

    // Request Validation
    /// Path segment is not a well-formed account identifier
    InvalidAccountId,
    /// Body failed field validation
    ValidationError,
    /// Body could not be parsed
    BadRequest,

    // Resource Not Found
    AccountNotFound,
    NotFound,

    // Business Logic Conflicts
    UsernameTaken,
    InsufficientFunds,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidClaims => "INVALID_CLAIMS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::CredentialMismatch => "CREDENTIAL_MISMATCH",

            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// All codes, used to check uniqueness of the wire strings.
    pub const ALL: &'static [ErrorCode] = &[
        Self::MissingToken,
        Self::InvalidToken,
        Self::InvalidClaims,
        Self::PermissionDenied,
        Self::CredentialMismatch,
        Self::InvalidAccountId,
        Self::ValidationError,
        Self::BadRequest,
        Self::AccountNotFound,
        Self::NotFound,
        Self::UsernameTaken,
        Self::InsufficientFunds,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
