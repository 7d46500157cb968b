use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Name of the path segment holding the target account.
pub const ACCOUNT_ID_PARAM: &str = "account_id";

/// Parse a path segment into an account id.
pub fn parse_account_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_account_id(raw))
}

/// Account id taken from the `{account_id}` route segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(pub Uuid);

impl FromRequest for AccountId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get(ACCOUNT_ID_PARAM) {
            Some(raw) => parse_account_id(raw).map(AccountId),
            None => Err(AppError::invalid_account_id("")),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn parses_hyphenated_uuid() {
        let id = parse_account_id("11111111-1111-1111-1111-111111111111").unwrap();
        assert_eq!(id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn rejects_non_uuid() {
        for raw in ["", "42", "not-a-uuid", "11111111-1111-1111-1111-11111111111"] {
            let err = parse_account_id(raw).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidAccountId);
        }
    }
}
