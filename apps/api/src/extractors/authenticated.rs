use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::claims::AccountClaims;
use crate::error::AppError;

/// Verified claims of the caller, placed in request extensions by the
/// `AccountOwnership` middleware. Only available on gated routes.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub AccountClaims);

impl AuthenticatedAccount {
    pub fn account_id(&self) -> Uuid {
        self.0.account_id
    }
}

impl FromRequest for AuthenticatedAccount {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<AccountClaims>().cloned();
        // Reaching a handler without claims means the route is not wrapped.
        ready(claims.map(AuthenticatedAccount).ok_or(AppError::MissingToken))
    }
}
