//! Ownership gate for `/account/{account_id}` resources.
//!
//! Verifies the `x-jwt-token` header and lets the request through only when
//! the token's `accountId` equals the `{account_id}` path segment. On success
//! the verified [`AccountClaims`] are stored in request extensions; on failure
//! the wrapped handler never runs and the standard error body is returned.
//!
//! Check order:
//! 1. header absent, not UTF-8 or empty: 401 `MISSING_TOKEN`
//! 2. token fails verification: 401 `INVALID_TOKEN` (or 403 `INVALID_CLAIMS`)
//! 3. path segment is not a UUID: 400 `INVALID_ACCOUNT_ID`
//! 4. ids differ: 403 `PERMISSION_DENIED`
//!
//! Must be applied at resource level so the path is already matched.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::AccountClaims;
use crate::auth::jwt::{verify_access_token, TokenError};
use crate::error::AppError;
use crate::extractors::account_id::{parse_account_id, ACCOUNT_ID_PARAM};
use crate::logging::security;
use crate::state::app_state::AppState;

/// Request header carrying the access token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

pub struct AccountOwnership;

impl<S, B> Transform<S, ServiceRequest> for AccountOwnership
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccountOwnershipMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccountOwnershipMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AccountOwnershipMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccountOwnershipMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authorize(&req) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Run the checks in order, returning the verified claims on success.
fn authorize(req: &ServiceRequest) -> Result<AccountClaims, AppError> {
    let path = req.path();

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            security::token_rejected("missing", path);
            AppError::MissingToken
        })?;

    let claims = verify_access_token(token, &state.security).map_err(|e| {
        let reason = match e {
            TokenError::InvalidToken(rejection) => rejection.as_str(),
            TokenError::InvalidClaims => "invalid_claims",
        };
        security::token_rejected(reason, path);
        AppError::from(e)
    })?;

    let target = match req.match_info().get(ACCOUNT_ID_PARAM) {
        Some(raw) => parse_account_id(raw)?,
        None => return Err(AppError::invalid_account_id("")),
    };

    if claims.account_id != target {
        security::ownership_denied(claims.account_id, target, path);
        return Err(AppError::PermissionDenied);
    }

    Ok(claims)
}
