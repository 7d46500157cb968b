//! Access log: one `request_completed` event per request.
//!
//! Runs outside the ownership gate, so the authenticated account (if any) is
//! read back from the request extensions once the inner service is done.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn, Level};

use crate::auth::claims::AccountClaims;
use crate::middleware::request_trace::TraceId;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// What gets logged once the response is known.
struct Completed {
    method: String,
    path: String,
    route: String,
    trace_id: String,
    account_id: Option<String>,
    status: StatusCode,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let account_id = self.account_id.as_deref().unwrap_or("-");
        let status_code = self.status.as_u16();
        let (method, path, route, trace_id) = (&self.method, &self.path, &self.route, &self.trace_id);
        let duration_us = self.duration_us;

        let level = level_for(self.status);
        if level == Level::ERROR {
            error!(http.method = %method, url.path = %path, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, account_id, "request_completed");
        } else if level == Level::WARN {
            warn!(http.method = %method, url.path = %path, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, account_id, "request_completed");
        } else {
            info!(http.method = %method, url.path = %path, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, account_id, "request_completed");
        }
    }
}

/// 5xx at error, 4xx at warn, everything else at info.
fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, route, account_id) = match &result {
                Ok(res) => {
                    let request = res.request();
                    let route = request.match_pattern().unwrap_or_else(|| path.clone());
                    let account_id = request
                        .extensions()
                        .get::<AccountClaims>()
                        .map(|claims| claims.account_id.to_string());
                    (res.status(), route, account_id)
                }
                Err(err) => (err.as_response_error().status_code(), path.clone(), None),
            };

            Completed {
                method,
                path,
                route,
                trace_id,
                account_id,
                status,
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
    use uuid::Uuid;

    use super::*;

    #[::core::prelude::v1::test]
    fn levels_follow_status_class() {
        assert_eq!(level_for(StatusCode::OK), Level::INFO);
        assert_eq!(level_for(StatusCode::NO_CONTENT), Level::INFO);
        assert_eq!(level_for(StatusCode::FORBIDDEN), Level::WARN);
        assert_eq!(level_for(StatusCode::NOT_FOUND), Level::WARN);
        assert_eq!(level_for(StatusCode::SERVICE_UNAVAILABLE), Level::ERROR);
    }

    async fn authenticated(req: HttpRequest) -> HttpResponse {
        req.extensions_mut().insert(AccountClaims {
            account_id: Uuid::nil(),
            iat: 0,
            exp: 0,
        });
        HttpResponse::Created().body("made")
    }

    #[actix_web::test]
    async fn passes_responses_through_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .route("/v1/account/{account_id}", web::get().to(authenticated)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/v1/account/{}", Uuid::nil()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(test::read_body(resp).await.as_ref(), b"made");
    }

    #[actix_web::test]
    async fn unmatched_routes_are_still_logged_and_returned() {
        let app = test::init_service(App::new().wrap(StructuredLogger)).await;

        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
