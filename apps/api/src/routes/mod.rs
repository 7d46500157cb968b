use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod health;

/// Register every route under `/v1`.
///
/// `auth` registers `/account/signin` and `accounts` registers
/// `/account/create` ahead of `/account/{account_id}` so the literal paths win.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .configure(health::configure_routes)
            .configure(auth::configure_routes)
            .configure(accounts::configure_routes),
    );
}
