use actix_web::{web, App, HttpServer};
use ledger_api::config::db::{DbKind, RuntimeEnv};
use ledger_api::config::server::ServerConfig;
use ledger_api::infra::state::build_state;
use ledger_api::middleware::{
    cors_middleware, RequestTrace, StructuredLogger, TraceSpan,
};
use ledger_api::routes;
use ledger_api::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is fine; the real environment may carry everything.
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    // Fail closed: no secret, no server.
    let security_config = match SecurityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(DbKind::Postgres)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(app_state);
    let (host, port) = server_config.bind_addr();
    info!(%host, port, "starting ledger api");

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(TraceSpan)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
