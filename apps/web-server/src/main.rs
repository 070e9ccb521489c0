//! # Gazette Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use gazette_core::ports::{PasswordService, SessionService};
use gazette_infra::auth::{Argon2PasswordService, SignedSessionService};

mod config;
mod csrf;
mod handlers;
mod middleware;
mod render;
mod state;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Gazette web server on {}:{}",
        config.host,
        config.port
    );

    let Some(db_config) = config.database.as_ref() else {
        tracing::error!("DATABASE_URL is not set");
        return Err(std::io::Error::other("DATABASE_URL is not set"));
    };
    let db = gazette_infra::connect(db_config)
        .await
        .map_err(std::io::Error::other)?;

    let templates = tera::Tera::new(&format!("{}/**/*.html", config.templates_dir))
        .map_err(std::io::Error::other)?;

    let state = AppState::new(db, templates);

    let sessions: Arc<dyn SessionService> =
        Arc::new(SignedSessionService::new(config.session.clone()));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(passwords.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::pages::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,web_server=debug,gazette_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
