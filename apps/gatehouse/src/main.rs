use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use gatehouse::config::seed::{load_seed_file, seeded_providers};
use gatehouse::config::AuthConfig;
use gatehouse::middleware::cors::cors_middleware;
use gatehouse::middleware::request_trace::RequestTrace;
use gatehouse::middleware::structured_logger::StructuredLogger;
use gatehouse::middleware::trace_span::TraceSpan;
use gatehouse::routes;
use gatehouse::state::build_state;
use gatehouse::AppState;

mod telemetry;

fn build_app_state() -> Result<AppState, gatehouse::AppError> {
    let config = AuthConfig::from_env()?;

    let seeds = match &config.seed_file {
        Some(path) => load_seed_file(path)?,
        None => HashMap::new(),
    };
    let providers = seeded_providers(&config, seeds)?;

    let mut builder = build_state(config);
    for (name, store) in providers {
        builder = builder.with_provider(&name, store);
    }
    builder.build()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local runs).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let app_state = match build_app_state() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %host,
        port,
        guards = app_state.registry.len(),
        "starting gatehouse"
    );

    let data = web::Data::new(app_state);
    let registry = Arc::clone(&data.registry);

    // Keep revocations and sessions bounded even when nobody logs out for a while.
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            if let Ok(now) = gatehouse::auth::jwt::unix_seconds(std::time::SystemTime::now()) {
                registry.prune_expired(now);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
