use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::state::app_state::AppState;

const APP_VERSION: &str = concat!("gatehouse ", env!("CARGO_PKG_VERSION"));

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body(APP_VERSION))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    guards: Vec<String>,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        guards: app_state
            .registry
            .names()
            .map(|n| n.to_string())
            .collect(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}
