use std::time::SystemTime;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, HttpResponseBuilder, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, MessageBody};
use crate::extractors::authenticated::{terminate_guard, Authenticated};
use crate::guards::{BoundGuard, GuardDefinition, GuardDriver, IssuedCredential};
use crate::middleware::Authenticate;
use crate::principals::Principal;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token_type: String,
    pub expires_in: u64,
}

fn guard_definition<'a>(
    app_state: &'a AppState,
    req: &HttpRequest,
) -> Result<&'a GuardDefinition, AppError> {
    let bound = req
        .extensions()
        .get::<BoundGuard>()
        .map(|b| b.0.clone())
        .ok_or_else(|| AppError::config("no guard bound for this route"))?;

    app_state
        .registry
        .get(&bound)
        .ok_or_else(|| AppError::config(format!("guard '{bound}' is not configured")))
}

fn session_cookie(definition: &GuardDefinition, value: String) -> Cookie<'static> {
    Cookie::build(definition.cookie_name(), value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Answer with a fresh credential: a bearer token in the body, or a
/// session cookie.
fn credential_response(
    definition: &GuardDefinition,
    credential: IssuedCredential,
) -> HttpResponse {
    match credential {
        IssuedCredential::Token(issued) => HttpResponse::Ok().json(TokenResponse {
            access_token: issued.token,
            token_type: "bearer".to_string(),
            expires_in: issued.expires_in,
        }),
        IssuedCredential::Session(session) => HttpResponse::Ok()
            .cookie(session_cookie(definition, session.id))
            .json(SessionResponse {
                token_type: "session".to_string(),
                expires_in: session.expires_in,
            }),
    }
}

fn clear_session_cookie(definition: &GuardDefinition, builder: &mut HttpResponseBuilder) {
    if let GuardDriver::Session(_) = definition.driver() {
        let mut cookie = session_cookie(definition, String::new());
        cookie.make_removal();
        builder.cookie(cookie);
    }
}

/// Exchange email and password for a credential of the bound guard.
async fn login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_CREDENTIALS_PAYLOAD",
            "Email and password are required".to_string(),
        ));
    }

    let definition = guard_definition(&app_state, &req)?;

    let principal = definition
        .provider()
        .find_by_credentials(body.email.trim(), &body.password)
        .ok_or_else(AppError::invalid_credentials)?;

    // Disabled accounts get the same answer the gate would give them.
    if principal.status.is_inactive() {
        return Err(AppError::not_authorized());
    }

    let credential = definition.issue(&principal, SystemTime::now())?;
    info!(guard = %definition.name(), principal_id = principal.id, "login");

    Ok(credential_response(definition, credential))
}

async fn logout(
    req: HttpRequest,
    auth: Authenticated,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let definition = guard_definition(&app_state, &req)?;
    terminate_guard(&req, &auth.guard)?;
    info!(guard = %auth.guard, principal_id = auth.principal.id, "logout");

    let mut builder = HttpResponse::Ok();
    clear_session_cookie(definition, &mut builder);
    Ok(builder.json(MessageBody {
        message: "Successfully logged out".to_string(),
    }))
}

/// Invalidate the presented credential and hand out a new one.
async fn refresh(
    req: HttpRequest,
    auth: Authenticated,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let definition = guard_definition(&app_state, &req)?;
    terminate_guard(&req, &auth.guard)?;

    let credential = definition.issue(&auth.principal, SystemTime::now())?;
    info!(guard = %auth.guard, principal_id = auth.principal.id, "credential refreshed");

    Ok(credential_response(definition, credential))
}

async fn profile(auth: Authenticated) -> Result<web::Json<Principal>, AppError> {
    Ok(web::Json(auth.principal))
}

fn guarded_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/logout", web::post().to(logout))
        .route("/refresh", web::post().to(refresh))
        .route("/profile", web::post().to(profile));
}

/// `/api/v1/user/**`: login uses the default guard; the rest require `user`.
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login)).service(
        web::scope("")
            .wrap(Authenticate::guard("user"))
            .configure(guarded_routes),
    );
}

/// `/api/v1/admin/**`: the scope binds `admin` first; protected routes then
/// require that bound guard.
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login)).service(
        web::scope("")
            .wrap(Authenticate::bound())
            .configure(guarded_routes),
    );
}
