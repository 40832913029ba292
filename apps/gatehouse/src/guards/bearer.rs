//! Bearer token extraction from the Authorization header.

use actix_web::http::header::{self, HeaderValue};
use actix_web::HttpRequest;

use super::AuthFailure;

/// The request's bearer token. `GuardRegistry::resolve` parses it once per
/// request and hands it to every token guard.
///
/// `Ok(None)` means no Authorization header at all.
pub type BearerToken = Result<Option<String>, AuthFailure>;

pub fn bearer_from_request(req: &HttpRequest) -> BearerToken {
    extract_bearer_from_header(req.headers().get(header::AUTHORIZATION))
}

pub fn extract_bearer_from_header(header_value: Option<&HeaderValue>) -> BearerToken {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AuthFailure::MalformedBearer)?;

    // Parse "Bearer <token>" format
    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AuthFailure::MalformedBearer);
    }

    let token_str = parts[1];
    if token_str.is_empty() {
        return Err(AuthFailure::MalformedBearer);
    }

    Ok(Some(token_str.to_string()))
}
