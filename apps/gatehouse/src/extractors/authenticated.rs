use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::error::AppError;
use crate::guards::{BoundGuard, Guard, GuardName, GuardSet};
use crate::principals::Principal;

/// The bound guard and the principal authenticated under it.
///
/// Only meaningful behind `Authenticate`; elsewhere extraction fails with 401.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub guard: GuardName,
    pub principal: Principal,
}

impl Authenticated {
    fn from_extensions(req: &HttpRequest) -> Result<Self, AppError> {
        let extensions = req.extensions();

        let guard = extensions
            .get::<BoundGuard>()
            .map(|b| b.0.clone())
            .ok_or_else(AppError::unauthorized)?;

        let principal = extensions
            .get::<GuardSet>()
            .and_then(|guards| guards.get(&guard))
            .and_then(|g| g.current_principal())
            .ok_or_else(AppError::unauthorized)?;

        Ok(Self { guard, principal })
    }
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_extensions(req))
    }
}

/// Log the request's principal out of `guard`.
pub fn terminate_guard(req: &HttpRequest, guard: &GuardName) -> Result<(), AppError> {
    let mut extensions = req.extensions_mut();
    let handle = extensions
        .get_mut::<GuardSet>()
        .and_then(|guards| guards.get_mut(guard))
        .ok_or_else(|| AppError::internal(format!("guard '{guard}' not resolved")))?;
    handle.terminate_session();
    Ok(())
}
