//! Authentication requirement for protected routes
//!
//! `Authenticate::bound()` requires the guard the scope bound;
//! `Authenticate::guard(name)` requires a named guard and binds it for the
//! handlers. Requests without a principal under that guard get a 401 naming
//! why.

use std::rc::Rc;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use super::reject;
use crate::error::AppError;
use crate::guards::{AuthFailure, BoundGuard, Guard, GuardSet};

#[derive(Clone)]
enum Requirement {
    Bound,
    Named(Rc<str>),
}

pub struct Authenticate {
    requirement: Requirement,
}

impl Authenticate {
    pub fn bound() -> Self {
        Self {
            requirement: Requirement::Bound,
        }
    }

    pub fn guard(name: &str) -> Self {
        Self {
            requirement: Requirement::Named(Rc::from(name)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            requirement: self.requirement.clone(),
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: S,
    requirement: Requirement,
}

impl<S> AuthenticateMiddleware<S> {
    fn check(&self, req: &ServiceRequest) -> Result<(), AppError> {
        let mut extensions = req.extensions_mut();

        let (outcome, name) = {
            let guards = extensions
                .get::<GuardSet>()
                .ok_or_else(|| AppError::internal("guards were not resolved for this request"))?;

            let guard = match &self.requirement {
                Requirement::Bound => {
                    let bound = extensions
                        .get::<BoundGuard>()
                        .ok_or_else(AppError::unauthorized)?;
                    guards.get(&bound.0)
                }
                Requirement::Named(name) => guards
                    .names()
                    .find(|n| n.as_str() == &**name)
                    .and_then(|n| guards.get(n)),
            }
            .ok_or_else(|| AppError::config("required guard is not configured"))?;

            let outcome = match guard.failure() {
                None if guard.is_authenticated() => Ok(()),
                None => Err(AuthFailure::MissingBearer),
                Some(failure) => Err(failure),
            };
            (outcome, guard.name().clone())
        };

        if let Err(failure) = outcome {
            debug!(guard = %name, reason = %failure, "authentication required");
            return Err(failure.into());
        }

        if let Requirement::Named(_) = self.requirement {
            extensions.insert(BoundGuard(name));
        }
        Ok(())
    }
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = self.check(&req) {
            return reject(req, err);
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
