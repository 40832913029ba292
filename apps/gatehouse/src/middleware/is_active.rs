//! Active-status gate middleware
//!
//! Runs `gate::enforce_active` over the request's resolved guards. A guard
//! holding an inactive principal is logged out and the request ends with
//! 403 `{"message": "Not authorized"}`; otherwise the request passes through
//! untouched. Without resolved guards there is nothing to check.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use super::reject;
use crate::error::AppError;
use crate::gate::{enforce_active, GateDecision};
use crate::guards::GuardSet;

pub struct IsActive;

impl<S, B> Transform<S, ServiceRequest> for IsActive
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = IsActiveMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IsActiveMiddleware { service }))
    }
}

pub struct IsActiveMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for IsActiveMiddleware<S>
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
        let decision = match req.extensions_mut().get_mut::<GuardSet>() {
            Some(guards) => enforce_active(guards),
            None => {
                debug!("no resolved guards; active-status gate skipped");
                GateDecision::Forward
            }
        };

        if let GateDecision::Reject {
            guard,
            principal_id,
        } = decision
        {
            warn!(guard = %guard, principal_id, "inactive principal logged out");
            return reject(req, AppError::not_authorized());
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
