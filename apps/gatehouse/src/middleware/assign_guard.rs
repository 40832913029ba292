//! Scope-level guard binding
//!
//! Binds a named guard for every request in the wrapped scope, before any
//! credential is checked, so both login and the protected routes of that
//! scope act on it.

use std::rc::Rc;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use super::reject;
use crate::error::AppError;
use crate::guards::BoundGuard;
use crate::state::app_state::AppState;

pub struct AssignGuard {
    guard: Rc<str>,
}

impl AssignGuard {
    pub fn new(guard: &str) -> Self {
        Self {
            guard: Rc::from(guard),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AssignGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AssignGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AssignGuardMiddleware {
            service,
            guard: self.guard.clone(),
        }))
    }
}

pub struct AssignGuardMiddleware<S> {
    service: S,
    guard: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for AssignGuardMiddleware<S>
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
        let name = req.app_data::<web::Data<AppState>>().and_then(|state| {
            state
                .registry
                .names()
                .find(|n| n.as_str() == &*self.guard)
                .cloned()
        });

        match name {
            Some(name) => {
                req.extensions_mut().insert(BoundGuard(name));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            None => {
                let detail = format!("route scope binds unknown guard '{}'", self.guard);
                reject(req, AppError::config(detail))
            }
        }
    }
}
