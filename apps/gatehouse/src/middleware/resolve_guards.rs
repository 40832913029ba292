//! Guard resolution middleware
//!
//! Builds the request's `GuardSet` from the registry in `AppState` and binds
//! the default guard. Everything guard-related downstream (scope binding,
//! `Authenticate`, the active-status gate, handlers) reads from here.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::trace;

use super::reject;
use crate::error::AppError;
use crate::guards::BoundGuard;
use crate::state::app_state::AppState;

pub struct ResolveGuards;

impl<S, B> Transform<S, ServiceRequest> for ResolveGuards
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ResolveGuardsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResolveGuardsMiddleware { service }))
    }
}

pub struct ResolveGuardsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ResolveGuardsMiddleware<S>
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
        let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => return reject(req, AppError::internal("AppState not available")),
        };

        let guards = app_state.registry.resolve(req.request());
        trace!(guards = ?guards, "guards resolved");

        {
            let mut extensions = req.extensions_mut();
            extensions.insert(guards);
            if let Some(default) = app_state.registry.default_guard() {
                if !extensions.contains::<BoundGuard>() {
                    extensions.insert(BoundGuard(default.clone()));
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
