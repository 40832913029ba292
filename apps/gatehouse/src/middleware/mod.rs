use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use futures_util::future::LocalBoxFuture;

use crate::error::AppError;

pub mod assign_guard;
pub mod authenticate;
pub mod cors;
pub mod is_active;
pub mod request_trace;
pub mod resolve_guards;
pub mod structured_logger;
pub mod trace_span;

pub use assign_guard::AssignGuard;
pub use authenticate::Authenticate;
pub use cors::cors_middleware;
pub use is_active::IsActive;
pub use request_trace::RequestTrace;
pub use resolve_guards::ResolveGuards;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;

/// End the request with `err` as its response. Rendering happens when the
/// future is polled, inside the `RequestTrace` scope.
fn reject<B: 'static>(
    req: ServiceRequest,
    err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, actix_web::Error>> {
    Box::pin(async move { Ok(req.error_response(err).map_into_right_body()) })
}
