#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod guards;
pub mod middleware;
pub mod principals;
pub mod routes;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{Claims, RevocationList, TokenService};
pub use config::AuthConfig;
pub use error::AppError;
pub use extractors::Authenticated;
pub use gate::{enforce_active, GateDecision};
pub use guards::{Guard, GuardName, GuardRegistry, GuardSet};
pub use middleware::cors::cors_middleware;
pub use middleware::{
    AssignGuard, Authenticate, IsActive, RequestTrace, ResolveGuards, StructuredLogger, TraceSpan,
};
pub use principals::{InMemoryPrincipalStore, Principal, PrincipalStatus, PrincipalStore};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gatehouse_test_support::logging::init();
}
