pub mod auth;
pub mod seed;

pub use auth::{AuthConfig, DriverKind, GuardConfig};
