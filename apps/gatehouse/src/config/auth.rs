//! Guard configuration, read once at startup.
//!
//! Environment variables:
//! - `AUTH_GUARDS`: ordered, comma-separated guard names (default `user,admin`)
//! - `AUTH_DEFAULT_GUARD`: guard bound when a scope binds none (default: first)
//! - `AUTH_GUARD_<NAME>_DRIVER`: `jwt` (default) or `session`
//! - `AUTH_GUARD_<NAME>_PROVIDER`: principal provider (default `<name>s`)
//! - `AUTH_GUARD_<NAME>_JWT_SECRET`, else `BACKEND_JWT_SECRET` (jwt guards)
//! - `AUTH_TOKEN_TTL_SECS`, `AUTH_SESSION_TTL_SECS`
//! - `AUTH_SEED_FILE`: JSON principals to preload

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;
use crate::guards::session::DEFAULT_SESSION_TTL;
use crate::guards::GuardName;
use crate::state::security_config::DEFAULT_TOKEN_TTL;

const DEFAULT_GUARDS: &str = "user,admin";

/// Upper bound for token and session lifetimes.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Jwt,
    Session,
}

impl DriverKind {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jwt" => Ok(DriverKind::Jwt),
            "session" => Ok(DriverKind::Session),
            other => Err(AppError::config(format!("unknown guard driver '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub name: GuardName,
    pub driver: DriverKind,
    pub provider: String,
    /// Signing secret; always present for jwt guards
    pub jwt_secret: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub guards: Vec<GuardConfig>,
    pub default_guard: Option<GuardName>,
    pub token_ttl: Duration,
    pub session_ttl: Duration,
    pub seed_file: Option<PathBuf>,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_guards = lookup("AUTH_GUARDS").unwrap_or_else(|| DEFAULT_GUARDS.to_string());
        let shared_secret = lookup("BACKEND_JWT_SECRET").filter(|s| !s.is_empty());

        let mut guards: Vec<GuardConfig> = Vec::new();
        for raw in raw_guards.split(',').filter(|s| !s.trim().is_empty()) {
            let name = GuardName::parse(raw)?;
            if guards.iter().any(|g| g.name == name) {
                return Err(AppError::config(format!(
                    "guard '{name}' listed twice in AUTH_GUARDS"
                )));
            }

            let prefix = format!("AUTH_GUARD_{}", name.as_str().to_ascii_uppercase());
            let driver = match lookup(&format!("{prefix}_DRIVER")) {
                Some(raw) => DriverKind::parse(&raw)?,
                None => DriverKind::Jwt,
            };
            let provider = lookup(&format!("{prefix}_PROVIDER"))
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| format!("{name}s"));

            let jwt_secret = match driver {
                DriverKind::Jwt => Some(
                    lookup(&format!("{prefix}_JWT_SECRET"))
                        .filter(|s| !s.is_empty())
                        .or_else(|| shared_secret.clone())
                        .map(String::into_bytes)
                        .ok_or_else(|| {
                            AppError::config(format!(
                                "{prefix}_JWT_SECRET or BACKEND_JWT_SECRET must be set"
                            ))
                        })?,
                ),
                DriverKind::Session => None,
            };

            guards.push(GuardConfig {
                name,
                driver,
                provider,
                jwt_secret,
            });
        }

        let default_guard = lookup("AUTH_DEFAULT_GUARD")
            .filter(|s| !s.trim().is_empty())
            .map(|raw| GuardName::parse(&raw))
            .transpose()?;

        Ok(Self {
            guards,
            default_guard,
            token_ttl: ttl(&lookup, "AUTH_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL)?,
            session_ttl: ttl(&lookup, "AUTH_SESSION_TTL_SECS", DEFAULT_SESSION_TTL)?,
            seed_file: lookup("AUTH_SEED_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Distinct provider names, in first-use order.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for guard in &self.guards {
            if !names.contains(&guard.provider.as_str()) {
                names.push(&guard.provider);
            }
        }
        names
    }
}

fn ttl<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 && secs <= MAX_TTL.as_secs() => Ok(Duration::from_secs(secs)),
            _ => Err(AppError::config(format!(
                "{key} must be between 1 and {} seconds",
                MAX_TTL.as_secs()
            ))),
        },
    }
}
