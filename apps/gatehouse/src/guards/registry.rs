use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use actix_web::HttpRequest;

use super::bearer::{bearer_from_request, BearerToken};
use super::session::{IssuedSession, SessionGuard, SessionStore};
use super::token::TokenGuard;
use super::{Guard, GuardName, GuardSet};
use crate::auth::{IssuedToken, RevocationList, TokenService};
use crate::error::AppError;
use crate::principals::{Principal, PrincipalStore};

/// How a guard verifies and issues credentials.
#[derive(Debug, Clone)]
pub enum GuardDriver {
    Jwt(TokenService),
    Session(Arc<SessionStore>),
}

impl GuardDriver {
    pub fn kind(&self) -> &'static str {
        match self {
            GuardDriver::Jwt(_) => "jwt",
            GuardDriver::Session(_) => "session",
        }
    }
}

/// Credential handed to a principal on login or refresh.
#[derive(Debug, Clone)]
pub enum IssuedCredential {
    Token(IssuedToken),
    Session(IssuedSession),
}

/// One configured guard.
#[derive(Clone)]
pub struct GuardDefinition {
    name: GuardName,
    driver: GuardDriver,
    provider_name: String,
    provider: Arc<dyn PrincipalStore>,
}

impl GuardDefinition {
    pub fn new(
        name: GuardName,
        driver: GuardDriver,
        provider_name: impl Into<String>,
        provider: Arc<dyn PrincipalStore>,
    ) -> Self {
        Self {
            name,
            driver,
            provider_name: provider_name.into(),
            provider,
        }
    }

    pub fn name(&self) -> &GuardName {
        &self.name
    }

    pub fn driver(&self) -> &GuardDriver {
        &self.driver
    }

    pub fn provider(&self) -> &dyn PrincipalStore {
        self.provider.as_ref()
    }

    /// Cookie carrying the session id for session-driven guards.
    pub fn cookie_name(&self) -> String {
        format!("{}_session", self.name)
    }

    pub fn issue(
        &self,
        principal: &Principal,
        now: SystemTime,
    ) -> Result<IssuedCredential, AppError> {
        match &self.driver {
            GuardDriver::Jwt(service) => service.mint(principal.id, now).map(IssuedCredential::Token),
            GuardDriver::Session(store) => store
                .start(principal.id, now)
                .map(IssuedCredential::Session),
        }
    }

    fn resolve(
        &self,
        req: &HttpRequest,
        bearer: &BearerToken,
        revocations: &Arc<RevocationList>,
    ) -> Box<dyn Guard> {
        match &self.driver {
            GuardDriver::Jwt(service) => Box::new(TokenGuard::resolve(
                service,
                self.provider(),
                revocations.clone(),
                bearer,
            )),
            GuardDriver::Session(store) => {
                let cookie = req.cookie(&self.cookie_name());
                Box::new(SessionGuard::resolve(
                    self.name.clone(),
                    store.clone(),
                    self.provider(),
                    cookie.as_ref().map(|c| c.value()),
                ))
            }
        }
    }
}

impl fmt::Debug for GuardDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardDefinition")
            .field("name", &self.name)
            .field("driver", &self.driver.kind())
            .field("provider", &self.provider_name)
            .finish()
    }
}

/// Ordered, duplicate-free set of guards, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct GuardRegistry {
    guards: Vec<GuardDefinition>,
    default_guard: Option<GuardName>,
    revocations: Arc<RevocationList>,
}

impl GuardRegistry {
    /// `default_guard` falls back to the first declared guard.
    pub fn new(
        guards: Vec<GuardDefinition>,
        default_guard: Option<GuardName>,
        revocations: Arc<RevocationList>,
    ) -> Result<Self, AppError> {
        for (i, guard) in guards.iter().enumerate() {
            if guards[..i].iter().any(|g| g.name == guard.name) {
                return Err(AppError::config(format!(
                    "guard '{}' declared more than once",
                    guard.name
                )));
            }
        }

        let default_guard = match default_guard {
            Some(name) if !guards.iter().any(|g| g.name == name) => {
                return Err(AppError::config(format!(
                    "default guard '{name}' is not a configured guard"
                )));
            }
            Some(name) => Some(name),
            None => guards.first().map(|g| g.name.clone()),
        };

        Ok(Self {
            guards,
            default_guard,
            revocations,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &GuardName> {
        self.guards.iter().map(|g| &g.name)
    }

    pub fn get(&self, name: &GuardName) -> Option<&GuardDefinition> {
        self.guards.iter().find(|g| &g.name == name)
    }

    pub fn default_guard(&self) -> Option<&GuardName> {
        self.default_guard.as_ref()
    }

    pub fn revocations(&self) -> &Arc<RevocationList> {
        &self.revocations
    }

    /// Drop expired revocations and sessions across every guard.
    pub fn prune_expired(&self, now: i64) {
        self.revocations.prune(now);
        for guard in &self.guards {
            if let GuardDriver::Session(store) = &guard.driver {
                store.prune(now);
            }
        }
    }

    /// Instantiate every guard for one request, preserving declaration order.
    pub fn resolve(&self, req: &HttpRequest) -> GuardSet {
        let bearer = bearer_from_request(req);
        GuardSet::new(
            self.guards
                .iter()
                .map(|def| def.resolve(req, &bearer, &self.revocations))
                .collect(),
        )
    }
}
