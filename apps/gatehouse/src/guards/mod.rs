//! Guards: named authentication contexts.
//!
//! A [`GuardRegistry`] is built once at startup from configuration. For every
//! request it is resolved into a [`GuardSet`]: one [`Guard`] handle per
//! registered guard, in declaration order, each knowing whether the request
//! carries valid credentials for that guard.

pub mod bearer;
pub mod registry;
pub mod session;
pub mod token;

use std::fmt;

use thiserror::Error;

use crate::auth::TokenError;
use crate::error::AppError;
use crate::principals::Principal;

pub use registry::{GuardDefinition, GuardDriver, GuardRegistry, IssuedCredential};
pub use session::{IssuedSession, SessionGuard, SessionStore};
pub use token::TokenGuard;

/// Validated guard identifier: lowercase ASCII letters, digits and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuardName(String);

impl GuardName {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let name = raw.trim();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(AppError::config(format!("invalid guard name '{raw}'")));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a guard holds no authenticated principal for this request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Missing Authorization header")]
    MissingBearer,
    #[error("Missing or invalid Bearer token")]
    MalformedBearer,
    #[error("{0}")]
    Token(#[from] TokenError),
    #[error("token revoked")]
    RevokedToken,
    #[error("principal not found")]
    UnknownPrincipal,
    #[error("no session")]
    MissingSession,
    #[error("session expired or ended")]
    EndedSession,
}

impl From<AuthFailure> for AppError {
    fn from(e: AuthFailure) -> Self {
        match e {
            AuthFailure::MissingBearer | AuthFailure::MalformedBearer => {
                AppError::unauthorized_missing_bearer()
            }
            AuthFailure::Token(e) => e.into(),
            AuthFailure::RevokedToken => AppError::unauthorized_revoked_jwt(),
            AuthFailure::UnknownPrincipal
            | AuthFailure::MissingSession
            | AuthFailure::EndedSession => AppError::unauthorized(),
        }
    }
}

/// Per-request handle on one authentication context.
pub trait Guard {
    fn name(&self) -> &GuardName;

    fn is_authenticated(&self) -> bool;

    fn current_principal(&self) -> Option<Principal>;

    /// Log out: invalidate the credential behind this guard. No-op when
    /// nothing is authenticated.
    fn terminate_session(&mut self);

    /// Reason the guard is unauthenticated, if it is.
    fn failure(&self) -> Option<AuthFailure> {
        None
    }
}

/// The guard a route scope selected for its handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundGuard(pub GuardName);

/// All guard handles of one request, in registry order.
#[derive(Default)]
pub struct GuardSet {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardSet {
    pub fn new(guards: Vec<Box<dyn Guard>>) -> Self {
        Self { guards }
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
        self.guards.iter().map(|g| g.name())
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Box<dyn Guard>> {
        self.guards.iter_mut()
    }

    pub fn get(&self, name: &GuardName) -> Option<&(dyn Guard + 'static)> {
        self.guards
            .iter()
            .find(|g| g.name() == name)
            .map(|g| g.as_ref())
    }

    pub fn get_mut(&mut self, name: &GuardName) -> Option<&mut (dyn Guard + 'static)> {
        self.guards
            .iter_mut()
            .find(|g| g.name() == name)
            .map(|g| g.as_mut())
    }
}

impl fmt::Debug for GuardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.guards
                    .iter()
                    .map(|g| (g.name().as_str(), g.is_authenticated())),
            )
            .finish()
    }
}
