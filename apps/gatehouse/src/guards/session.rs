//! Cookie-session guard and its backing store.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::{AuthFailure, Guard, GuardName};
use crate::auth::jwt::{expiry, unix_seconds};
use crate::error::AppError;
use crate::principals::{Principal, PrincipalStore};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Sessions beyond this many entries trigger a prune of expired ones.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    principal_id: i64,
    expires_at: i64,
}

/// A newly started session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub id: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Server-side sessions of one guard, keyed by the id stored in its cookie.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn start(&self, principal_id: i64, now: SystemTime) -> Result<IssuedSession, AppError> {
        let now = unix_seconds(now)?;
        let expires_at = expiry(now, self.ttl)?;
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                principal_id,
                expires_at,
            },
        );
        if self.sessions.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }
        Ok(IssuedSession {
            id,
            expires_in: self.ttl.as_secs(),
        })
    }

    /// Principal id of a live session; expired sessions are dropped on sight.
    pub fn lookup(&self, id: &str, now: SystemTime) -> Option<i64> {
        let now = unix_seconds(now).ok()?;
        let entry = *self.sessions.get(id)?;
        if entry.expires_at < now {
            self.sessions.remove(id);
            return None;
        }
        Some(entry.principal_id)
    }

    /// Drop sessions that expired without being presented again.
    pub fn prune(&self, now: i64) {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at >= now);
        debug!(
            pruned = before.saturating_sub(self.sessions.len()),
            "session store pruned"
        );
    }

    pub fn end(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

enum SessionState {
    Authenticated { id: String, principal: Principal },
    Unauthenticated(AuthFailure),
}

/// Guard backed by a server-side session referenced from a cookie.
pub struct SessionGuard {
    name: GuardName,
    state: SessionState,
    store: Arc<SessionStore>,
}

impl SessionGuard {
    pub fn resolve(
        name: GuardName,
        store: Arc<SessionStore>,
        provider: &dyn PrincipalStore,
        session_id: Option<&str>,
    ) -> Self {
        let state = match session_id {
            None => SessionState::Unauthenticated(AuthFailure::MissingSession),
            Some(id) => match store.lookup(id, SystemTime::now()) {
                None => SessionState::Unauthenticated(AuthFailure::EndedSession),
                Some(principal_id) => match provider.find_by_id(principal_id) {
                    Some(principal) => SessionState::Authenticated {
                        id: id.to_string(),
                        principal,
                    },
                    None => SessionState::Unauthenticated(AuthFailure::UnknownPrincipal),
                },
            },
        };

        Self { name, state, store }
    }
}

impl Guard for SessionGuard {
    fn name(&self) -> &GuardName {
        &self.name
    }

    fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    fn current_principal(&self) -> Option<Principal> {
        match &self.state {
            SessionState::Authenticated { principal, .. } => Some(principal.clone()),
            SessionState::Unauthenticated(_) => None,
        }
    }

    fn terminate_session(&mut self) {
        if let SessionState::Authenticated { id, .. } = &self.state {
            self.store.end(id);
            debug!(guard = %self.name, "session ended");
            self.state = SessionState::Unauthenticated(AuthFailure::EndedSession);
        }
    }

    fn failure(&self) -> Option<AuthFailure> {
        match &self.state {
            SessionState::Authenticated { .. } => None,
            SessionState::Unauthenticated(failure) => Some(failure.clone()),
        }
    }
}
