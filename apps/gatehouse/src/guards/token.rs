use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use super::bearer::BearerToken;
use super::{AuthFailure, Guard, GuardName};
use crate::auth::jwt::unix_seconds;
use crate::auth::{Claims, RevocationList, TokenService};
use crate::principals::{Principal, PrincipalStore};

enum TokenState {
    Authenticated { claims: Claims, principal: Principal },
    Unauthenticated(AuthFailure),
}

/// Guard backed by a bearer JWT issued for this guard.
pub struct TokenGuard {
    name: GuardName,
    state: TokenState,
    revocations: Arc<RevocationList>,
}

impl TokenGuard {
    /// Verify the request's bearer token against this guard and load the
    /// principal it names from the guard's provider.
    pub fn resolve(
        service: &TokenService,
        provider: &dyn PrincipalStore,
        revocations: Arc<RevocationList>,
        bearer: &BearerToken,
    ) -> Self {
        let state = match Self::authenticate(service, provider, &revocations, bearer) {
            Ok((claims, principal)) => TokenState::Authenticated { claims, principal },
            Err(failure) => TokenState::Unauthenticated(failure),
        };

        Self {
            name: service.guard().clone(),
            state,
            revocations,
        }
    }

    fn authenticate(
        service: &TokenService,
        provider: &dyn PrincipalStore,
        revocations: &RevocationList,
        bearer: &BearerToken,
    ) -> Result<(Claims, Principal), AuthFailure> {
        let token = match bearer {
            Ok(Some(token)) => token,
            Ok(None) => return Err(AuthFailure::MissingBearer),
            Err(failure) => return Err(failure.clone()),
        };

        let claims = service.verify(token)?;
        if revocations.is_revoked(&claims.jti) {
            return Err(AuthFailure::RevokedToken);
        }

        let principal = claims
            .principal_id()
            .and_then(|id| provider.find_by_id(id))
            .ok_or(AuthFailure::UnknownPrincipal)?;

        Ok((claims, principal))
    }
}

impl Guard for TokenGuard {
    fn name(&self) -> &GuardName {
        &self.name
    }

    fn is_authenticated(&self) -> bool {
        matches!(self.state, TokenState::Authenticated { .. })
    }

    fn current_principal(&self) -> Option<Principal> {
        match &self.state {
            TokenState::Authenticated { principal, .. } => Some(principal.clone()),
            TokenState::Unauthenticated(_) => None,
        }
    }

    fn terminate_session(&mut self) {
        if let TokenState::Authenticated { claims, .. } = &self.state {
            let now = unix_seconds(SystemTime::now()).unwrap_or_default();
            self.revocations.revoke(&claims.jti, claims.exp, now);
            debug!(guard = %self.name, jti = %claims.jti, "token revoked");
            self.state = TokenState::Unauthenticated(AuthFailure::RevokedToken);
        }
    }

    fn failure(&self) -> Option<AuthFailure> {
        match &self.state {
            TokenState::Authenticated { .. } => None,
            TokenState::Unauthenticated(failure) => Some(failure.clone()),
        }
    }
}
