//! Active-status gate.
//!
//! Walks the request's guards in registry order and force-logs-out the first
//! one holding an inactive principal. Once [`enforce_active`] returns, no
//! guard in the set holds an authenticated inactive principal: either none
//! did, or the request is rejected and the offending session is gone.

#[cfg(test)]
mod tests_props;

use crate::guards::{Guard, GuardName, GuardSet};

/// Outcome of running the gate over a request's guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No guard holds an inactive principal; continue to the handler.
    Forward,
    /// `guard` held an inactive principal and its session was terminated.
    Reject { guard: GuardName, principal_id: i64 },
}

impl GateDecision {
    pub fn is_forward(&self) -> bool {
        matches!(self, GateDecision::Forward)
    }
}

/// Terminate the first guard (in declaration order) whose authenticated
/// principal is inactive, leaving every other guard untouched.
pub fn enforce_active(guards: &mut GuardSet) -> GateDecision {
    for guard in guards.iter_mut() {
        if !guard.is_authenticated() {
            continue;
        }
        let Some(principal) = guard.current_principal() else {
            continue;
        };
        if principal.status.is_inactive() {
            guard.terminate_session();
            return GateDecision::Reject {
                guard: guard.name().clone(),
                principal_id: principal.id,
            };
        }
    }
    GateDecision::Forward
}
