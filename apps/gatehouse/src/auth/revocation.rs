//! Revoked token ids, kept until the token would have expired anyway.

use dashmap::DashMap;
use tracing::debug;

/// Revocations beyond this many entries trigger a prune of expired ones.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct RevocationList {
    /// jti -> exp (seconds since epoch)
    entries: DashMap<String, i64>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: &str, exp: i64, now: i64) {
        self.entries.insert(jti.to_string(), exp);
        if self.entries.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token has expired; those fail verification on their own.
    pub fn prune(&self, now: i64) {
        let before = self.entries.len();
        self.entries.retain(|_, exp| *exp >= now);
        debug!(
            pruned = before.saturating_sub(self.entries.len()),
            "revocation list pruned"
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
