//! Claims carried by guard-issued access tokens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Principal id within the guard's provider
    pub sub: String,
    /// Guard the token was issued for; it authenticates under no other guard
    pub guard: String,
    /// Token id, the key for revocation
    pub jti: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn principal_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
