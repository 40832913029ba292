//! Principals: the identity records guards authenticate.
//!
//! Providers own the records; guards and the active-status gate only read
//! them through [`PrincipalStore`].

pub mod memory;

use serde::{Deserialize, Serialize};

pub use memory::InMemoryPrincipalStore;

/// Account status as stored by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "I")]
    Inactive,
}

impl PrincipalStatus {
    pub fn is_inactive(self) -> bool {
        matches!(self, PrincipalStatus::Inactive)
    }
}

/// Authenticated identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub status: PrincipalStatus,
}

/// Read access to one principal provider (e.g. "users", "admins").
///
/// Lookups are synchronous; a store backed by slow I/O is expected to cache.
pub trait PrincipalStore: Send + Sync {
    /// Fetch the current record, so status changes are seen on the next request.
    fn find_by_id(&self, id: i64) -> Option<Principal>;

    /// Resolve a login attempt. `None` covers both unknown email and wrong password.
    fn find_by_credentials(&self, email: &str, password: &str) -> Option<Principal>;
}
