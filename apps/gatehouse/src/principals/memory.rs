use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Deserialize;

use super::{Principal, PrincipalStatus, PrincipalStore};
use crate::error::AppError;

/// Seed entry as read from the `AUTH_SEED_FILE` JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalSeed {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default = "default_status")]
    pub status: PrincipalStatus,
}

fn default_status() -> PrincipalStatus {
    PrincipalStatus::Active
}

#[derive(Debug, Clone)]
struct StoredPrincipal {
    principal: Principal,
    password_digest: blake3::Hash,
}

/// Process-local principal provider.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    records: RwLock<HashMap<i64, StoredPrincipal>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seeds(seeds: Vec<PrincipalSeed>) -> Result<Self, AppError> {
        let store = Self::new();
        for seed in seeds {
            let principal = Principal {
                id: seed.id,
                email: seed.email,
                name: seed.name,
                status: seed.status,
            };
            store.insert(principal, &seed.password)?;
        }
        Ok(store)
    }

    /// Add a principal. Ids and emails (case-insensitive) must be unique.
    pub fn insert(&self, principal: Principal, password: &str) -> Result<(), AppError> {
        let mut records = self.records.write();

        if records.contains_key(&principal.id) {
            return Err(AppError::config(format!(
                "duplicate principal id {}",
                principal.id
            )));
        }
        if records
            .values()
            .any(|r| r.principal.email.eq_ignore_ascii_case(&principal.email))
        {
            return Err(AppError::config(format!(
                "duplicate principal email {}",
                principal.email
            )));
        }

        records.insert(
            principal.id,
            StoredPrincipal {
                principal,
                password_digest: blake3::hash(password.as_bytes()),
            },
        );
        Ok(())
    }

    /// Returns false when no such principal exists.
    pub fn set_status(&self, id: i64, status: PrincipalStatus) -> bool {
        match self.records.write().get_mut(&id) {
            Some(record) => {
                record.principal.status = status;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn find_by_id(&self, id: i64) -> Option<Principal> {
        self.records.read().get(&id).map(|r| r.principal.clone())
    }

    fn find_by_credentials(&self, email: &str, password: &str) -> Option<Principal> {
        let digest = blake3::hash(password.as_bytes());
        self.records
            .read()
            .values()
            .find(|r| r.principal.email.eq_ignore_ascii_case(email))
            // blake3::Hash equality is constant-time
            .filter(|r| r.password_digest == digest)
            .map(|r| r.principal.clone())
    }
}
