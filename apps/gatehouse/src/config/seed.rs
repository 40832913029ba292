//! Principal seed file: `{ "<provider>": [ {id, email, name, password, status} ] }`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::auth::AuthConfig;
use crate::error::AppError;
use crate::principals::memory::PrincipalSeed;
use crate::principals::InMemoryPrincipalStore;

pub type Seeds = HashMap<String, Vec<PrincipalSeed>>;

pub fn load_seed_file(path: &Path) -> Result<Seeds, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::config(format!("cannot read seed file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::config(format!("invalid seed file {}: {e}", path.display()))
    })
}

/// One in-memory store per provider the guards use, filled from `seeds`.
pub fn seeded_providers(
    config: &AuthConfig,
    mut seeds: Seeds,
) -> Result<HashMap<String, Arc<InMemoryPrincipalStore>>, AppError> {
    let mut providers = HashMap::new();
    for name in config.provider_names() {
        let store = InMemoryPrincipalStore::from_seeds(seeds.remove(name).unwrap_or_default())?;
        info!(provider = name, principals = store.len(), "provider loaded");
        providers.insert(name.to_string(), Arc::new(store));
    }

    for unused in seeds.keys() {
        warn!(provider = %unused, "seed entries for a provider no guard uses");
    }

    Ok(providers)
}
