use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::app_state::AppState;
use super::security_config::SecurityConfig;
use crate::auth::{RevocationList, TokenService};
use crate::config::{AuthConfig, DriverKind};
use crate::error::AppError;
use crate::guards::{GuardDefinition, GuardDriver, GuardRegistry, SessionStore};
use crate::principals::PrincipalStore;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: AuthConfig,
    providers: HashMap<String, Arc<dyn PrincipalStore>>,
    revocations: Arc<RevocationList>,
}

impl StateBuilder {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            providers: HashMap::new(),
            revocations: Arc::new(RevocationList::new()),
        }
    }

    pub fn with_provider(mut self, name: &str, provider: Arc<dyn PrincipalStore>) -> Self {
        self.providers.insert(name.to_string(), provider);
        self
    }

    pub fn with_revocations(mut self, revocations: Arc<RevocationList>) -> Self {
        self.revocations = revocations;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let mut definitions = Vec::with_capacity(self.config.guards.len());

        for guard in &self.config.guards {
            let provider = self.providers.get(&guard.provider).cloned().ok_or_else(|| {
                AppError::config(format!(
                    "guard '{}' uses unknown provider '{}'",
                    guard.name, guard.provider
                ))
            })?;

            let driver = match guard.driver {
                DriverKind::Jwt => {
                    let secret = guard.jwt_secret.clone().ok_or_else(|| {
                        AppError::config(format!("guard '{}' has no JWT secret", guard.name))
                    })?;
                    let security = SecurityConfig::new(secret).with_token_ttl(self.config.token_ttl);
                    GuardDriver::Jwt(TokenService::new(guard.name.clone(), security))
                }
                DriverKind::Session => {
                    GuardDriver::Session(Arc::new(SessionStore::new(self.config.session_ttl)))
                }
            };

            info!(guard = %guard.name, driver = driver.kind(), provider = %guard.provider, "guard registered");
            definitions.push(GuardDefinition::new(
                guard.name.clone(),
                driver,
                guard.provider.clone(),
                provider,
            ));
        }

        let registry =
            GuardRegistry::new(definitions, self.config.default_guard, self.revocations)?;
        Ok(AppState::new(registry))
    }
}

pub fn build_state(config: AuthConfig) -> StateBuilder {
    StateBuilder::new(config)
}
