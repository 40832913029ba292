use std::sync::Arc;

use crate::guards::GuardRegistry;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Guards in declaration order, fixed at startup
    pub registry: Arc<GuardRegistry>,
}

impl AppState {
    pub fn new(registry: GuardRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
