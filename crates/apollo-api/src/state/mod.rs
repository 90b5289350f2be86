//! Shared handler state

use std::sync::Arc;

use apollo_common::AppConfig;
use apollo_service::ServiceContext;

/// Cloned into every handler; both halves are behind `Arc`
#[derive(Clone)]
pub struct AppState {
    ctx: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(ctx: ServiceContext, config: AppConfig) -> Self {
        Self {
            ctx: Arc::new(ctx),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session cookies carry `Secure` outside development and staging
    pub fn secure_cookies(&self) -> bool {
        self.config.app.env.is_production()
    }
}

// The config holds the session secret, so only a summary is printed
impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.config.app.env)
            .field("backend", &self.config.database.backend)
            .finish_non_exhaustive()
    }
}
