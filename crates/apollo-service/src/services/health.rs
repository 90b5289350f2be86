//! Readiness probes for the storage backend and Redis

use tracing::warn;

use crate::dto::{HealthChecks, ReadinessResponse};

use super::context::ServiceContext;

pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Probe every configured dependency
    ///
    /// The in-process store is always ready. Redis is only reported when it is
    /// configured.
    pub async fn readiness(&self) -> ReadinessResponse {
        let storage = match self.ctx.pool() {
            Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
                Ok(_) => "ok",
                Err(e) => {
                    warn!(error = %e, "Database readiness check failed");
                    "error"
                }
            },
            None => "ok",
        };

        let redis = match self.ctx.redis_pool() {
            Some(pool) => Some(match pool.health_check().await {
                Ok(()) => "ok",
                Err(e) => {
                    warn!(error = %e, "Redis readiness check failed");
                    "error"
                }
            }),
            None => None,
        };

        ReadinessResponse::new(HealthChecks { storage, redis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::memory_context;

    #[tokio::test]
    async fn test_memory_backend_is_ready() {
        let ctx = memory_context();
        let readiness = HealthService::new(&ctx).readiness().await;
        assert!(readiness.is_ready());
        assert_eq!(readiness.checks.storage, "ok");
        assert!(readiness.checks.redis.is_none());
    }
}
