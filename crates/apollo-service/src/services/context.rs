//! Service context - dependency container for services
//!
//! Holds all repositories, the event bus and the token services needed by services.

use std::sync::Arc;

use apollo_cache::{Publisher, RedisEventForwarder, RedisPool, SharedRedisPool};
use apollo_common::{AppConfig, JwtService, PasswordService, StorageBackend};
use apollo_core::traits::{
    MetaRepository, PostRepository, RelationRepository, UserRepository, ViewStatRepository,
};
use apollo_db::{
    apply_schema, create_pool, MemoryMetaRepository, MemoryPostRepository,
    MemoryRelationRepository, MemoryStore, MemoryUserRepository, MemoryViewStatRepository,
    PgMetaRepository, PgPool, PgPostRepository, PgRelationRepository, PgUserRepository,
    PgViewStatRepository, PoolConfig,
};
use tracing::info;

use super::clock::SiteClock;
use super::error::{ServiceError, ServiceResult};
use super::events::{AuditLogSubscriber, EventBus};
use super::locks::CounterLocks;

/// Service context containing all dependencies
///
/// Built once at start-up and shared by `Arc` through the HTTP layer. It
/// provides access to:
/// - Repositories of the configured storage backend
/// - The event bus
/// - Session/nonce tokens and password hashing
/// - The site clock
#[derive(Clone)]
pub struct ServiceContext {
    // Connection pools, for readiness checks
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    meta_repo: Arc<dyn MetaRepository>,
    relation_repo: Arc<dyn RelationRepository>,
    view_repo: Arc<dyn ViewStatRepository>,

    // Events
    event_bus: Arc<EventBus>,

    // Serializes counter rewrites per (kind, event)
    counter_locks: Arc<CounterLocks>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: Arc<PasswordService>,
    clock: SiteClock,
}

impl ServiceContext {
    /// Build the context described by the application config
    ///
    /// Connects to PostgreSQL and applies the schema for the `postgres`
    /// backend, and registers the Redis forwarder when Redis is configured.
    pub async fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        let mut builder = match config.database.backend {
            StorageBackend::Memory => {
                info!("Using in-process storage backend");
                ServiceContextBuilder::new().memory(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Postgres => {
                let pool_config = PoolConfig::from_app(&config.database)
                    .ok_or_else(|| ServiceError::internal("DATABASE_URL is required"))?;
                let pool = create_pool(&pool_config)
                    .await
                    .map_err(|e| ServiceError::internal(format!("database connection failed: {e}")))?;
                apply_schema(&pool)
                    .await
                    .map_err(|e| ServiceError::internal(format!("schema migration failed: {e}")))?;
                info!("Using PostgreSQL storage backend");
                ServiceContextBuilder::new().postgres(pool)
            }
        };

        let clock = SiteClock::from_offset_minutes(config.site.utc_offset_minutes)
            .ok_or_else(|| ServiceError::internal("site UTC offset out of range"))?;

        builder = builder
            .jwt_service(Arc::new(JwtService::new(
                &config.session.secret,
                config.session.session_expiry,
                config.session.nonce_expiry,
            )))
            .clock(clock);

        let event_bus = Arc::new(EventBus::new());
        event_bus.subscribe(Arc::new(AuditLogSubscriber));

        if let Some(redis) = &config.redis {
            let redis_pool = Arc::new(
                RedisPool::from_config(redis)
                    .map_err(|e| ServiceError::internal(format!("redis pool failed: {e}")))?,
            );
            event_bus.subscribe(Arc::new(RedisEventForwarder::new(Publisher::new(
                (*redis_pool).clone(),
            ))));
            builder = builder.redis_pool(redis_pool);
        }

        builder.event_bus(event_bus).build()
    }

    // === Connection Pools ===

    /// PostgreSQL pool, when running on the postgres backend
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Redis pool, when event forwarding is enabled
    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn meta_repo(&self) -> &dyn MetaRepository {
        self.meta_repo.as_ref()
    }

    pub fn relation_repo(&self) -> &dyn RelationRepository {
        self.relation_repo.as_ref()
    }

    pub fn view_repo(&self) -> &dyn ViewStatRepository {
        self.view_repo.as_ref()
    }

    // === Events ===

    pub fn event_bus(&self) -> &EventBus {
        self.event_bus.as_ref()
    }

    pub fn counter_locks(&self) -> &CounterLocks {
        self.counter_locks.as_ref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        self.password_service.as_ref()
    }

    pub fn clock(&self) -> &SiteClock {
        &self.clock
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("redis_pool", &self.redis_pool.as_ref().map(|_| "SharedRedisPool"))
            .field("repositories", &"...")
            .field("event_bus", &self.event_bus)
            .field("clock", &self.clock)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    meta_repo: Option<Arc<dyn MetaRepository>>,
    relation_repo: Option<Arc<dyn RelationRepository>>,
    view_repo: Option<Arc<dyn ViewStatRepository>>,
    event_bus: Option<Arc<EventBus>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: Option<Arc<PasswordService>>,
    clock: Option<SiteClock>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the in-process store for every repository
    pub fn memory(self, store: Arc<MemoryStore>) -> Self {
        self.user_repo(Arc::new(MemoryUserRepository::new(store.clone())))
            .post_repo(Arc::new(MemoryPostRepository::new(store.clone())))
            .meta_repo(Arc::new(MemoryMetaRepository::new(store.clone())))
            .relation_repo(Arc::new(MemoryRelationRepository::new(store.clone())))
            .view_repo(Arc::new(MemoryViewStatRepository::new(store)))
    }

    /// Use PostgreSQL for every repository
    pub fn postgres(self, pool: PgPool) -> Self {
        self.user_repo(Arc::new(PgUserRepository::new(pool.clone())))
            .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
            .meta_repo(Arc::new(PgMetaRepository::new(pool.clone())))
            .relation_repo(Arc::new(PgRelationRepository::new(pool.clone())))
            .view_repo(Arc::new(PgViewStatRepository::new(pool.clone())))
            .pool(pool)
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn meta_repo(mut self, repo: Arc<dyn MetaRepository>) -> Self {
        self.meta_repo = Some(repo);
        self
    }

    pub fn relation_repo(mut self, repo: Arc<dyn RelationRepository>) -> Self {
        self.relation_repo = Some(repo);
        self
    }

    pub fn view_repo(mut self, repo: Arc<dyn ViewStatRepository>) -> Self {
        self.view_repo = Some(repo);
        self
    }

    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn password_service(mut self, service: Arc<PasswordService>) -> Self {
        self.password_service = Some(service);
        self
    }

    pub fn clock(mut self, clock: SiteClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the ServiceContext
    ///
    /// The event bus, password service and clock fall back to defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository or the JWT service is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            user_repo: self.user_repo.ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            post_repo: self.post_repo.ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            meta_repo: self.meta_repo.ok_or_else(|| ServiceError::validation("meta_repo is required"))?,
            relation_repo: self.relation_repo.ok_or_else(|| ServiceError::validation("relation_repo is required"))?,
            view_repo: self.view_repo.ok_or_else(|| ServiceError::validation("view_repo is required"))?,
            event_bus: self.event_bus.unwrap_or_default(),
            counter_locks: Arc::new(CounterLocks::new()),
            jwt_service: self.jwt_service.ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            password_service: self.password_service.unwrap_or_default(),
            clock: self.clock.unwrap_or_default(),
        })
    }
}
