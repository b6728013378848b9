//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, accelerator setup, worker spawning, and the
//! Axum server lifecycle.

use crate::application::services::{LinkService, LinkSettings};
use crate::config::{Config, FilterBackend};
use crate::domain::access_worker::run_access_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::filter::{MemoryBloomFilter, MembershipFilter, RedisBloomFilter};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::infrastructure::redis;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Rows fetched per page when seeding the membership filter.
const FILTER_WARM_PAGE_SIZE: i64 = 1_000;

/// How long shutdown waits for queued access increments.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Membership filter, seeded from the store when freshly created
/// - Background access worker
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let redis_conn = match &config.redis_url {
        Some(url) => match redis::connect(url).await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Failed to connect to Redis: {}. Continuing without it.", e);
                None
            }
        },
        None => None,
    };

    let cache: Arc<dyn CacheService> = match &redis_conn {
        Some(conn) => {
            info!("Cache enabled (Redis)");
            Arc::new(RedisCache::new(
                conn.clone(),
                Duration::from_secs(config.cache_ttl_seconds),
            ))
        }
        None => {
            info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    };

    let filter: Arc<dyn MembershipFilter> = match (config.filter_backend, &redis_conn) {
        (FilterBackend::Redis, Some(conn)) => {
            info!("Membership filter: RedisBloom key '{}'", config.filter_key);
            Arc::new(RedisBloomFilter::new(
                conn.clone(),
                config.filter_key.clone(),
                config.filter_capacity,
                config.filter_error_rate,
            ))
        }
        (backend, _) => {
            if backend == FilterBackend::Redis {
                warn!("Redis unavailable, falling back to in-memory membership filter");
            }
            info!("Membership filter: in-memory");
            Arc::new(MemoryBloomFilter::new(
                config.filter_capacity as usize,
                config.filter_error_rate,
            ))
        }
    };

    let (access_tx, access_rx) = mpsc::channel(config.access_queue_capacity);

    let repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        filter.clone(),
        cache,
        access_tx,
        LinkSettings::from(&config),
    ));

    match filter.initialize().await {
        Ok(true) => match link_service.warm_filter(FILTER_WARM_PAGE_SIZE).await {
            Ok(count) => info!("Membership filter seeded with {} codes", count),
            Err(e) => warn!("Failed to seed membership filter: {}", e),
        },
        Ok(false) => info!("Membership filter already initialized"),
        Err(e) => warn!("Failed to initialize membership filter: {}", e),
    }

    let worker = tokio::spawn(run_access_worker(
        access_rx,
        repository,
        config.access_worker_concurrency,
    ));
    info!("Access worker started");

    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set; admin endpoints are unauthenticated");
    }

    let state = AppState::new(link_service, config.admin_token.as_deref());
    let app = app_router(state, &config)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last access sender) is gone; let the worker drain.
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker)
        .await
        .is_err()
    {
        warn!("Access worker did not finish within {:?}", WORKER_DRAIN_TIMEOUT);
    }

    pool.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
