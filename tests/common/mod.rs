#![allow(dead_code)]

use async_trait::async_trait;
use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::json;
use short_url::application::services::{LinkService, LinkSettings};
use short_url::config::{Config, FilterBackend};
use short_url::domain::access_event::AccessEvent;
use short_url::domain::entities::{Link, LinkStats, NewLink};
use short_url::domain::repositories::LinkRepository;
use short_url::error::AppError;
use short_url::infrastructure::cache::NullCache;
use short_url::infrastructure::filter::{MembershipFilter, MemoryBloomFilter};
use short_url::routes::app_router;
use short_url::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";

/// Store double holding links in memory.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    stall: Mutex<Option<Duration>>,
}

impl InMemoryLinkRepository {
    /// Makes `aggregate_stats` sleep for `delay` before answering.
    pub fn stall_stats(&self, delay: Duration) {
        *self.stall.lock() = Some(delay);
    }

    /// Inserts a link directly, bypassing code allocation.
    pub fn seed(&self, code: &str, url: &str, expires_at: Option<DateTime<Utc>>) {
        let mut links = self.links.lock();
        let now = Utc::now();
        let id = links.len() as i64 + 1;
        links.push(Link::new(
            id,
            code.to_string(),
            url.to_string(),
            0,
            now,
            now,
            expires_at,
        ));
    }

    pub fn set_expiry(&self, code: &str, expires_at: Option<DateTime<Utc>>) {
        let mut links = self.links.lock();
        if let Some(link) = links.iter_mut().find(|l| l.code == code) {
            link.expires_at = expires_at;
        }
    }

    pub fn access_count(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.access_count)
    }

    pub fn len(&self) -> usize {
        self.links.lock().len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock();
        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_code_key" }),
            ));
        }

        let now = Utc::now();
        let link = Link::new(
            links.len() as i64 + 1,
            new_link.code,
            new_link.target_url,
            0,
            now,
            now,
            new_link.expires_at,
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.lock().iter().find(|l| l.code == code).cloned())
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.lock().iter().any(|l| l.code == code))
    }

    async fn increment_access_count(&self, code: &str) -> Result<(), AppError> {
        let mut links = self.links.lock();
        let link = links
            .iter_mut()
            .find(|l| l.code == code)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;
        link.access_count += 1;
        link.updated_at = Utc::now();
        Ok(())
    }

    async fn list_by_time_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let mut matching: Vec<Link> = self
            .links
            .lock()
            .iter()
            .filter(|l| l.created_at >= from && l.created_at <= to)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut links = self.links.lock();
        let before = links.len();
        links.retain(|l| !l.is_expired_at(now));
        Ok((before - links.len()) as u64)
    }

    async fn aggregate_stats(&self, now: DateTime<Utc>) -> Result<LinkStats, AppError> {
        let stall = *self.stall.lock();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }

        let links = self.links.lock();
        let expired = links.iter().filter(|l| l.is_expired_at(now)).count() as i64;
        Ok(LinkStats {
            total_links: links.len() as i64,
            total_accesses: links.iter().map(|l| l.access_count).sum(),
            active_links: links.len() as i64 - expired,
            expired_links: expired,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub repo: Arc<InMemoryLinkRepository>,
    pub access_rx: mpsc::Receiver<AccessEvent>,
}

pub async fn create_test_state(admin_token: Option<&str>) -> TestContext {
    let repo = Arc::new(InMemoryLinkRepository::default());

    let filter = Arc::new(MemoryBloomFilter::new(10_000, 0.001));
    filter.initialize().await.unwrap();

    let (tx, rx) = mpsc::channel(100);

    let link_service = Arc::new(LinkService::new(
        repo.clone() as Arc<dyn LinkRepository>,
        filter,
        Arc::new(NullCache::new()),
        tx,
        LinkSettings {
            base_url: BASE_URL.to_string(),
            code_length: 6,
            cache_ttl: Duration::from_secs(3600),
        },
    ));

    TestContext {
        state: AppState::new(link_service, admin_token),
        repo,
        access_rx: rx,
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/short_url_test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: BASE_URL.to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        code_length: 6,
        cache_ttl_seconds: 3600,
        filter_backend: FilterBackend::Memory,
        filter_key: "used_short_codes".to_string(),
        filter_capacity: 10_000,
        filter_error_rate: 0.001,
        access_queue_capacity: 100,
        access_worker_concurrency: 1,
        rate_limit_per_second: 100,
        rate_limit_burst: 100,
        request_timeout_seconds: 30,
        admin_token: None,
        db_max_connections: 1,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 60,
    }
}

/// Serves the full application router over a real socket, so the per-IP
/// rate limiter sees a peer address.
pub fn test_server(state: AppState) -> TestServer {
    test_server_with_config(state, &test_config())
}

pub fn test_server_with_config(state: AppState, config: &Config) -> TestServer {
    let app = app_router(state, config).unwrap();

    TestServer::builder()
        .http_transport()
        .build(ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app))
        .unwrap()
}
