pub mod api;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

pub use api::CachedCourseApi;

/// Entity bucket a cached read belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheBucket {
    Courses,
    CourseSettings,
    Catalogs,
}

impl CacheBucket {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::CourseSettings => "course_settings",
            Self::Catalogs => "catalogs",
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    buckets: Vec<CacheBucket>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory store of decoded read responses, keyed by request path.
pub struct ReadCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    pub async fn set(&self, key: &str, value: Value, buckets: &[CacheBucket]) {
        let entry = CacheEntry {
            value,
            buckets: buckets.to_vec(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Drop every entry tagged with `bucket`. Returns how many were removed.
    pub async fn invalidate(&self, bucket: CacheBucket) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.buckets.contains(&bucket) && !entry.is_expired());
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Wraps a mutating call: success invalidates the named buckets, failure
/// leaves the cache untouched.
#[derive(Clone)]
pub struct InvalidationGate {
    cache: Arc<ReadCache>,
}

impl InvalidationGate {
    pub fn new(cache: Arc<ReadCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ReadCache> {
        &self.cache
    }

    pub async fn guard<T, E, F>(&self, buckets: &[CacheBucket], call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let result = call.await;
        if result.is_ok() {
            for bucket in buckets {
                let removed = self.cache.invalidate(*bucket).await;
                debug!("invalidated {} cached read(s) in {}", removed, bucket.as_str());
            }
        }
        result
    }
}
